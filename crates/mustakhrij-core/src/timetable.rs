//! Weekly timetable types
//!
//! The timetable is external to the model's output: it is defined once at
//! process start (the built-in Algerian primary-school week, or a JSON
//! override) and never mutated afterward.

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;

/// One fixed (day, time-range, activity) cell of the weekly timetable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    /// Day name, e.g. `"الأحد"`
    pub day: String,
    /// Time range, e.g. `"08:00 - 08:45"`
    pub time: String,
    /// Canonical activity name, e.g. `"ت علمية"`
    pub activity: String,
}

impl ScheduleSlot {
    /// Create a slot
    pub fn new(
        day: impl Into<String>,
        time: impl Into<String>,
        activity: impl Into<String>,
    ) -> Self {
        Self {
            day: day.into(),
            time: time.into(),
            activity: activity.into(),
        }
    }
}

/// A full week of schedule slots, in day-then-time order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timetable {
    slots: Vec<ScheduleSlot>,
}

impl Timetable {
    /// Build a timetable from a slot list
    pub fn new(slots: Vec<ScheduleSlot>) -> Self {
        Self { slots }
    }

    /// Load a timetable from a JSON array of slots
    pub fn from_json_str(json: &str) -> Result<Self> {
        let slots: Vec<ScheduleSlot> = serde_json::from_str(json)?;
        if slots.is_empty() {
            return Err(Error::configuration("timetable holds no slots"));
        }
        Ok(Self { slots })
    }

    /// All slots, in fixed order
    pub fn slots(&self) -> &[ScheduleSlot] {
        &self.slots
    }

    /// The slots of one day, in fixed order
    pub fn day(&self, day: &str) -> Vec<&ScheduleSlot> {
        self.slots.iter().filter(|s| s.day == day).collect()
    }

    /// Day names, unique, in first-appearance order
    pub fn days(&self) -> Vec<&str> {
        let mut days: Vec<&str> = Vec::new();
        for slot in &self.slots {
            if !days.contains(&slot.day.as_str()) {
                days.push(&slot.day);
            }
        }
        days
    }

    /// The built-in Algerian primary-school week
    pub fn algerian_primary() -> Self {
        let week: &[(&str, &[(&str, &str)])] = &[
            (
                "الأحد",
                &[
                    ("08:00 - 08:45", "لغة عربية"),
                    ("08:45 - 09:30", "رياضيات"),
                    ("09:45 - 10:30", "ت إسلامية"),
                    ("10:30 - 11:15", "قراءة"),
                    ("13:00 - 13:45", "ت علمية"),
                    ("13:45 - 14:30", "تربية تشكيلية"),
                ],
            ),
            (
                "الاثنين",
                &[
                    ("08:00 - 08:45", "لغة عربية"),
                    ("08:45 - 09:30", "رياضيات"),
                    ("09:45 - 10:30", "ت مدنية"),
                    ("10:30 - 11:15", "تعبير شفوي"),
                    ("13:00 - 13:45", "لغة فرنسية"),
                    ("13:45 - 14:30", "تربية بدنية"),
                ],
            ),
            (
                "الثلاثاء",
                &[
                    ("08:00 - 08:45", "رياضيات"),
                    ("08:45 - 09:30", "لغة عربية"),
                    ("09:45 - 10:30", "قراءة"),
                    ("10:30 - 11:15", "ت علمية"),
                    ("11:15 - 12:00", "لغة فرنسية"),
                ],
            ),
            (
                "الأربعاء",
                &[
                    ("08:00 - 08:45", "لغة عربية"),
                    ("08:45 - 09:30", "رياضيات"),
                    ("09:45 - 10:30", "محفوظات"),
                    ("10:30 - 11:15", "ت إسلامية"),
                    ("13:00 - 13:45", "تعبير كتابي"),
                    ("13:45 - 14:30", "تربية موسيقية"),
                ],
            ),
            (
                "الخميس",
                &[
                    ("08:00 - 08:45", "رياضيات"),
                    ("08:45 - 09:30", "إملاء"),
                    ("09:45 - 10:30", "قراءة"),
                    ("10:30 - 11:15", "ت مدنية"),
                    ("11:15 - 12:00", "لغة فرنسية"),
                ],
            ),
        ];

        let mut slots = Vec::new();
        for (day, entries) in week {
            for (time, activity) in *entries {
                slots.push(ScheduleSlot::new(*day, *time, *activity));
            }
        }
        Self { slots }
    }
}

impl Default for Timetable {
    fn default() -> Self {
        Self::algerian_primary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_week_shape() {
        let timetable = Timetable::algerian_primary();
        assert_eq!(
            timetable.days(),
            vec!["الأحد", "الاثنين", "الثلاثاء", "الأربعاء", "الخميس"]
        );
        assert_eq!(timetable.day("الأحد").len(), 6);
        assert_eq!(timetable.day("الخميس").len(), 5);
        assert!(timetable.day("الجمعة").is_empty());
    }

    #[test]
    fn test_day_order_is_fixed() {
        let timetable = Timetable::algerian_primary();
        let sunday = timetable.day("الأحد");
        assert_eq!(sunday[0].time, "08:00 - 08:45");
        assert_eq!(sunday[0].activity, "لغة عربية");
        assert_eq!(sunday[4].activity, "ت علمية");
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"[
            {"day": "الأحد", "time": "08:00 - 08:45", "activity": "رياضيات"}
        ]"#;
        let timetable = Timetable::from_json_str(json).unwrap();
        assert_eq!(timetable.slots().len(), 1);

        assert!(Timetable::from_json_str("[]").is_err());
        assert!(Timetable::from_json_str("not json").is_err());
    }
}
