//! Reconciliation: pair extracted records with timetable slots by
//! normalized fuzzy activity-name matching
//!
//! The model's wording of an activity may be a superset or subset of the
//! canonical timetable wording ("علوم" vs "علوم طبيعية"), so matching is
//! substring containment in either direction after both names are
//! normalized the same way.

use serde::Serialize;

use crate::record::ExtractedRecord;
use crate::timetable::ScheduleSlot;

/// Leading "subject of" markers stripped before comparison. Longer forms
/// first so the bare abbreviation never clips them.
pub const SUBJECT_PREFIXES: &[&str] = &["تربية", "مبادئ", "مادة", "ت"];

/// One timetable slot paired with at most one matching record. Slots with
/// no match keep their record empty; they are never dropped.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciledRow {
    /// The timetable slot
    pub slot: ScheduleSlot,
    /// The first record whose normalized activity matched, if any
    pub record: Option<ExtractedRecord>,
}

/// Strip one leading subject prefix and surrounding whitespace.
///
/// A prefix only counts when it is a whole leading word: "ت علمية" loses
/// the abbreviation, "تعبير شفوي" keeps its first letter.
pub fn normalize_activity(name: &str) -> &str {
    let trimmed = name.trim();
    for prefix in SUBJECT_PREFIXES {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            if rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }
    trimmed
}

/// Whether two activity names refer to the same activity: after
/// normalization, one must contain the other
pub fn names_match(a: &str, b: &str) -> bool {
    let a = normalize_activity(a);
    let b = normalize_activity(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}

/// Align records against one day's slots.
///
/// Each slot independently takes the first record in source order whose
/// `activity_field` value matches its activity name. Output has exactly one
/// row per slot, in slot order; reconciliation never fails.
pub fn reconcile_day(
    slots: &[&ScheduleSlot],
    records: &[ExtractedRecord],
    activity_field: &str,
) -> Vec<ReconciledRow> {
    slots
        .iter()
        .map(|slot| {
            let record = records
                .iter()
                .find(|r| names_match(&slot.activity, &r.text(activity_field)))
                .cloned();
            ReconciledRow {
                slot: (*slot).clone(),
                record,
            }
        })
        .collect()
}
