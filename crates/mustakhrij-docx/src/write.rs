//! Daily-journal document generation

use std::path::Path;

use docx_rs::Docx;
use docx_rs::Paragraph;
use docx_rs::Run;
use docx_rs::Table;
use docx_rs::TableCell;
use docx_rs::TableRow;

use mustakhrij_core::error::Error;
use mustakhrij_core::error::Result;
use mustakhrij_core::reconcile::ReconciledRow;

/// Journal column headers, in table order
pub const JOURNAL_COLUMNS: [&str; 6] = [
    "التوقيت",
    "النشاط",
    "الموضوع",
    "الكفاءة القاعدية",
    "مؤشر الكفاءة",
    "ملاحظات",
];

/// Build the journal document for one day: a title line and the
/// fixed-column table with one row per reconciled slot, in slot order.
/// Unmatched slots keep their content cells empty.
pub fn build_journal(day: &str, rows: &[ReconciledRow]) -> Docx {
    let header = TableRow::new(JOURNAL_COLUMNS.iter().map(|name| cell(name)).collect());

    let mut table_rows = Vec::with_capacity(rows.len() + 1);
    table_rows.push(header);

    for row in rows {
        let (topic, competency, indicator) = match &row.record {
            Some(record) => (
                record.text("الموضوع"),
                record.text("الكفاءة_القاعدية"),
                record.text("مؤشر_الكفاءة"),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        table_rows.push(TableRow::new(vec![
            cell(&row.slot.time),
            cell(&row.slot.activity),
            cell(&topic),
            cell(&competency),
            cell(&indicator),
            cell(""),
        ]));
    }

    Docx::new()
        .add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(format!("المذكرة اليومية - {}", day))),
        )
        .add_table(Table::new(table_rows))
}

/// Build and write the journal to `path`
pub fn write_journal(day: &str, rows: &[ReconciledRow], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    build_journal(day, rows)
        .build()
        .pack(file)
        .map_err(|e| Error::document(format!("failed to write journal: {}", e)))?;
    Ok(())
}

fn cell(text: &str) -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_document_text;
    use mustakhrij_core::record::ExtractedRecord;
    use mustakhrij_core::timetable::ScheduleSlot;
    use serde_json::json;
    use std::io::Cursor;

    fn reconciled(day: &str) -> Vec<ReconciledRow> {
        let record = ExtractedRecord::new(
            vec![
                ("النشاط".to_string(), json!("رياضيات")),
                ("الموضوع".to_string(), json!("الجمع")),
                ("الكفاءة_القاعدية".to_string(), json!("يحسب مجموع عددين")),
                ("مؤشر_الكفاءة".to_string(), json!("ينجز العملية دون خطأ")),
            ],
            vec![],
        );
        vec![
            ReconciledRow {
                slot: ScheduleSlot::new(day, "08:00 - 08:45", "رياضيات"),
                record: Some(record),
            },
            ReconciledRow {
                slot: ScheduleSlot::new(day, "08:45 - 09:30", "قراءة"),
                record: None,
            },
        ]
    }

    #[test]
    fn test_journal_contains_headers_and_rows() {
        let rows = reconciled("الأحد");
        let mut cursor = Cursor::new(Vec::new());
        build_journal("الأحد", &rows)
            .build()
            .pack(&mut cursor)
            .unwrap();

        let text = read_document_text(&cursor.into_inner()).unwrap();
        assert!(text.contains("المذكرة اليومية - الأحد"));
        assert!(text.contains("التوقيت | النشاط | الموضوع"));
        assert!(text.contains("08:00 - 08:45 | رياضيات | الجمع"));
        // the unmatched slot keeps its time and activity, nothing else
        assert!(text.contains("08:45 - 09:30 | قراءة"));
        assert!(!text.contains("قراءة | غير مذكور"));
    }

    #[test]
    fn test_write_journal_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.docx");

        write_journal("الأحد", &reconciled("الأحد"), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(read_document_text(&bytes).unwrap().contains("رياضيات"));
    }
}
