//! Flatten a Word document into plain text
//!
//! Paragraphs come out one per line; table rows are flattened cell by cell
//! and joined with `" | "` so row structure survives into the prompt.

use std::path::Path;

use docx_rs::read_docx;
use docx_rs::DocumentChild;
use docx_rs::Paragraph;
use docx_rs::ParagraphChild;
use docx_rs::Run;
use docx_rs::RunChild;
use docx_rs::Table;
use docx_rs::TableCellContent;
use docx_rs::TableChild;
use docx_rs::TableRowChild;

use mustakhrij_core::error::Error;
use mustakhrij_core::error::Result;

/// Extract the text of a `.docx` file
pub fn read_document_text(bytes: &[u8]) -> Result<String> {
    let docx =
        read_docx(bytes).map_err(|e| Error::document(format!("failed to read document: {}", e)))?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => {
                if let Some(text) = paragraph_text(paragraph.as_ref()) {
                    lines.push(text);
                }
            }
            DocumentChild::Table(table) => collect_table_rows(table.as_ref(), &mut lines),
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}

/// Read the subject text from a path: `.docx` via document extraction,
/// anything else as plain UTF-8 text
pub fn read_input_text(path: &Path) -> Result<String> {
    let is_docx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));

    if is_docx {
        let bytes = std::fs::read(path)?;
        read_document_text(&bytes)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn paragraph_text(paragraph: &Paragraph) -> Option<String> {
    let mut buffer = String::new();
    for child in &paragraph.children {
        append_paragraph_child_text(child, &mut buffer);
    }
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn append_paragraph_child_text(child: &ParagraphChild, buffer: &mut String) {
    match child {
        ParagraphChild::Run(run) => append_run_text(run.as_ref(), buffer),
        ParagraphChild::Hyperlink(hyperlink) => {
            for inner in &hyperlink.children {
                append_paragraph_child_text(inner, buffer);
            }
        }
        _ => {}
    }
}

fn append_run_text(run: &Run, buffer: &mut String) {
    for child in &run.children {
        if let RunChild::Text(text) = child {
            buffer.push_str(&text.text);
        }
    }
}

/// One line per table row, cells joined with `" | "`
fn collect_table_rows(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;

        let mut cells = Vec::new();
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;

            let mut cell_text = String::new();
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => {
                        if let Some(text) = paragraph_text(paragraph) {
                            if !cell_text.is_empty() {
                                cell_text.push(' ');
                            }
                            cell_text.push_str(&text);
                        }
                    }
                    TableCellContent::Table(inner) => collect_table_rows(inner, lines),
                    _ => {}
                }
            }
            if !cell_text.is_empty() {
                cells.push(cell_text);
            }
        }
        if !cells.is_empty() {
            lines.push(cells.join(" | "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::Docx;
    use docx_rs::TableCell;
    use docx_rs::TableRow;
    use std::io::Cursor;

    fn pack(docx: Docx) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    fn paragraph(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    #[test]
    fn test_paragraphs_one_per_line() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(paragraph("النشاط: رياضيات"))
                .add_paragraph(paragraph(""))
                .add_paragraph(paragraph("الموضوع: الجمع")),
        );
        let text = read_document_text(&bytes).unwrap();
        assert_eq!(text, "النشاط: رياضيات\nالموضوع: الجمع");
    }

    #[test]
    fn test_table_rows_joined_with_pipes() {
        let table = Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(paragraph("النشاط")),
            TableCell::new().add_paragraph(paragraph("قراءة")),
        ])]);
        let bytes = pack(Docx::new().add_paragraph(paragraph("مقدمة")).add_table(table));
        let text = read_document_text(&bytes).unwrap();
        assert_eq!(text, "مقدمة\nالنشاط | قراءة");
    }

    #[test]
    fn test_garbage_bytes_is_document_error() {
        let err = read_document_text(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, Error::Document(_)));
    }
}
