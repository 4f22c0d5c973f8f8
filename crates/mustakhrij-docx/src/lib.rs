//! Mustakhrij Docx - Word document ingestion and generation
//!
//! The read path flattens a notes document into plain text for the prompt
//! builder; the write path fills the fixed-column daily journal from
//! reconciled rows.

#![warn(missing_docs)]

mod read;
pub use read::read_document_text;
pub use read::read_input_text;

mod write;
pub use write::build_journal;
pub use write::write_journal;
pub use write::JOURNAL_COLUMNS;
