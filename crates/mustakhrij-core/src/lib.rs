//! Mustakhrij Core - Core types for structured extraction from model output
//!
//! This crate provides the fundamental building blocks of the system:
//! - Extraction schemas and extracted records
//! - Best-effort JSON recovery from free-text model replies
//! - Schema validation with sentinel-filling for missing fields
//! - Weekly timetable types and activity-name reconciliation
//! - Error types and result definitions

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod reconcile;
pub mod record;
pub mod recover;
pub mod schema;
pub mod timetable;
pub mod validate;

pub use error::Error;
pub use error::Result;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::reconcile::reconcile_day;
    pub use crate::reconcile::ReconciledRow;
    pub use crate::record::ExtractedRecord;
    pub use crate::recover::recover_json;
    pub use crate::schema::ExtractionSchema;
    pub use crate::schema::FieldKind;
    pub use crate::schema::FieldSpec;
    pub use crate::timetable::ScheduleSlot;
    pub use crate::timetable::Timetable;
    pub use crate::validate::validate;
    pub use crate::validate::ValidationReport;
}
