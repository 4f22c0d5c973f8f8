//! Mustakhrij Metadata - movie metadata enrichment
//!
//! A thin client for a hosted movie database: search by title, fetch
//! detail by numeric id, and compose both into a best-effort enrichment.
//! Enrichment failures degrade to "no data"; they never abort a pipeline.

#![warn(missing_docs)]

mod tmdb;
pub use tmdb::Enrichment;
pub use tmdb::MovieDetail;
pub use tmdb::SearchHit;
pub use tmdb::TmdbClient;
pub use tmdb::TmdbConfig;
