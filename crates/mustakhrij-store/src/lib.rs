//! Mustakhrij Store - append-only local report table
//!
//! Reports are only ever inserted, never updated in place; the read path
//! returns the most recent N rows by timestamp.

#![warn(missing_docs)]

use std::path::Path;

use chrono::Utc;
use mustakhrij_core::error::Error;
use mustakhrij_core::error::Result;
use rusqlite::params;
use rusqlite::Connection;
use serde::Serialize;

/// One stored report row
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    /// Title as extracted
    pub title: String,
    /// Lowercased, trimmed title used for lookups
    pub normalized_title: String,
    /// Director name (sentinel text when unknown)
    pub director: String,
    /// Genre names
    pub genres: Vec<String>,
    /// Critique score
    pub score: Option<f64>,
    /// Release year
    pub year: Option<i64>,
    /// Row kind, e.g. `"critique"` or `"comparison"`
    pub kind: String,
    /// Unix timestamp of the append
    pub created_at: i64,
}

impl ReportRow {
    /// Assemble a row stamped with the current time
    pub fn new(
        title: impl Into<String>,
        director: impl Into<String>,
        genres: Vec<String>,
        score: Option<f64>,
        year: Option<i64>,
        kind: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            normalized_title: normalize_title(&title),
            title,
            director: director.into(),
            genres,
            score,
            year,
            kind: kind.into(),
            created_at: Utc::now().timestamp(),
        }
    }
}

/// Lookup form of a title
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Append-only report store
pub struct ReportStore {
    conn: Connection,
}

impl ReportStore {
    /// Open (or create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(db_err)?;
        Self::with_connection(conn)
    }

    /// In-memory store, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS reports (
                title TEXT NOT NULL,
                normalized_title TEXT NOT NULL,
                director TEXT NOT NULL,
                genres TEXT NOT NULL,
                score REAL,
                year INTEGER,
                kind TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            [],
        )
        .map_err(db_err)?;
        Ok(Self { conn })
    }

    /// Append one row
    pub fn append(&self, row: &ReportRow) -> Result<()> {
        let genres_json = serde_json::to_string(&row.genres)?;
        self.conn
            .execute(
                "INSERT INTO reports
                 (title, normalized_title, director, genres, score, year, kind, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    row.title,
                    row.normalized_title,
                    row.director,
                    genres_json,
                    row.score,
                    row.year,
                    row.kind,
                    row.created_at,
                ],
            )
            .map_err(db_err)?;
        Ok(())
    }

    /// The most recent `n` rows, newest first
    pub fn recent(&self, n: usize) -> Result<Vec<ReportRow>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT title, normalized_title, director, genres, score, year, kind, created_at
                 FROM reports ORDER BY created_at DESC, rowid DESC LIMIT ?1",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map([n as i64], |row| {
                let genres_json: String = row.get(3)?;
                Ok(ReportRow {
                    title: row.get(0)?,
                    normalized_title: row.get(1)?,
                    director: row.get(2)?,
                    genres: serde_json::from_str(&genres_json).unwrap_or_default(),
                    score: row.get(4)?,
                    year: row.get(5)?,
                    kind: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })
            .map_err(db_err)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.map_err(db_err)?);
        }
        Ok(result)
    }
}

fn db_err(e: rusqlite::Error) -> Error {
    Error::storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, created_at: i64) -> ReportRow {
        let mut row = ReportRow::new(
            title,
            "Akira Kurosawa",
            vec!["drama".to_string()],
            Some(9.0),
            Some(1985),
            "critique",
        );
        row.created_at = created_at;
        row
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  Ran "), "ran");
        assert_eq!(normalize_title("KAGEMUSHA"), "kagemusha");
    }

    #[test]
    fn test_append_and_recent_ordering() {
        let store = ReportStore::open_in_memory().unwrap();
        store.append(&row("Ran", 100)).unwrap();
        store.append(&row("Kagemusha", 300)).unwrap();
        store.append(&row("Ikiru", 200)).unwrap();

        let recent = store.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].title, "Kagemusha");
        assert_eq!(recent[1].title, "Ikiru");
        assert_eq!(recent[0].genres, vec!["drama"]);
    }

    #[test]
    fn test_open_creates_file_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.db");
        {
            let store = ReportStore::open(&path).unwrap();
            store.append(&row("Ran", 1)).unwrap();
        }
        let store = ReportStore::open(&path).unwrap();
        let recent = store.recent(10).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].title, "Ran");
        assert_eq!(recent[0].normalized_title, "ran");
    }

    #[test]
    fn test_nullable_columns() {
        let store = ReportStore::open_in_memory().unwrap();
        let row = ReportRow::new("Obscure", "unspecified", vec![], None, None, "critique");
        store.append(&row).unwrap();

        let recent = store.recent(1).unwrap();
        assert!(recent[0].score.is_none());
        assert!(recent[0].year.is_none());
        assert!(recent[0].genres.is_empty());
    }
}
