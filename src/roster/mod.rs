//! Subject identity resolution.
//!
//! The code table maps each global subject id to the folder name the
//! subject was recorded under in each collection year (`Id` column plus
//! one column per year, e.g. `Year_1`..`Year_3`). A year cell is empty
//! when the subject did not participate that year; a year column missing
//! from the file means nobody participated that year.
//!
//! Duplicate year-local codes within one column are a data bug in the
//! reference table. They are detected at load time and fail the run
//! before any subject is touched, rather than silently resolving to
//! whichever row happens to come first.

pub mod bootstrap;

use std::collections::HashMap;
use std::path::Path;

use crate::error::{ReconcileError, Result};

/// One row of the code table.
#[derive(Debug, Clone)]
pub struct RosterRow {
    /// Global subject id, e.g. `CRC_SUBJECT_004`.
    pub id: String,
    /// Year label → year-local code; empty string when the subject did
    /// not participate that year.
    pub codes: HashMap<String, String>,
}

/// The loaded code table, indexed per year for resolution.
#[derive(Debug)]
pub struct Roster {
    rows: Vec<RosterRow>,
    /// year label → (year-local code → row index); codes validated
    /// unique per year at load.
    by_year: HashMap<String, HashMap<String, usize>>,
}

impl Roster {
    /// Load the code table from a CSV file. `years` names the year
    /// columns to index; fields are whitespace-trimmed.
    pub fn load(path: &Path, years: &[&str]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let id_idx = headers
            .iter()
            .position(|h| h == "Id")
            .ok_or_else(|| ReconcileError::MissingIdColumn(path.to_path_buf()))?;

        let year_idx: Vec<(String, Option<usize>)> = years
            .iter()
            .map(|year| {
                (
                    year.to_string(),
                    headers.iter().position(|h| h == *year),
                )
            })
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let id = record.get(id_idx).unwrap_or("").to_string();
            let mut codes = HashMap::new();
            for (year, idx) in &year_idx {
                let code = idx
                    .and_then(|i| record.get(i))
                    .unwrap_or("")
                    .to_string();
                codes.insert(year.clone(), code);
            }
            rows.push(RosterRow { id, codes });
        }

        let by_year = Self::index(&rows, years)?;
        Ok(Self { rows, by_year })
    }

    fn index(rows: &[RosterRow], years: &[&str]) -> Result<HashMap<String, HashMap<String, usize>>> {
        let mut by_year: HashMap<String, HashMap<String, usize>> = HashMap::new();
        for year in years {
            by_year.insert(year.to_string(), HashMap::new());
        }

        for (row_idx, row) in rows.iter().enumerate() {
            for (year, code) in &row.codes {
                if code.is_empty() {
                    continue;
                }
                let column = by_year.entry(year.clone()).or_default();
                if let Some(&prev) = column.get(code) {
                    return Err(ReconcileError::DuplicateYearCode {
                        code: code.clone(),
                        year: year.clone(),
                        first: rows[prev].id.clone(),
                        second: row.id.clone(),
                    });
                }
                column.insert(code.clone(), row_idx);
            }
        }

        Ok(by_year)
    }

    /// Resolve a year-local folder code to the global subject id.
    ///
    /// Fails with [`ReconcileError::IdentityNotFound`] when no row's
    /// `year` column equals `year_local`. Per-subject, non-fatal: the
    /// caller logs it and skips the subject.
    pub fn resolve(&self, year_local: &str, year: &str) -> Result<&str> {
        self.by_year
            .get(year)
            .and_then(|column| column.get(year_local))
            .map(|&idx| self.rows[idx].id.as_str())
            .ok_or_else(|| ReconcileError::IdentityNotFound {
                code: year_local.to_string(),
                year: year.to_string(),
            })
    }

    /// (global id, year-local code for `year`) for every subject. The
    /// code is empty for subjects with no recorded participation.
    pub fn participation<'a>(&'a self, year: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.rows.iter().map(move |row| {
            (
                row.id.as_str(),
                row.codes.get(year).map(String::as_str).unwrap_or(""),
            )
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YEARS: &[&str] = &["Year_1", "Year_2", "Year_3"];

    fn write_table(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_resolve_hit_and_miss() {
        let file = write_table(
            "Id,Year_1,Year_2,Year_3\n\
             CRC_SUBJECT_003,a1,,007\n\
             CRC_SUBJECT_004,b1,b2,003\n",
        );
        let roster = Roster::load(file.path(), YEARS).unwrap();

        assert_eq!(roster.resolve("003", "Year_3").unwrap(), "CRC_SUBJECT_004");
        assert_eq!(roster.resolve("a1", "Year_1").unwrap(), "CRC_SUBJECT_003");
        assert!(matches!(
            roster.resolve("999", "Year_3"),
            Err(ReconcileError::IdentityNotFound { .. })
        ));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let file = write_table("Id,Year_3\nCRC_SUBJECT_001, 003 \n");
        let roster = Roster::load(file.path(), YEARS).unwrap();
        assert_eq!(roster.resolve("003", "Year_3").unwrap(), "CRC_SUBJECT_001");
    }

    #[test]
    fn test_missing_year_column_means_no_participation() {
        let file = write_table("Id,Year_1\nCRC_SUBJECT_001,a1\n");
        let roster = Roster::load(file.path(), YEARS).unwrap();

        assert!(roster.resolve("a1", "Year_3").is_err());
        let absent: Vec<_> = roster
            .participation("Year_3")
            .filter(|(_, code)| code.is_empty())
            .collect();
        assert_eq!(absent.len(), 1);
    }

    #[test]
    fn test_duplicate_year_code_fails_the_load() {
        let file = write_table(
            "Id,Year_3\n\
             CRC_SUBJECT_001,003\n\
             CRC_SUBJECT_002,003\n",
        );
        let err = Roster::load(file.path(), YEARS).unwrap_err();
        match err {
            ReconcileError::DuplicateYearCode { code, year, first, second } => {
                assert_eq!(code, "003");
                assert_eq!(year, "Year_3");
                assert_eq!(first, "CRC_SUBJECT_001");
                assert_eq!(second, "CRC_SUBJECT_002");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_id_column_is_rejected() {
        let file = write_table("Code,Year_3\nx,003\n");
        assert!(matches!(
            Roster::load(file.path(), YEARS),
            Err(ReconcileError::MissingIdColumn(_))
        ));
    }
}
