//! Error taxonomy for the reconciliation engine.
//!
//! Only conditions that surface as `Err` live here. Filenames carrying no
//! discoverable task number and task numbers excluded by the renumbering
//! policy are silently dropped during inventory construction; they are
//! policy, not errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Year-local code absent from the code table. Non-fatal: the caller
    /// logs it and skips the subject, the run continues.
    #[error("subject code {code:?} not found in the {year} column of the code table")]
    IdentityNotFound { code: String, year: String },

    /// Two rows of the code table carry the same year-local code for one
    /// year. Detected at load time so a bad table fails the run before
    /// any subject is touched.
    #[error("duplicate code {code:?} in column {year}: held by both {first} and {second}")]
    DuplicateYearCode {
        code: String,
        year: String,
        first: String,
        second: String,
    },

    /// The code table has no `Id` column.
    #[error("code table {} has no Id column", .0.display())]
    MissingIdColumn(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("image operation on {} failed: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
