//! Run configuration.
//!
//! All paths and domain constants for one batch invocation, resolved
//! once in `main` and injected by reference into the driver. Nothing in
//! here is process-wide state.

use std::path::PathBuf;

/// Year columns the code table may carry, in collection order.
pub const YEAR_COLUMNS: [&str; 3] = ["Year_1", "Year_2", "Year_3"];

#[derive(Debug, Clone)]
pub struct Config {
    /// Root containing one folder per subject for the year being reconciled.
    pub subject_root: PathBuf,
    /// Destination root; one folder per canonical task, created on demand.
    pub tasks_root: PathBuf,
    /// Code table CSV (`Id` plus one column per year).
    pub code_table: PathBuf,
    /// Missing-tasks report file.
    pub report_path: PathBuf,
    /// Code-table column for this run, e.g. `Year_3`.
    pub year: String,
    /// Prefix of global subject ids, e.g. `CRC` for `CRC_SUBJECT_001`.
    pub prefix: String,
}

impl Config {
    /// Whether a folder name already follows the global-code convention,
    /// meaning it was reconciled by an earlier run.
    pub fn is_global_code(&self, folder_name: &str) -> bool {
        folder_name.starts_with(&self.prefix)
    }
}
