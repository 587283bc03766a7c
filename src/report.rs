//! Missing-tasks report file.
//!
//! Plain text, one block per subject: the year-local code followed by a
//! colon, then the list of missing canonical task labels. The file is
//! truncated exactly once at run start and only appended to afterwards,
//! never read back mid-run.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::naming::TaskLabel;

pub struct MissingTasksReport {
    path: PathBuf,
}

impl MissingTasksReport {
    /// Create (and truncate) the report file.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Append one subject's block.
    pub fn append(&self, subject_code: &str, missing: &[TaskLabel]) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        let labels: Vec<&str> = missing.iter().map(TaskLabel::name).collect();
        writeln!(file, "{subject_code}:")?;
        writeln!(file, "{labels:?}")?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_truncates_and_append_writes_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_tasks.txt");
        fs::write(&path, "stale content from a previous run\n").unwrap();

        let report = MissingTasksReport::create(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        report
            .append("003", &[TaskLabel::new(2), TaskLabel::new(19)])
            .unwrap();
        report.append("011", &[TaskLabel::new(1)]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "003:\n[\"Task2\", \"Task19\"]\n011:\n[\"Task1\"]\n"
        );
    }
}
