//! Per-subject task artifact inventory.
//!
//! Enumerates one subject's artifacts of a given kind, normalizes and
//! renumbers their names, and splits the canonical task range into the
//! slots that have a source file and the slots that do not.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::naming::{normalize_task_name, TaskLabel};
use crate::renumber::RenumberTable;

/// Subfolder of a subject directory holding image artifacts.
pub const IMAGES_DIR: &str = "Images";

/// Which kind of per-task artifact to inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// `.png` frames under the subject's `Images/` subfolder.
    Image,
    /// `.csv` exports loose in the subject root.
    Tabular,
}

impl ArtifactKind {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Image => "png",
            Self::Tabular => "csv",
        }
    }

    /// Directory holding this kind's files, relative to the subject folder.
    fn artifact_dir(&self, subject_folder: &Path) -> PathBuf {
        match self {
            Self::Image => subject_folder.join(IMAGES_DIR),
            Self::Tabular => subject_folder.to_path_buf(),
        }
    }
}

/// The split of the canonical task range for one subject.
#[derive(Debug, Default)]
pub struct Inventory {
    /// Canonical task number → source file path.
    pub present: BTreeMap<u32, PathBuf>,
    /// Canonical task numbers with no source artifact.
    pub missing: BTreeSet<u32>,
}

impl Inventory {
    /// Build the inventory for one subject folder.
    ///
    /// Enumeration is non-recursive and restricted to the kind's
    /// extension. Files whose stems carry no task number, and task
    /// numbers the renumbering table drops, are skipped silently. When
    /// two files land on the same canonical slot the later one wins,
    /// with a warning. A missing artifact subfolder is created as a side
    /// effect, so `missing` then covers the whole canonical range.
    pub fn build(subject_folder: &Path, kind: ArtifactKind, table: &RenumberTable) -> Result<Self> {
        let dir = kind.artifact_dir(subject_folder);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(kind.extension()) {
                continue;
            }
            files.push(path);
        }
        // Deterministic enumeration order: shortest name first, then
        // lexicographic, matching the source data's ordering convention.
        files.sort_by_key(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            (name.len(), name)
        });

        let mut present: BTreeMap<u32, PathBuf> = BTreeMap::new();
        for path in files {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            let Some(label) = normalize_task_name(stem) else {
                continue;
            };
            let Some(canonical) = table.lookup(label.number()) else {
                continue;
            };
            if let Some(previous) = present.insert(canonical, path.clone()) {
                warn!(
                    task = %TaskLabel::new(canonical),
                    kept = %path.display(),
                    replaced = %previous.display(),
                    "two source files map to the same canonical task; keeping the later one"
                );
            }
        }

        let missing = table
            .canonical_numbers()
            .filter(|n| !present.contains_key(n))
            .collect();

        Ok(Self { present, missing })
    }

    /// Missing canonical task labels, in order.
    pub fn missing_labels(&self) -> Vec<TaskLabel> {
        self.missing.iter().map(|&n| TaskLabel::new(n)).collect()
    }
}
