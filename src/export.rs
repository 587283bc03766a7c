//! Flat export of one original task across reconciled subjects.
//!
//! Pulls a single task's source image (by original number) out of every
//! subject folder already named with the global convention and copies it
//! into one flat directory as `<globalId>.png`. Useful for review passes
//! over a single task, e.g. the rating task recorded as original 26.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::inventory::IMAGES_DIR;

/// Counters from one export pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExportOutcome {
    /// Subjects whose task image was found and copied.
    pub copied: usize,
    /// Reconciled subjects without the requested task image.
    pub without_task: usize,
}

/// Copy `Task_<original>.png` from every `<prefix>_SUBJECT_*` folder
/// under `subject_root` into `dest`, named by the subject's global id.
/// Subjects missing the file are counted but not an error.
pub fn export_single_task(
    subject_root: &Path,
    dest: &Path,
    prefix: &str,
    original_task: u32,
) -> Result<ExportOutcome> {
    fs::create_dir_all(dest)?;
    let marker = format!("{prefix}_SUBJECT_");

    let mut subjects: Vec<String> = Vec::new();
    for entry in fs::read_dir(subject_root)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(&marker) {
            subjects.push(name);
        }
    }
    subjects.sort();

    let mut outcome = ExportOutcome::default();
    for global_id in &subjects {
        let image_path = subject_root
            .join(global_id)
            .join(IMAGES_DIR)
            .join(format!("Task_{original_task}.png"));
        if !image_path.is_file() {
            debug!(subject = %global_id, task = original_task, "task image not present");
            outcome.without_task += 1;
            continue;
        }
        fs::copy(&image_path, dest.join(format!("{global_id}.png")))?;
        outcome.copied += 1;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_export_copies_only_reconciled_subjects_with_the_task() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("subjects");
        let dest = dir.path().join("export");

        let with_task = root.join("CRC_SUBJECT_001").join(IMAGES_DIR);
        fs::create_dir_all(&with_task).unwrap();
        fs::write(with_task.join("Task_26.png"), "frame").unwrap();

        fs::create_dir_all(root.join("CRC_SUBJECT_002").join(IMAGES_DIR)).unwrap();

        // Not yet reconciled; ignored even if it has the task.
        let raw = root.join("003").join(IMAGES_DIR);
        fs::create_dir_all(&raw).unwrap();
        fs::write(raw.join("Task_26.png"), "frame").unwrap();

        let outcome = export_single_task(&root, &dest, "CRC", 26).unwrap();
        assert_eq!(outcome.copied, 1);
        assert_eq!(outcome.without_task, 1);
        assert!(dest.join("CRC_SUBJECT_001.png").is_file());
        assert!(!dest.join("003.png").exists());
    }
}
