//! Reconciliation driver.
//!
//! Walks the subject root one folder at a time and pushes each subject
//! through the pipeline: resolve the year-local code to its global id,
//! inventory the task artifacts, materialize one output frame per
//! canonical task slot (real or placeholder), record missing tasks, and
//! rename the subject folder to the global id, merging non-destructively
//! when the destination already exists.
//!
//! Per-subject failures are logged and skipped; they never abort the
//! batch. The only fatal startup condition is an unreadable code table,
//! which the caller hits before constructing the driver.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Result;
use crate::imaging;
use crate::inventory::{ArtifactKind, Inventory};
use crate::naming::TaskLabel;
use crate::renumber::RenumberTable;
use crate::report::MissingTasksReport;
use crate::roster::Roster;

/// Counters for one batch run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    /// Subjects taken through the full pipeline.
    pub reconciled: usize,
    /// Subjects skipped after a per-subject failure.
    pub skipped: usize,
    /// Roster subjects with no recorded participation this year, given
    /// full placeholder sets.
    pub absent: usize,
}

pub struct Reconciler<'a> {
    config: &'a Config,
    roster: &'a Roster,
    table: RenumberTable,
}

impl<'a> Reconciler<'a> {
    pub fn new(config: &'a Config, roster: &'a Roster, table: RenumberTable) -> Self {
        Self {
            config,
            roster,
            table,
        }
    }

    /// Year-local subject folders awaiting reconciliation, sorted by
    /// code so processing order is deterministic. Folders already named
    /// with the global convention were reconciled earlier and are
    /// excluded, which makes a second run over the same tree a no-op.
    pub fn discover_subjects(&self) -> Result<Vec<String>> {
        let mut codes = Vec::new();
        for entry in fs::read_dir(&self.config.subject_root)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if self.config.is_global_code(&name) {
                continue;
            }
            codes.push(name);
        }
        codes.sort();
        Ok(codes)
    }

    /// Ensure one destination folder per canonical task exists.
    pub fn prepare_task_folders(&self) -> Result<()> {
        for number in self.table.canonical_numbers() {
            fs::create_dir_all(self.config.tasks_root.join(TaskLabel::new(number).name()))?;
        }
        Ok(())
    }

    fn task_destination(&self, global_id: &str, canonical: u32) -> PathBuf {
        let label = TaskLabel::new(canonical);
        self.config
            .tasks_root
            .join(label.name())
            .join(format!("{global_id}_{label}.png"))
    }

    /// Roster subjects with an empty cell for this year still get a full
    /// canonical output set under their global id, so the destination
    /// tree is uniform regardless of participation. An empty subject
    /// folder is created for them as well.
    pub fn materialize_absent_subjects(&self) -> Result<usize> {
        let mut count = 0;
        for (global_id, year_code) in self.roster.participation(&self.config.year) {
            if !year_code.is_empty() {
                continue;
            }
            count += 1;

            let folder = self.config.subject_root.join(global_id);
            if !folder.exists() {
                fs::create_dir_all(&folder)?;
                info!(subject = %global_id, "created folder for absent subject");
            }
            for number in self.table.canonical_numbers() {
                imaging::write_blank(&self.task_destination(global_id, number))?;
            }
        }
        Ok(count)
    }

    /// Run one subject through the full pipeline. Errors bubble to the
    /// caller, which logs and moves on to the next subject.
    pub fn reconcile_subject(&self, year_code: &str, report: &MissingTasksReport) -> Result<()> {
        let subject_path = self.config.subject_root.join(year_code);
        let global_id = self
            .roster
            .resolve(year_code, &self.config.year)?
            .to_string();

        let inventory = Inventory::build(&subject_path, ArtifactKind::Image, &self.table)?;

        // One output per canonical slot, present or placeholder, never a gap.
        for number in self.table.canonical_numbers() {
            let dest = self.task_destination(&global_id, number);
            match inventory.present.get(&number) {
                Some(source) => imaging::crop_and_resize(source, &dest)?,
                None => imaging::write_blank(&dest)?,
            }
        }

        if !inventory.missing.is_empty() {
            report.append(year_code, &inventory.missing_labels())?;
        }

        if year_code != global_id {
            self.rename_subject_folder(&subject_path, &self.config.subject_root.join(&global_id))?;
        }

        Ok(())
    }

    /// Rename the subject folder to its global id. When the destination
    /// already exists (two year-local codes collapsing onto one global
    /// id, or a partial earlier run) the contents are merged instead,
    /// destination wins per file; the leftover source folder is not
    /// removed here.
    fn rename_subject_folder(&self, source: &Path, dest: &Path) -> Result<()> {
        if !dest.exists() {
            fs::rename(source, dest)?;
            return Ok(());
        }
        warn!(
            source = %source.display(),
            dest = %dest.display(),
            "destination folder already exists; merging contents"
        );
        merge_folders(source, dest)
    }

    /// Drive the whole batch: per-task destination folders, placeholder
    /// sets for absent subjects, then every discovered subject in order.
    /// `progressed` is called once per subject, success or not.
    pub fn run<F>(
        &self,
        subjects: &[String],
        report: &MissingTasksReport,
        mut progressed: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&str),
    {
        self.prepare_task_folders()?;

        let mut summary = RunSummary {
            absent: self.materialize_absent_subjects()?,
            ..RunSummary::default()
        };
        info!(absent = summary.absent, "placeholder sets written for absent subjects");

        for code in subjects {
            match self.reconcile_subject(code, report) {
                Ok(()) => summary.reconciled += 1,
                Err(e) => {
                    warn!(subject = %code, error = %e, "subject skipped");
                    summary.skipped += 1;
                }
            }
            progressed(code);
        }

        Ok(summary)
    }
}

/// Recursively copy `source` into `dest`, skipping any file that already
/// exists at the destination path. The source tree is left in place;
/// removing it afterwards is caller policy, not the driver's.
pub fn merge_folders(source: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .expect("walkdir yields children of its root");
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if !target.exists() {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
