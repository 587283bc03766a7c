//! Task filename normalization.
//!
//! Session recordings name their per-task files inconsistently across
//! collection years: `Task_7`, `Task7_retry`, `Task7`, `Task7b` all refer
//! to original task 7. This module folds every recognized style into the
//! separator-free canonical form `Task7` so that downstream maps keyed on
//! the normalized name collapse the styles onto one entry.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed string prefix every task artifact carries.
pub const TASK_PREFIX: &str = "Task";

/// A normalized task name: the separator-free `Task<N>` string plus the
/// parsed number.
///
/// The number lives in whichever numbering epoch the caller is working
/// in (original before renumbering, canonical after). The two epochs are
/// only bridged through [`RenumberTable`](crate::renumber::RenumberTable);
/// labels from different epochs must never be compared directly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskLabel {
    name: String,
    number: u32,
}

impl TaskLabel {
    pub fn new(number: u32) -> Self {
        Self {
            name: format!("{TASK_PREFIX}{number}"),
            number,
        }
    }

    /// The canonical string form, e.g. `Task7`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for TaskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// The three anchored patterns cover the naming styles observed in the
// source data; the loose scan is a fallback for anything they miss.
static UNDERSCORE_BEFORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Task_(\d+)").unwrap());
static UNDERSCORE_AFTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Task(\d+)_").unwrap());
static BARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Task(\d+)($|[^_])").unwrap());
static LOOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Task_?(\d+)").unwrap());

/// Normalize a bare file stem (no extension, no directory) into a task
/// label in the original numbering epoch.
///
/// Patterns are tried in precedence order, first match wins. Whichever
/// style was present, the separator is stripped: `Task_7`, `Task7_x` and
/// `Task7z` all normalize to `Task7`. Leading zeros are accepted and do
/// not change the numeric value; no upper bound is enforced on the
/// number. Returns `None` when the stem carries no task number at all.
pub fn normalize_task_name(stem: &str) -> Option<TaskLabel> {
    for re in [&*UNDERSCORE_BEFORE, &*UNDERSCORE_AFTER, &*BARE, &*LOOSE] {
        if let Some(caps) = re.captures(stem) {
            let number = caps[1].parse().ok()?;
            return Some(TaskLabel::new(number));
        }
    }
    None
}
