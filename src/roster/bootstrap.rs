//! Code-table bootstrap from first-year profile records.
//!
//! Each first-year subject folder carries a free-text `*Profile*.txt`
//! record. This scans those folders in sorted order, assigns global ids
//! (`<PREFIX>_SUBJECT_NNN`, zero-padded to three digits), and writes two
//! CSVs: the profile table and the initial code table with only the
//! first-year column filled in.
//!
//! Profile records are parsed as keyed `Field: value` lines matched by
//! label, not by line position, so reordering or adding fields cannot
//! silently corrupt the tables.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::error::Result;

/// Fields extracted from one subject's profile record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRecord {
    pub name: String,
    pub surname: String,
    pub sex: String,
    pub birthdate: String,
    pub hand: String,
    pub class: String,
    /// Folder name the subject was recorded under in the first year.
    pub folder: String,
}

/// One row of the profile table CSV.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ProfileRow {
    id: String,
    name: String,
    surname: String,
    sex: String,
    birthdate: String,
    hand: String,
    class: String,
}

/// Counters from one bootstrap pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct BootstrapOutcome {
    /// Subjects written to the tables.
    pub subjects: usize,
    /// Folders skipped because no profile record was found.
    pub without_profile: usize,
}

fn field_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Parse a profile record from its free-text form. Lines that are not
/// `Field: value` pairs, and labels that are not recognized, are
/// ignored; missing fields stay empty.
pub fn parse_profile(text: &str) -> ProfileRecord {
    let mut record = ProfileRecord::default();
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        match field_key(key).as_str() {
            "name" => record.name = value,
            "surname" => record.surname = value,
            "sex" => record.sex = value,
            "birthdate" => record.birthdate = value,
            "hand" | "dominanthand" => record.hand = value,
            "class" => record.class = value,
            "folder" | "firstyearfolder" => record.folder = value.replace(' ', ""),
            _ => {}
        }
    }
    record
}

/// Locate the profile record inside one subject folder. Several matches
/// are a data-entry slip: the first (sorted) file wins with a warning.
fn find_profile_file(subject_path: &Path) -> Result<Option<std::path::PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(subject_path)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.to_ascii_lowercase().contains("profile") && name.ends_with(".txt") {
            candidates.push(path);
        }
    }
    candidates.sort();
    if candidates.len() > 1 {
        warn!(
            subject = %subject_path.display(),
            count = candidates.len(),
            "subject has more than one profile record; using the first"
        );
    }
    Ok(candidates.into_iter().next())
}

/// Scan the first-year subject folders and write the profile table and
/// the initial code table.
///
/// `years` names the code-table year columns; the first one receives
/// each subject's first-year folder code, the rest start empty.
pub fn build_roster(
    subject_root: &Path,
    profile_table: &Path,
    code_table: &Path,
    prefix: &str,
    years: &[&str],
) -> Result<BootstrapOutcome> {
    let mut folders: Vec<String> = Vec::new();
    for entry in fs::read_dir(subject_root)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        folders.push(entry.file_name().to_string_lossy().to_string());
    }
    folders.sort();

    let mut outcome = BootstrapOutcome::default();
    let mut profile_rows = Vec::new();
    let mut code_rows = Vec::new();

    for folder in &folders {
        let subject_path = subject_root.join(folder);
        let Some(profile_path) = find_profile_file(&subject_path)? else {
            warn!(subject = %folder, "no profile record found; subject left out of the tables");
            outcome.without_profile += 1;
            continue;
        };

        let record = parse_profile(&fs::read_to_string(&profile_path)?);
        outcome.subjects += 1;
        let id = format!("{prefix}_SUBJECT_{:03}", outcome.subjects);

        profile_rows.push(ProfileRow {
            id: id.clone(),
            name: record.name,
            surname: record.surname,
            sex: record.sex,
            birthdate: record.birthdate,
            hand: record.hand,
            class: record.class,
        });
        code_rows.push((id, record.folder));
    }

    let mut profile_writer = csv::Writer::from_path(profile_table)?;
    for row in &profile_rows {
        profile_writer.serialize(row)?;
    }
    profile_writer.flush()?;

    let mut code_writer = csv::Writer::from_path(code_table)?;
    let mut header = vec!["Id"];
    header.extend_from_slice(years);
    code_writer.write_record(&header)?;
    for (id, first_year_code) in &code_rows {
        let mut record = vec![id.as_str(), first_year_code.as_str()];
        record.extend(std::iter::repeat("").take(years.len().saturating_sub(1)));
        code_writer.write_record(&record)?;
    }
    code_writer.flush()?;

    Ok(outcome)
}
