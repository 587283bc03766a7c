//! Batch CLI for reconciling one collection year of session data.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use session_reconciler::config::{Config, YEAR_COLUMNS};
use session_reconciler::export::export_single_task;
use session_reconciler::reconcile::Reconciler;
use session_reconciler::renumber::RenumberTable;
use session_reconciler::report::MissingTasksReport;
use session_reconciler::roster::{bootstrap, Roster};

#[derive(Parser)]
#[command(
    name = "session-reconciler",
    version,
    about = "Reconciles per-subject session artifacts into a canonical subject-id and task-numbering scheme"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile one year's subject folders into the canonical tree
    Reconcile {
        /// Root containing one folder per subject
        #[arg(long)]
        subjects: PathBuf,
        /// Destination root for the canonical per-task folders
        #[arg(long)]
        tasks: PathBuf,
        /// Code table CSV (Id plus one column per year)
        #[arg(long)]
        codes: PathBuf,
        /// Missing-tasks report file (truncated at run start)
        #[arg(long)]
        report: PathBuf,
        /// Code-table column to reconcile against
        #[arg(long, default_value = "Year_3")]
        year: String,
        /// Prefix of global subject ids
        #[arg(long, default_value = "CRC")]
        prefix: String,
    },
    /// Build the code and profile tables from first-year profile records
    BuildRoster {
        /// Root containing one folder per first-year subject
        #[arg(long)]
        subjects: PathBuf,
        /// Profile table CSV to write
        #[arg(long)]
        profiles: PathBuf,
        /// Code table CSV to write
        #[arg(long)]
        codes: PathBuf,
        /// Prefix of global subject ids
        #[arg(long, default_value = "CRC")]
        prefix: String,
    },
    /// Copy one original task's image from every reconciled subject into a flat folder
    ExportTask {
        /// Root containing the reconciled subject folders
        #[arg(long)]
        subjects: PathBuf,
        /// Flat destination directory
        #[arg(long)]
        dest: PathBuf,
        /// Original task number to export
        #[arg(long, default_value_t = 26)]
        task: u32,
        /// Prefix of global subject ids
        #[arg(long, default_value = "CRC")]
        prefix: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match Cli::parse().command {
        Command::Reconcile {
            subjects,
            tasks,
            codes,
            report,
            year,
            prefix,
        } => run_reconcile(Config {
            subject_root: subjects,
            tasks_root: tasks,
            code_table: codes,
            report_path: report,
            year,
            prefix,
        }),
        Command::BuildRoster {
            subjects,
            profiles,
            codes,
            prefix,
        } => {
            let outcome =
                bootstrap::build_roster(&subjects, &profiles, &codes, &prefix, &YEAR_COLUMNS)
                    .context("building the roster tables")?;
            info!(
                subjects = outcome.subjects,
                without_profile = outcome.without_profile,
                "roster tables written"
            );
            Ok(())
        }
        Command::ExportTask {
            subjects,
            dest,
            task,
            prefix,
        } => {
            let outcome = export_single_task(&subjects, &dest, &prefix, task)
                .context("exporting the task images")?;
            info!(
                copied = outcome.copied,
                without_task = outcome.without_task,
                task,
                "export complete"
            );
            Ok(())
        }
    }
}

fn run_reconcile(config: Config) -> anyhow::Result<()> {
    // An unreadable code table is the one fatal startup condition: abort
    // before any subject is touched.
    let roster = Roster::load(&config.code_table, &YEAR_COLUMNS)
        .with_context(|| format!("reading the code table {}", config.code_table.display()))?;
    info!(subjects = roster.len(), year = %config.year, "loaded code table");

    let report = MissingTasksReport::create(&config.report_path)?;
    let reconciler = Reconciler::new(&config, &roster, RenumberTable::standard());

    let subjects = reconciler.discover_subjects()?;
    info!(count = subjects.len(), "subject folders awaiting reconciliation");

    let bar = ProgressBar::new(subjects.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")?.progress_chars("=>-"),
    );
    bar.set_message("subjects");

    let summary = reconciler.run(&subjects, &report, |_| bar.inc(1))?;
    bar.finish();

    info!(
        reconciled = summary.reconciled,
        skipped = summary.skipped,
        absent = summary.absent,
        report = %report.path().display(),
        "run complete"
    );
    Ok(())
}
