//! # Session Reconciler
//!
//! Reconciles per-subject research-session artifacts (task images and
//! per-task CSV exports) collected under inconsistent naming conventions
//! across three data-collection years into a single canonical subject-id
//! space and a single canonical task numbering.
//!
//! ## Pipeline
//!
//! ```text
//!  subject folders ──▶ naming ──▶ renumber ──▶ inventory ──▶ reconcile
//!        │                                                      │
//!        └── roster (year-local code → global id) ──────────────┘
//! ```
//!
//! ## Modules
//! - `naming`: folds free-form task filenames into canonical labels
//! - `renumber`: maps original task numbers onto canonical slots
//! - `roster`: resolves year-local folder codes to global subject ids;
//!   `roster::bootstrap` builds the tables from first-year records
//! - `inventory`: per-subject present/missing task split
//! - `reconcile`: the batch driver (materialization, report, rename/merge)
//! - `imaging`: crop/resize and white placeholder frames
//! - `report`: the append-only missing-tasks report
//! - `export`: flat export of one original task across subjects

pub mod config;
pub mod error;
pub mod export;
pub mod imaging;
pub mod inventory;
pub mod naming;
pub mod reconcile;
pub mod renumber;
pub mod report;
pub mod roster;

pub use config::Config;
pub use error::{ReconcileError, Result};
