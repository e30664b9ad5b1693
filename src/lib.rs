//! `langstrip` removes bilingual scaffolding from static HTML sites.
//!
//! A site built with a runtime language toggle carries a toggle button plus
//! `data-es`/`data-en` attributes on every translatable element. This crate
//! strips all of it, leaving the visible English text. The main components are:
//!
//! - `transformer`: the pure text rewrite (toggle removal, then attribute removal).
//! - `discovery`: recursive enumeration of files by extension.
//! - `stripper`: reads, transforms and atomically rewrites each file.
//! - `backups`: restoring or discarding `.bak` copies taken during a strip.
//! - `config`: marker names and file selection, optionally loaded from YAML.

pub mod backups;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod logging;
pub mod patterns;
pub mod report;
pub mod stripper;
pub mod transformer;

// Re-export main types for easier access by library users.
pub use config::StripConfig;
pub use errors::{Error, Result};
pub use report::{OutputFormat, Reporter, RunSummary};
pub use stripper::{ProcessOptions, RunOptions, Stripper};
pub use transformer::{RuleStats, Transformer};
