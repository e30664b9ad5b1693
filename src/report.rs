use crate::errors::Result;
use crate::transformer::RuleStats;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Defines the possible output formats for a strip run.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable progress lines.
    #[default]
    Text,
    /// A single JSON summary document, suitable for machine processing.
    Json,
}

/// What happened to one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub stats: RuleStats,
    /// The rewritten content differs from what was on disk.
    pub modified: bool,
    /// The file was written back (false for dry runs).
    pub written: bool,
    pub backup: Option<PathBuf>,
}

/// A file that could not be processed while running with `--keep-going`.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub error: String,
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub root: PathBuf,
    pub dry_run: bool,
    pub files_found: usize,
    pub files_processed: usize,
    pub files_modified: usize,
    pub removed: RuleStats,
    pub files: Vec<FileOutcome>,
    pub failures: Vec<Failure>,
}

impl RunSummary {
    pub fn record(&mut self, outcome: FileOutcome) {
        self.files_processed += 1;
        if outcome.modified {
            self.files_modified += 1;
        }
        self.removed.add(outcome.stats);
        self.files.push(outcome);
    }

    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes run progress to a sink in the selected format.
///
/// Text mode streams a line per event. JSON mode stays silent until
/// `finished`, then emits the whole summary.
pub struct Reporter<W: Write> {
    format: OutputFormat,
    out: W,
}

impl Reporter<std::io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, std::io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    fn text(&self) -> bool {
        self.format == OutputFormat::Text
    }

    pub fn started(&mut self, root: &Path, dry_run: bool) -> Result<()> {
        if self.text() {
            writeln!(self.out, "Removing secondary-language markup...")?;
            writeln!(self.out, "Root: {}", root.display())?;
            if dry_run {
                writeln!(self.out, "Dry run: no files will be written")?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    pub fn found(&mut self, count: usize) -> Result<()> {
        if self.text() {
            writeln!(self.out, "Found {count} files to process")?;
        }
        Ok(())
    }

    pub fn processing(&mut self, path: &Path) -> Result<()> {
        if self.text() {
            writeln!(self.out, "Processing: {}", path.display())?;
        }
        Ok(())
    }

    pub fn processed(&mut self, outcome: &FileOutcome) -> Result<()> {
        if !self.text() {
            return Ok(());
        }
        let stats = &outcome.stats;
        let detail = format!(
            "{} toggles, {} secondary, {} primary",
            stats.toggles, stats.secondary, stats.primary
        );
        match (outcome.modified, outcome.written) {
            (true, true) => writeln!(self.out, "  ✓ Updated ({detail})")?,
            (true, false) => writeln!(self.out, "  ~ Would update ({detail})")?,
            (false, true) => writeln!(self.out, "  ✓ Rewritten, no markers")?,
            (false, false) => writeln!(self.out, "  - Unchanged")?,
        }
        if let Some(backup) = &outcome.backup {
            writeln!(self.out, "    backup: {}", backup.display())?;
        }
        Ok(())
    }

    pub fn failed(&mut self, failure: &Failure) -> Result<()> {
        if self.text() {
            writeln!(self.out, "  ✗ Failed: {}", failure.error)?;
        }
        Ok(())
    }

    pub fn finished(&mut self, summary: &RunSummary) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "\n{}", "-".repeat(50))?;
                writeln!(self.out, "Files processed : {}", summary.files_processed)?;
                writeln!(self.out, "Files changed   : {}", summary.files_modified)?;
                writeln!(self.out, "Toggles removed : {}", summary.removed.toggles)?;
                writeln!(
                    self.out,
                    "Markers removed : {}",
                    summary.removed.secondary + summary.removed.primary
                )?;
                if !summary.failures.is_empty() {
                    writeln!(self.out, "Failures        : {}", summary.failures.len())?;
                }
                writeln!(self.out, "\n✅ Processed {} files", summary.files_processed)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, summary)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
