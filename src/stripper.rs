use crate::config::StripConfig;
use crate::discovery::{self, DiscoveryOptions};
use crate::errors::{Error, Result};
use crate::report::{Failure, FileOutcome, Reporter, RunSummary};
use crate::transformer::Transformer;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Options for processing a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Copy the original to `<file>.bak` before overwriting a changed file.
    pub create_backup: bool,
    /// Compute changes without writing anything to disk.
    pub dry_run: bool,
}

/// Options for a whole run over a directory tree.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub process: ProcessOptions,
    /// Record per-file failures and continue instead of aborting the batch.
    pub keep_going: bool,
    pub respect_gitignore: bool,
}

/// Applies a `Transformer` to files on disk.
pub struct Stripper {
    transformer: Transformer,
    options: ProcessOptions,
}

impl Stripper {
    pub fn new(config: &StripConfig, options: ProcessOptions) -> Result<Self> {
        Ok(Self {
            transformer: Transformer::new(config)?,
            options,
        })
    }

    /// Reads `path`, strips it, and writes the result back in place.
    ///
    /// The write is unconditional unless this is a dry run, so files without
    /// markers are rewritten with identical bytes. Backups are only taken for
    /// files whose content actually changes.
    pub fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        let content = fs::read_to_string(path)?;
        let transformed = self.transformer.transform(&content);
        let modified = transformed.modified();

        tracing::debug!(
            path = %path.display(),
            toggles = transformed.stats.toggles,
            secondary = transformed.stats.secondary,
            primary = transformed.stats.primary,
            "transformed"
        );

        let mut backup = None;
        if !self.options.dry_run {
            if modified && self.options.create_backup {
                let backup_path = backup_path(path);
                if backup_path.exists() {
                    // The existing copy predates this run and is the one `undo` should restore.
                    tracing::warn!(
                        backup = %backup_path.display(),
                        "backup already exists, keeping it"
                    );
                } else {
                    fs::copy(path, &backup_path)?;
                    backup = Some(backup_path);
                }
            }
            write_atomic(path, transformed.content.as_bytes())?;
        }

        Ok(FileOutcome {
            path: path.to_path_buf(),
            stats: transformed.stats,
            modified,
            written: !self.options.dry_run,
            backup,
        })
    }
}

/// `index.html` -> `index.html.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Writes `bytes` to a temporary file next to `path`, copies the original's
/// permissions onto it, and persists it over `path`.
///
/// Symlinks are resolved first so the link stays a link and its target
/// receives the new content.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let path = fs::canonicalize(path)?;
    let Some(parent) = path.parent() else {
        return Err(format!("Could not get parent directory for {}", path.display()).into());
    };

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(bytes)?;
    temp_file.flush()?;

    let perms = fs::metadata(&path)?.permissions();
    fs::set_permissions(temp_file.path(), perms)?;

    temp_file.persist(&path)?;
    Ok(())
}

/// Strips every matching file under `root`, reporting as it goes.
///
/// Without `keep_going` the first failure aborts the batch; files already
/// written stay written.
pub fn run_strip<W: Write>(
    root: &Path,
    config: &StripConfig,
    options: &RunOptions,
    reporter: &mut Reporter<W>,
) -> Result<RunSummary> {
    let stripper = Stripper::new(config, options.process)?;

    reporter.started(root, options.process.dry_run)?;

    let files = discovery::discover(
        root,
        &DiscoveryOptions {
            extensions: config.normalized_extensions(),
            exclude: config.exclude.clone(),
            respect_gitignore: options.respect_gitignore,
        },
    )?;

    let mut summary = RunSummary {
        root: root.to_path_buf(),
        dry_run: options.process.dry_run,
        files_found: files.len(),
        ..RunSummary::default()
    };
    reporter.found(files.len())?;

    for path in &files {
        reporter.processing(path)?;
        match stripper.process_file(path) {
            Ok(outcome) => {
                reporter.processed(&outcome)?;
                summary.record(outcome);
            }
            Err(e) if options.keep_going => {
                tracing::warn!(path = %path.display(), error = %e, "skipping file");
                let failure = Failure {
                    path: path.clone(),
                    error: e.to_string(),
                };
                reporter.failed(&failure)?;
                summary.failures.push(failure);
            }
            Err(e) => return Err(Error::processing(path, e)),
        }
    }

    reporter.finished(&summary)?;
    Ok(summary)
}
