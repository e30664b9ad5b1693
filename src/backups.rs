use crate::discovery::{self, has_extension};
use crate::errors::Result;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// Statistics from an `undo` operation.
#[derive(Debug, Default)]
pub struct UndoStats {
    /// The number of backup files found.
    pub found: usize,
    /// The number of files successfully restored from backups.
    pub restored: usize,
}

/// Statistics from a `clean-backups` operation.
#[derive(Debug, Default)]
pub struct CleanStats {
    pub found: usize,
    pub removed: usize,
    pub bytes: u64,
}

/// Finds `<file>.bak` backups under `root` whose original has one of `extensions`.
pub fn find_backups(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    discovery::ensure_dir(root)?;

    let mut walker = WalkBuilder::new(root);
    walker.standard_filters(false).sort_by_file_name(|a, b| a.cmp(b));

    let mut backups = Vec::new();
    for entry in walker.build() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file()
            && path.extension().and_then(|s| s.to_str()) == Some("bak")
            && has_extension(&path.with_extension(""), extensions)
        {
            backups.push(path.to_path_buf());
        }
    }
    Ok(backups)
}

/// Restores every backup over its original.
///
/// # Arguments
///
/// * `root` - The directory to scan for backup files.
/// * `extensions` - Only backups of files with these extensions are restored.
/// * `keep_backups` - If `false`, the `.bak` files are deleted after being restored.
pub fn undo(root: &Path, extensions: &[String], keep_backups: bool) -> Result<UndoStats> {
    let mut stats = UndoStats::default();

    for backup in find_backups(root, extensions)? {
        stats.found += 1;
        let original = backup.with_extension("");
        fs::copy(&backup, &original)?;
        if !keep_backups {
            fs::remove_file(&backup)?;
        }
        stats.restored += 1;
        println!("Restored {}", original.display());
    }

    Ok(stats)
}

/// Deletes every backup without restoring it. With `dry_run`, only lists them.
pub fn clean(root: &Path, extensions: &[String], dry_run: bool) -> Result<CleanStats> {
    let mut stats = CleanStats::default();

    for backup in find_backups(root, extensions)? {
        stats.found += 1;
        if let Ok(metadata) = backup.metadata() {
            stats.bytes += metadata.len();
        }

        if dry_run {
            println!("Would remove: {}", backup.display());
            continue;
        }
        match fs::remove_file(&backup) {
            Ok(()) => {
                stats.removed += 1;
                println!("Removed: {}", backup.display());
            }
            Err(e) => {
                tracing::warn!(path = %backup.display(), error = %e, "failed to remove backup");
                eprintln!("Failed to remove {}: {}", backup.display(), e);
            }
        }
    }

    Ok(stats)
}

/// The main entry point for the `undo` command.
pub fn run_undo(root: &Path, extensions: &[String], keep_backups: bool) -> Result<()> {
    let stats = undo(root, extensions, keep_backups)?;
    println!(
        "\nBackups found: {}, restored: {}",
        stats.found, stats.restored
    );
    Ok(())
}

/// The main entry point for the `clean-backups` command.
pub fn run_clean(root: &Path, extensions: &[String], dry_run: bool) -> Result<()> {
    println!("Searching for backup files in {}...\n", root.display());
    let stats = clean(root, extensions, dry_run)?;

    println!("\n{}", "-".repeat(50));
    println!("Backup files found: {}", stats.found);
    if dry_run {
        println!("Total size: {:.2} MB", stats.bytes as f64 / 1_048_576.0);
        println!("\nRun without --dry-run to remove these files");
    } else {
        println!("Backup files removed: {}", stats.removed);
        println!("Space freed: {:.2} MB", stats.bytes as f64 / 1_048_576.0);
    }
    Ok(())
}
