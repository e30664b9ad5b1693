//! The main entry point for the `langstrip` command-line application.

use anyhow::Context;
use langstrip::cli::{self, Commands, StripArgs};
use langstrip::config::ConfigLoader;
use langstrip::report::Reporter;
use langstrip::stripper::{self, ProcessOptions, RunOptions};
use langstrip::{backups, logging};
use std::path::PathBuf;
use std::process;

fn main() -> anyhow::Result<()> {
    let args = cli::parse_args();
    logging::init_cli_logging(args.verbose);

    match args.command {
        Some(Commands::Strip(strip)) => run_strip(strip),
        None => run_strip(StripArgs {
            root: std::env::var_os("LANGSTRIP_ROOT").map(PathBuf::from),
            ..StripArgs::default()
        }),
        Some(Commands::Undo {
            root,
            extensions,
            keep_backups,
        }) => {
            let root = cli::resolve_root(root)?;
            backups::run_undo(&root, &normalize(&extensions), keep_backups)
                .with_context(|| format!("undo failed in {}", root.display()))
        }
        Some(Commands::CleanBackups {
            root,
            extensions,
            dry_run,
        }) => {
            let root = cli::resolve_root(root)?;
            backups::run_clean(&root, &normalize(&extensions), dry_run)
                .with_context(|| format!("clean-backups failed in {}", root.display()))
        }
    }
}

fn run_strip(args: StripArgs) -> anyhow::Result<()> {
    let root = cli::resolve_root(args.root)?;
    let config = ConfigLoader::resolve(args.config.as_deref(), &root)?
        .with_overrides(args.extensions, args.exclude);

    let options = RunOptions {
        process: ProcessOptions {
            create_backup: args.backup,
            dry_run: args.dry_run,
        },
        keep_going: args.keep_going,
        respect_gitignore: args.respect_gitignore,
    };

    let mut reporter = Reporter::stdout(args.format);
    let summary = stripper::run_strip(&root, &config, &options, &mut reporter)
        .with_context(|| format!("strip failed in {}", root.display()))?;

    if !summary.succeeded() {
        eprintln!("{} file(s) could not be processed", summary.failures.len());
        process::exit(1);
    }
    Ok(())
}

fn normalize(extensions: &[String]) -> Vec<String> {
    langstrip::StripConfig::default()
        .with_overrides(extensions.to_vec(), Vec::new())
        .normalized_extensions()
}
