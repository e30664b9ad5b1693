use crate::errors::Result;
use crate::report::OutputFormat;
use clap::{ArgAction, Parser, Subcommand};
use std::env;
use std::path::PathBuf;

/// Strips bilingual markup from a static site, keeping the primary language.
///
/// Run without arguments to strip every `.html` file under the directory one
/// level above the one holding this executable.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Strip bilingual toggle markup from HTML files",
    long_about = "langstrip - removes the language toggle button and the data-es / data-en
attributes from every HTML file in a site, leaving only the English content.

Files are rewritten in place. Use --dry-run to preview and --backup to keep
.bak copies that `langstrip undo` can restore.

QUICK EXAMPLES:
  langstrip                               # Strip the site this tool is installed in
  langstrip strip ./site --dry-run        # Preview changes
  langstrip strip ./site --backup         # Strip, keeping .bak copies
  langstrip undo ./site                   # Restore from backups"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase diagnostic output on stderr (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// The set of available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Strip bilingual markup from every matching file (the default command)
    ///
    /// Marker config file format (langstrip.yaml), all keys optional:
    ///   toggle:
    ///     tag: button
    ///     class: lang-toggle
    ///   secondary_attributes: [data-es]
    ///   primary_attributes: [data-en]
    ///   extensions: [html]
    ///   exclude: [node_modules]
    Strip(StripArgs),

    /// Restore files from the .bak copies made by `strip --backup`
    Undo {
        /// Site root. Defaults to the directory above the executable's.
        #[arg(env = "LANGSTRIP_ROOT")]
        root: Option<PathBuf>,

        /// Extensions whose backups are restored.
        #[arg(short = 'x', long = "ext", value_delimiter = ',', default_value = "html")]
        extensions: Vec<String>,

        /// Keep the backup files after restoring.
        #[arg(long)]
        keep_backups: bool,
    },

    /// Remove .bak copies without restoring them
    CleanBackups {
        /// Site root. Defaults to the directory above the executable's.
        #[arg(env = "LANGSTRIP_ROOT")]
        root: Option<PathBuf>,

        /// Extensions whose backups are removed.
        #[arg(short = 'x', long = "ext", value_delimiter = ',', default_value = "html")]
        extensions: Vec<String>,

        /// Preview which backup files would be removed without deleting them.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Arguments of the `strip` command.
#[derive(clap::Args, Debug, Default)]
pub struct StripArgs {
    /// Site root. Defaults to the directory above the executable's.
    #[arg(env = "LANGSTRIP_ROOT")]
    pub root: Option<PathBuf>,

    /// Path to a YAML marker configuration.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// A comma-separated list of file extensions to process (overrides the config).
    #[arg(short = 'x', long = "ext", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// A comma-separated list of directory names to skip (overrides the config).
    #[arg(short = 'e', long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Keep a `.bak` copy of every file that changes.
    #[arg(long)]
    pub backup: bool,

    /// Report what would change without writing any file.
    #[arg(long)]
    pub dry_run: bool,

    /// Continue past files that fail to read or write; exit non-zero at the end.
    #[arg(long)]
    pub keep_going: bool,

    /// Skip hidden and git-ignored files.
    #[arg(long)]
    pub respect_gitignore: bool,

    /// Output format for progress and summary.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}

/// Uses `root` when given, otherwise the parent of the directory containing
/// the running executable.
pub fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = root {
        return Ok(root);
    }
    let exe = env::current_exe()?;
    exe.parent()
        .and_then(|dir| dir.parent())
        .map(|p| p.to_path_buf())
        .ok_or_else(|| {
            format!("cannot derive a site root from {}", exe.display()).into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_means_default_strip() {
        let args = Args::try_parse_from(["langstrip"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_strip_flags() {
        let args = Args::try_parse_from([
            "langstrip", "strip", "site", "-x", "html,htm", "--backup", "--dry-run", "-f", "json", "-vv",
        ])
        .unwrap();
        let Some(Commands::Strip(strip)) = args.command else {
            panic!("expected strip command");
        };
        assert_eq!(strip.root, Some(PathBuf::from("site")));
        assert_eq!(strip.extensions, vec!["html", "htm"]);
        assert!(strip.backup && strip.dry_run);
        assert_eq!(strip.format, OutputFormat::Json);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_undo_defaults() {
        let args = Args::try_parse_from(["langstrip", "undo", "site"]).unwrap();
        match args.command {
            Some(Commands::Undo { extensions, keep_backups, .. }) => {
                assert_eq!(extensions, vec!["html"]);
                assert!(!keep_backups);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_explicit_root_wins() {
        let root = resolve_root(Some(PathBuf::from("/srv/site"))).unwrap();
        assert_eq!(root, PathBuf::from("/srv/site"));
    }

    #[test]
    fn test_default_root_is_above_executable_dir() {
        let exe = env::current_exe().unwrap();
        let expected = exe.parent().unwrap().parent().unwrap();
        assert_eq!(resolve_root(None).unwrap(), expected);
    }
}
