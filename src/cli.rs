//! Command-line interface for tidymeta.
//!
//! Parses the arguments, loads configuration, sets up logging, and runs the
//! organizer exactly once for the requested folder.

use crate::config::AppConfig;
use crate::file_organizer::{OrganizeSettings, OrganizeSummary, organize};
use crate::logging;
use crate::output::OutputFormatter;
use crate::reporter::TracingReporter;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

/// Organize files by type and metadata.
#[derive(Debug, Parser)]
#[command(name = "tidymeta", version, about = "Organize files by type and metadata")]
pub struct Cli {
    /// Folder to organize (only its immediate entries are touched)
    #[arg(long, value_name = "PATH")]
    pub folder: PathBuf,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show where files would go without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Leave files whose content was already seen in this run in place
    #[arg(long)]
    pub skip_duplicates: bool,

    /// Infer the type of extensionless files from their content
    #[arg(long)]
    pub sniff_content: bool,

    /// Directory for the per-run log file [default: current directory]
    #[arg(long, value_name = "DIR", conflicts_with = "no_log_file")]
    pub log_dir: Option<PathBuf>,

    /// Log to the console only
    #[arg(long)]
    pub no_log_file: bool,

    /// More detail (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Switches that can be set from the command line.
///
/// Each flag only ever turns an option on; it never disables something the
/// configuration file enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub skip_duplicates: bool,
    pub sniff_content: bool,
}

impl From<&Cli> for RunOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            dry_run: cli.dry_run,
            skip_duplicates: cli.skip_duplicates,
            sniff_content: cli.sniff_content,
        }
    }
}

/// Runs the whole command: configuration, logging, one organizer pass, summary.
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    let (config, config_source) = AppConfig::load_with_source(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;

    let level = logging::level_from_flags(cli.verbose, cli.quiet);
    let guard = if cli.no_log_file {
        logging::init_logging(level, None)
    } else {
        let log_dir = cli
            .log_dir
            .clone()
            .or_else(|| config.organizer.log_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        logging::init_logging(level, Some(&log_dir))
    };

    let options = RunOptions::from(cli);
    let protected: Vec<PathBuf> = guard
        .log_file()
        .map(Path::to_path_buf)
        .into_iter()
        .chain(config_source)
        .collect();
    let summary = organize_with_config(&config, options, &cli.folder, &protected)?;

    OutputFormatter::summary(&summary, options.dry_run);
    if options.dry_run {
        OutputFormatter::dry_run_notice("No files were modified.");
    } else {
        OutputFormatter::success("Organization complete!");
    }
    if let Some(log_file) = guard.log_file() {
        println!("Log written to {}", log_file.display());
    }
    Ok(())
}

/// Loads configuration from `config_path` (or the usual locations) and runs
/// one organizer pass over `folder`. The configuration file itself is never
/// moved, even when it lives inside `folder`.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tidymeta::cli::{RunOptions, run_cli_with_config};
///
/// let summary = run_cli_with_config(RunOptions::default(), Path::new("/path/to/folder"), None);
/// match summary {
///     Ok(s) => println!("moved {} files", s.moved),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli_with_config(
    options: RunOptions,
    folder: &Path,
    config_path: Option<&Path>,
) -> Result<OrganizeSummary, String> {
    let (config, config_source) = AppConfig::load_with_source(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let protected: Vec<PathBuf> = config_source.into_iter().collect();
    organize_with_config(&config, options, folder, &protected)
}

fn organize_with_config(
    config: &AppConfig,
    options: RunOptions,
    folder: &Path,
    protected_paths: &[PathBuf],
) -> Result<OrganizeSummary, String> {
    let filters = config
        .filters
        .compile()
        .map_err(|e| format!("Error compiling filters: {}", e))?;

    let settings = OrganizeSettings {
        dry_run: options.dry_run,
        skip_duplicates: options.skip_duplicates || config.organizer.skip_duplicates,
        sniff_content: options.sniff_content || config.organizer.sniff_content,
        filters,
        protected_paths: protected_paths.to_vec(),
    };

    organize(folder, &settings, &mut TracingReporter).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_folder_is_required() {
        assert!(Cli::try_parse_from(["tidymeta"]).is_err());
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "tidymeta",
            "--folder",
            "/data",
            "--dry-run",
            "--skip-duplicates",
            "-vv",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.folder, PathBuf::from("/data"));
        assert!(cli.dry_run);
        assert!(cli.skip_duplicates);
        assert!(!cli.sniff_content);
        assert_eq!(cli.verbose, 2);

        let options = RunOptions::from(&cli);
        assert!(options.dry_run && options.skip_duplicates);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["tidymeta", "--folder", "x", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_config_enables_duplicate_skipping() {
        let config = AppConfig::from_toml("[organizer]\nskip_duplicates = true\n").unwrap();
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        std::fs::write(temp_dir.path().join("a.xyz"), "same").unwrap();
        std::fs::write(temp_dir.path().join("b.xyz"), "same").unwrap();

        let summary =
            organize_with_config(&config, RunOptions::default(), temp_dir.path(), &[]).unwrap();

        assert_eq!(summary.duplicates_skipped, 1);
    }
}
