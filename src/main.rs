use clap::{Parser, Subcommand};
use clap_complete::Shell;
use sizewatch::cmd;
use sizewatch::report::ReportFormat;
use std::path::PathBuf;
use std::process;

/// Bundle-size regression detector
///
/// sizewatch builds configured JavaScript entrypoints, measures parsed and
/// gzip chunk sizes, and compares snapshots across commits so size
/// regressions show up on the pull request that introduced them.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "sizewatch.json")]
    config: PathBuf,

    /// Snapshot output path (default command)
    #[arg(short, long, default_value = cmd::build::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Number of parallel bundler workers (default: available cores, capped)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Also write an HTML size-breakdown artifact next to the snapshot
    #[arg(long)]
    analyze: bool,

    /// Upload the snapshot to the configured storage root after building
    #[arg(long)]
    upload: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two size snapshots
    Diff {
        /// Base snapshot URI (file:, http: or https:)
        #[arg(long)]
        base: String,

        /// Head snapshot URI (file:, http: or https:)
        #[arg(long)]
        head: String,

        /// Output format: json or markdown
        #[arg(long, default_value = "markdown")]
        output: ReportFormat,
    },

    /// Post a size report comment on a pull request
    Pr {
        /// Pull request number
        number: u64,

        /// CI build number embedded in the report's deep link
        #[arg(long)]
        build: Option<u64>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Diff { base, head, output }) => {
            cmd::cmd_diff(base, head, *output, Some(&cli.config))
        }
        Some(Commands::Pr { number, build }) => cmd::cmd_pr(*number, *build, &cli.config),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(*shell);
            Ok(())
        }
        // Bare invocation builds and writes a snapshot
        None => cmd::cmd_build(
            &cli.config,
            &cli.output,
            cli.concurrency,
            cli.analyze,
            cli.upload,
        ),
    };

    if let Err(e) = result {
        use sizewatch::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert()
    }

    #[test]
    fn test_diff_args_parse() {
        let cli = Cli::parse_from([
            "sizewatch",
            "diff",
            "--base",
            "file:base.json",
            "--head",
            "file:head.json",
            "--output",
            "json",
        ]);
        assert!(matches!(
            cli.command,
            Some(Commands::Diff {
                output: ReportFormat::Json,
                ..
            })
        ));
    }

    #[test]
    fn test_bare_invocation_defaults() {
        let cli = Cli::parse_from(["sizewatch"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.output, PathBuf::from("size-snapshot.json"));
        assert!(cli.concurrency.is_none());
    }
}
