//! Completions command implementation
//!
//! Handles the `sizewatch completions` command which generates shell
//! completion scripts for bash, zsh, fish, etc.

use clap_complete::{generate, Shell};

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
/// Users can redirect this to their shell's completion directory.
///
/// # Examples
///
/// ```bash
/// # Bash
/// sizewatch completions bash > /etc/bash_completion.d/sizewatch
///
/// # Zsh
/// sizewatch completions zsh > ~/.zfunc/_sizewatch
/// ```
pub fn cmd_completions(shell: Shell) {
    // Mirror of the Cli structure in main.rs, which clap_complete needs as
    // a plain Command
    use clap::{Arg, Command};

    let mut cmd = Command::new("sizewatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Bundle-size regression detector")
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to sizewatch.json")
                .global(true),
        )
        .subcommand(Command::new("diff").about("Compare two size snapshots"))
        .subcommand(Command::new("pr").about("Post a size report on a pull request"))
        .subcommand(Command::new("completions").about("Generate shell completions"));

    let bin_name = "sizewatch".to_string();
    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}
