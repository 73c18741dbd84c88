//! Completions command implementation
//!
//! Handles `cost-optimizer completions`, which generates shell completion
//! scripts for bash, zsh, fish, etc.

use clap::Command;
use clap_complete::{generate, Shell};
use std::io::Write;

/// Generate a completion script for `cmd` into `out`
///
/// `main` passes the derived CLI command so the script always matches the
/// real argument definitions.
///
/// # Examples
///
/// ```bash
/// # Bash
/// cost-optimizer completions bash > /etc/bash_completion.d/cost-optimizer
///
/// # Zsh
/// cost-optimizer completions zsh > ~/.zfunc/_cost-optimizer
/// ```
pub fn cmd_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let bin_name = cmd.get_name().to_string();
    generate(shell, cmd, bin_name, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;

    fn command() -> Command {
        Command::new("cost-optimizer")
            .arg(Arg::new("no-emoji").long("no-emoji").action(clap::ArgAction::SetTrue))
            .subcommand(Command::new("analyze"))
            .subcommand(Command::new("export"))
    }

    #[test]
    fn test_completions_generate_for_major_shells() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let mut out = Vec::new();
            cmd_completions(shell, &mut command(), &mut out);
            let script = String::from_utf8(out).unwrap();
            assert!(script.contains("cost-optimizer"), "{shell:?} output lacks bin name");
        }
    }

    #[test]
    fn test_bash_completions_list_subcommands() {
        let mut out = Vec::new();
        cmd_completions(Shell::Bash, &mut command(), &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("analyze"));
        assert!(script.contains("export"));
    }
}
