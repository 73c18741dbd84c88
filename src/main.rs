use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use cost_optimizer::cmd::{self, export::DEFAULT_OUTPUT, sample::DEFAULT_SAMPLE_OUTPUT, ExportTarget};
use std::path::PathBuf;
use std::process;

/// Cloud billing cost optimizer
///
/// cost-optimizer reads a billing extract, ranks cost-optimization
/// opportunities and exports them as reviewable Terraform.
#[derive(Parser)]
#[command(name = "cost-optimizer", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long, global = true)]
    no_emoji: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a billing extract and rank recommendations
    Analyze {
        /// Billing CSV with Service, Region, Cost and Date columns
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output the full report as JSON
        #[arg(long)]
        json: bool,

        /// Show only the N highest-ranked recommendations
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },

    /// Export recommendations as a Terraform script
    Export {
        /// Billing CSV with Service, Region, Cost and Date columns
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Recommendation ids to export (default: all)
        #[arg(long, value_delimiter = ',', value_name = "IDS")]
        ids: Vec<u32>,

        /// File to write the script to
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Print the script instead of writing a file
        #[arg(long, conflicts_with = "json")]
        stdout: bool,

        /// Print the export result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize cost-optimizer configuration
    Init {
        /// Threshold profile: conservative, balanced, aggressive
        #[arg(short, long, default_value = "balanced")]
        profile: String,
    },

    /// Write a sample billing extract
    Sample {
        /// File to write
        #[arg(short, long, default_value = DEFAULT_SAMPLE_OUTPUT)]
        output: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Use RUST_LOG to control verbosity
    env_logger::init();

    let cli = Cli::parse();

    if cli.no_emoji {
        std::env::set_var("NO_EMOJI", "1");
        console::set_colors_enabled(false);
    }

    let result = match cli.command {
        Some(Commands::Analyze { file, json, top }) => cmd::cmd_analyze(&file, json, top),
        Some(Commands::Export {
            file,
            ids,
            output,
            stdout,
            json,
        }) => {
            let target = if json {
                ExportTarget::Json
            } else if stdout {
                ExportTarget::Stdout
            } else {
                ExportTarget::File(output)
            };
            cmd::cmd_export(&file, &ids, &target)
        }
        Some(Commands::Init { profile }) => cmd::cmd_init(&profile),
        Some(Commands::Sample { output }) => cmd::cmd_sample(&output),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(shell, &mut Cli::command(), &mut std::io::stdout());
            Ok(())
        }
        None => {
            let _ = Cli::command().print_help();
            Ok(())
        }
    };

    if let Err(e) = result {
        use cost_optimizer::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        process::exit(ErrorFormatter::exit_code(&e));
    }
}
