//! Export command implementation
//!
//! Handles `cost-optimizer export <FILE>`: analyzes an extract and writes the
//! selected recommendations as a Terraform script. Nothing is written unless
//! the whole script was generated and validated.

use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};

use crate::error::CostOptimizerError;
use crate::fmt::{format_currency, CHECKMARK, INFO, SPARKLES};
use crate::infra::{FileSystem, RealFileSystem};
use crate::synth::SynthesizedConfig;

/// Default file the export command writes
pub const DEFAULT_OUTPUT: &str = "cost-optimizations.tf";

/// Where the generated script goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Write the script to a file
    File(PathBuf),
    /// Print the script to stdout
    Stdout,
    /// Print the full export result as JSON
    Json,
}

/// Export recommendations from a billing extract as Terraform
///
/// An empty `ids` exports every recommendation.
///
/// # Examples
///
/// ```no_run
/// use cost_optimizer::cmd::export::{cmd_export, ExportTarget};
/// use std::path::{Path, PathBuf};
///
/// cmd_export(
///     Path::new("billing.csv"),
///     &[1, 3],
///     &ExportTarget::File(PathBuf::from("plan.tf")),
/// )?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_export(file: &Path, ids: &[u32], target: &ExportTarget) -> Result<()> {
    let quiet = !matches!(target, ExportTarget::File(_));
    let (pipeline, session) = super::run_analysis(file, quiet)?;

    let exported = if ids.is_empty() {
        pipeline.export_config(&session)
    } else {
        pipeline.export_selected(&session, ids)
    };
    let config = exported
        .map_err(CostOptimizerError::from)
        .context("Failed to generate Terraform")?;

    match target {
        ExportTarget::Json => {
            let output = serde_json::to_string_pretty(&config)
                .context("Failed to serialize export to JSON")?;
            println!("{}", output);
        }
        ExportTarget::Stdout => print!("{}", config.script),
        ExportTarget::File(path) => {
            write_script(&config, path, &RealFileSystem)?;
            print_summary(&config, path);
        }
    }

    Ok(())
}

/// Write a generated script to `path`
pub fn write_script<FS: FileSystem>(config: &SynthesizedConfig, path: &Path, fs: &FS) -> Result<()> {
    fs.write(path, &config.script)
        .map_err(|source| CostOptimizerError::Io {
            context: format!("writing {}", path.display()),
            source,
        })?;
    log::info!("Wrote {} ({} optimizations)", path.display(), config.optimization_count);
    Ok(())
}

fn print_summary(config: &SynthesizedConfig, path: &Path) {
    println!(
        "{} Wrote {}",
        CHECKMARK,
        style(path.display()).cyan().bold()
    );
    println!(
        "   {} {} automated optimization(s), {} / month",
        SPARKLES,
        style(config.optimization_count).green(),
        style(format_currency(config.total_monthly_savings)).green().bold()
    );
    println!();
    println!("{}  Next Steps:", INFO);
    println!("   1. Review {} before applying", path.display());
    println!("   2. Run {} to preview the changes", style("terraform plan").cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_write_script_writes_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT);
        let config = SynthesizedConfig {
            script: "# Cost optimization plan\n".to_string(),
            total_monthly_savings: Decimal::ZERO,
            optimization_count: 0,
        };

        write_script(&config, &path, &RealFileSystem).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), config.script);
    }

    #[test]
    fn test_write_script_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("plan.tf");
        let config = SynthesizedConfig {
            script: String::new(),
            total_monthly_savings: Decimal::ZERO,
            optimization_count: 0,
        };

        let err = write_script(&config, &path, &RealFileSystem).unwrap_err();
        let cli = err.downcast_ref::<CostOptimizerError>().unwrap();
        assert_eq!(cli.exit_code(), 74);
    }
}
