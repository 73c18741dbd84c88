//! Analyze command implementation
//!
//! Handles `cost-optimizer analyze <FILE>`: ingests a billing extract and
//! prints the cost summary with ranked recommendations.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use super::report::print_report;
use crate::fmt::{CHECKMARK, MICROSCOPE};

/// Analyze a billing extract
///
/// With `json`, prints the full [`AnalysisReport`](crate::pipeline::AnalysisReport)
/// as pretty JSON. `top` limits how many recommendations the console view
/// shows; the JSON output always carries every recommendation.
///
/// # Examples
///
/// ```no_run
/// use cost_optimizer::cmd::analyze::cmd_analyze;
/// use std::path::Path;
///
/// cmd_analyze(Path::new("billing.csv"), false, Some(5))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_analyze(file: &Path, json: bool, top: Option<usize>) -> Result<()> {
    if !json {
        println!(
            "{} {} Billing Analysis",
            MICROSCOPE,
            style("cost-optimizer").bold()
        );
        println!();
    }

    let (_, session) = super::run_analysis(file, json)?;
    let report = session.report();

    if json {
        let output = serde_json::to_string_pretty(&report)
            .context("Failed to serialize analysis report to JSON")?;
        println!("{}", output);
        return Ok(());
    }

    print_report(&report, top);

    if !report.recommendations.is_empty() {
        println!();
        println!(
            "{} Run {} to generate Terraform for these recommendations",
            CHECKMARK,
            style(format!("cost-optimizer export {}", file.display())).cyan()
        );
    }

    Ok(())
}
