//! Init command implementation
//!
//! Handles `cost-optimizer init`, which creates `.cost-optimizer.toml` from
//! a threshold profile.

use anyhow::Result;
use console::style;
use std::env;
use std::path::Path;

use crate::config::{self, ThresholdProfile};
use crate::error::CostOptimizerError;
use crate::fmt::{CHECKMARK, INFO, ROCKET, SPARKLES, WARNING};

/// Initialize configuration from a threshold profile
///
/// Leaves an existing `.cost-optimizer.toml` untouched.
///
/// # Examples
///
/// ```no_run
/// use cost_optimizer::cmd::init::cmd_init;
///
/// cmd_init("conservative")?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_init(profile: &str) -> Result<()> {
    println!(
        "{} {} Initializing cost-optimizer",
        ROCKET,
        style("cost-optimizer init").bold()
    );
    println!();

    let dir = env::current_dir()?;
    let Some(profile) = init_in(&dir, profile)? else {
        println!(
            "{} Config file already exists: {}",
            WARNING,
            style(config::CONFIG_FILE_NAME).cyan()
        );
        println!("   Delete it first or edit manually to update.");
        return Ok(());
    };

    let thresholds = profile.thresholds();
    println!(
        "{} Selected profile: {}",
        SPARKLES,
        style(profile.name()).bold().cyan()
    );
    println!("   {}", style(profile.description()).dim());
    println!();
    println!("{}  Severity thresholds:", INFO);
    println!("      high-confidence = {}", style(thresholds.high_confidence).green());
    println!("      high-savings-share = {}", style(thresholds.high_savings_share).green());
    println!("      medium-confidence = {}", style(thresholds.medium_confidence).green());
    println!("      medium-savings-share = {}", style(thresholds.medium_savings_share).green());
    println!("      min-confidence = {}", style(thresholds.min_confidence).green());
    println!();
    println!(
        "{} Created {}",
        CHECKMARK,
        style(config::CONFIG_FILE_NAME).cyan().bold()
    );
    println!();

    println!("{}  Available Profiles:", INFO);
    for candidate in ThresholdProfile::ALL {
        let indicator = if candidate == profile { "→" } else { " " };
        println!(
            "   {} {} - {}",
            style(indicator).cyan().bold(),
            style(candidate.name()).bold(),
            style(candidate.description()).dim()
        );
    }

    Ok(())
}

/// Write a config for `profile` into `dir`
///
/// Returns `None` when a config file already exists there.
pub fn init_in(dir: &Path, profile: &str) -> Result<Option<ThresholdProfile>> {
    let profile: ThresholdProfile =
        profile
            .parse()
            .map_err(|_| CostOptimizerError::InvalidProfile {
                name: profile.to_string(),
                available: ThresholdProfile::names()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            })?;

    if config::ConfigLoader::exists(dir) {
        return Ok(None);
    }

    let file = config::ProfileResolver::from_profile(profile);
    config::ConfigLoader::save(&file, dir)?;
    Ok(Some(profile))
}
