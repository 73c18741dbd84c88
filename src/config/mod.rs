//! Configuration for cost-optimizer
//!
//! This module provides:
//! - Threshold presets (conservative, balanced, aggressive)
//! - .cost-optimizer.toml config file support
//! - Resolution of presets, overrides and heuristics into engine settings

pub mod file;
pub mod loader;
pub mod resolver;
pub mod template;

pub use file::{ConfigFile, ThresholdOverrides, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;
pub use resolver::{AnalysisConfig, ProfileResolver};
pub use template::ThresholdProfile;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_name_constant_is_correct() {
        assert_eq!(CONFIG_FILE_NAME, ".cost-optimizer.toml");
    }

    #[test]
    fn test_every_profile_resolves() {
        for name in ThresholdProfile::names() {
            let config = ConfigFile {
                profile: name.to_string(),
                ..Default::default()
            };
            assert!(ProfileResolver::resolve(&config).is_ok(), "{name} failed");
        }
    }
}
