//! Configuration file loading and saving

use super::file::{ConfigFile, CONFIG_FILE_NAME};
use super::resolver::{AnalysisConfig, ProfileResolver};
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use std::path::Path;

/// Handles loading and saving `.cost-optimizer.toml`
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from `.cost-optimizer.toml` in the given directory
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cost_optimizer::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load(Path::new("."))?;
    /// println!("Loaded config with profile: {}", config.profile);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(dir: &Path) -> Result<ConfigFile> {
        Self::load_with_fs(dir, &RealFileSystem)
    }

    /// Load config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(dir: &Path, fs: &FS) -> Result<ConfigFile> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
                return Ok(ConfigFile::default());
            }
            Err(e) => {
                return Err(e).context("Failed to read .cost-optimizer.toml");
            }
        };

        let config: ConfigFile =
            toml_edit::de::from_str(&contents).context("Failed to parse .cost-optimizer.toml")?;

        Ok(config)
    }

    /// Load and resolve config into analysis settings
    pub fn load_resolved(dir: &Path) -> Result<AnalysisConfig> {
        Self::load_resolved_with_fs(dir, &RealFileSystem)
    }

    /// Load and resolve config with a custom filesystem implementation
    pub fn load_resolved_with_fs<FS: FileSystem>(dir: &Path, fs: &FS) -> Result<AnalysisConfig> {
        let config = Self::load_with_fs(dir, fs)?;
        ProfileResolver::resolve(&config).context("Invalid .cost-optimizer.toml")
    }

    /// Save config to `.cost-optimizer.toml` in the given directory
    pub fn save(config: &ConfigFile, dir: &Path) -> Result<()> {
        Self::save_with_fs(config, dir, &RealFileSystem)
    }

    /// Save config with a custom filesystem implementation
    pub fn save_with_fs<FS: FileSystem>(config: &ConfigFile, dir: &Path, fs: &FS) -> Result<()> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        let contents =
            toml_edit::ser::to_string_pretty(config).context("Failed to serialize config")?;

        fs.write(&config_path, contents)
            .context("Failed to write .cost-optimizer.toml")?;

        Ok(())
    }

    /// Check if a config file exists in the directory
    pub fn exists(dir: &Path) -> bool {
        RealFileSystem.exists(&dir.join(CONFIG_FILE_NAME))
    }
}
