//! Command handlers for the cost-optimizer CLI
//!
//! Each submodule handles a specific CLI command. Helpers shared by the
//! commands that run an analysis live here.

pub mod analyze;
pub mod completions;
pub mod export;
pub mod init;
pub mod report;
pub mod sample;

pub use analyze::cmd_analyze;
pub use completions::cmd_completions;
pub use export::{cmd_export, ExportTarget};
pub use init::cmd_init;
pub use sample::cmd_sample;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ConfigLoader;
use crate::error::CostOptimizerError;
use crate::infra::{FileSystem, RealFileSystem};
use crate::pipeline::{AnalysisSession, LogCollector, Pipeline, SessionId};

/// Read a billing extract, mapping missing or non-UTF-8 files to CLI errors
pub fn read_extract<FS: FileSystem>(path: &Path, fs: &FS) -> Result<String, CostOptimizerError> {
    fs.read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => CostOptimizerError::InputNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::InvalidData => CostOptimizerError::InvalidEncoding {
            path: path.to_path_buf(),
        },
        _ => CostOptimizerError::Io {
            context: format!("reading {}", path.display()),
            source,
        },
    })
}

/// Build a pipeline from `.cost-optimizer.toml` in the working directory
pub fn load_pipeline() -> Result<Pipeline> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    let config = ConfigLoader::load_resolved(&cwd)?;
    log::debug!("Using '{}' threshold profile", config.profile);
    Ok(Pipeline::new(config.engine()).with_collector(Arc::new(LogCollector)))
}

/// Load config, read the extract and run one analysis
pub(crate) fn run_analysis(file: &Path, quiet: bool) -> Result<(Pipeline, Arc<AnalysisSession>)> {
    let pipeline = load_pipeline()?;
    let raw = read_extract(file, &RealFileSystem)?;

    let spinner = (!quiet).then(|| spinner(format!("Analyzing {}", file.display())));
    let result = pipeline.analyze(&SessionId::generate(), &raw);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let session = result
        .map_err(CostOptimizerError::from)
        .with_context(|| format!("Failed to analyze {}", file.display()))?;
    Ok((pipeline, session))
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
