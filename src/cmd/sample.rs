//! Sample command implementation
//!
//! Writes a small billing extract that exercises the CSV format.

use anyhow::Result;
use console::style;
use std::path::Path;

use crate::error::CostOptimizerError;
use crate::fmt::CHECKMARK;
use crate::infra::{FileSystem, RealFileSystem};

/// Default file name for the sample extract
pub const DEFAULT_SAMPLE_OUTPUT: &str = "sample-aws-costs.csv";

/// Sample billing extract
pub const SAMPLE_CSV: &str = "Service,Region,Cost,Date
EC2,us-east-1,450.00,2025-09
S3,us-east-1,850.00,2025-09
RDS,us-east-1,520.00,2025-09
Lambda,us-east-1,45.00,2025-09
EC2,us-east-1,420.00,2025-08
S3,us-east-1,780.00,2025-08
";

/// Write the sample extract to `output`
pub fn cmd_sample(output: &Path) -> Result<()> {
    write_sample(output, &RealFileSystem)?;
    println!(
        "{} Wrote sample extract to {}",
        CHECKMARK,
        style(output.display()).cyan().bold()
    );
    println!(
        "   Try {}",
        style(format!("cost-optimizer analyze {}", output.display())).cyan()
    );
    Ok(())
}

/// Write the sample extract through a filesystem
pub fn write_sample<FS: FileSystem>(output: &Path, fs: &FS) -> Result<(), CostOptimizerError> {
    fs.write(output, SAMPLE_CSV)
        .map_err(|source| CostOptimizerError::Io {
            context: format!("writing {}", output.display()),
            source,
        })
}
