//! Billing extract fixtures
//!
//! Extracts are written into a fresh temp directory so CLI tests never pick
//! up a `.cost-optimizer.toml` from the repository.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Sample extract offered to new users
pub const SAMPLE_CSV: &str = "Service,Region,Cost,Date
EC2,us-east-1,450.00,2025-09
S3,us-east-1,850.00,2025-09
RDS,us-east-1,520.00,2025-09
Lambda,us-east-1,45.00,2025-09
EC2,us-east-1,420.00,2025-08
S3,us-east-1,780.00,2025-08
";

/// Extract with usage columns that trigger several detectors
pub const USAGE_CSV: &str = "Service,Region,Cost,Date,ResourceId,InstanceType,CpuUtilization,RunningHours,StorageUsed,AccessCount,Attached
EC2,us-east-1,800.00,2025-09,i-0abc,m5.2xlarge,8,720,,,
EC2,us-east-1,780.00,2025-08,i-0abc,m5.2xlarge,9,720,,,
EC2,us-west-2,120.00,2025-09,i-0idle,t3.large,,40,,,
S3,us-east-1,300.00,2025-09,logs-archive,,,,2500,10,
EBS,us-east-1,60.00,2025-09,vol-0dead,gp2,,,,,false
";

/// Five valid rows and one with an unparseable cost on line 4
pub const ONE_MALFORMED_CSV: &str = "Service,Region,Cost,Date
EC2,us-east-1,100.00,2025-09
S3,us-east-1,200.00,2025-09
RDS,us-east-1,not-a-number,2025-09
Lambda,us-east-1,50.00,2025-09
EC2,us-east-1,110.00,2025-08
S3,us-east-1,190.00,2025-08
";

/// Write `contents` to `billing.csv` in a new temp directory
///
/// The TempDir must be kept alive for the path to stay valid.
pub fn write_extract(contents: &str) -> anyhow::Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let path = dir.path().join("billing.csv");
    fs::write(&path, contents)?;
    Ok((dir, path))
}
