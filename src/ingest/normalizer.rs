//! Header-driven CSV normalization into [`CostRecord`]s

use super::error::{IngestError, RowError, SchemaError};
use super::record::{CostRecord, Period, UsageSignals, MAX_COST};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

/// Columns every extract must carry (matched case-insensitively)
pub const REQUIRED_COLUMNS: [&str; 4] = ["Service", "Region", "Cost", "Date"];

/// Output of a normalization pass
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    /// Rows converted successfully, in input order
    pub records: Vec<CostRecord>,
    /// Rows skipped, in input order
    pub row_errors: Vec<RowError>,
}

impl Normalized {
    /// Number of non-blank data rows seen
    pub fn total_rows(&self) -> usize {
        self.records.len() + self.row_errors.len()
    }
}

/// Positions of recognized columns within a header row
#[derive(Debug, Clone)]
struct ColumnMap {
    service: usize,
    region: usize,
    cost: usize,
    date: usize,
    resource_id: Option<usize>,
    instance_type: Option<usize>,
    cpu_utilization: Option<usize>,
    memory_utilization: Option<usize>,
    network_io: Option<usize>,
    storage_used: Option<usize>,
    running_hours: Option<usize>,
    access_count: Option<usize>,
    attached: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self, SchemaError> {
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            let key = header.trim_start_matches('\u{feff}').trim().to_ascii_lowercase();
            if !key.is_empty() {
                // First occurrence wins for duplicated headers
                positions.entry(key).or_insert(idx);
            }
        }

        if positions.is_empty() {
            return Err(SchemaError::MissingHeader);
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !positions.contains_key(&name.to_ascii_lowercase()))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns { missing });
        }

        let find = |name: &str| positions.get(name).copied();
        Ok(Self {
            service: positions["service"],
            region: positions["region"],
            cost: positions["cost"],
            date: positions["date"],
            resource_id: find("resourceid"),
            instance_type: find("instancetype"),
            cpu_utilization: find("cpuutilization"),
            memory_utilization: find("memoryutilization"),
            network_io: find("networkio"),
            storage_used: find("storageused"),
            running_hours: find("runninghours"),
            access_count: find("accesscount"),
            attached: find("attached"),
        })
    }
}

/// Converts raw billing extracts into typed records
///
/// # Examples
///
/// ```
/// use cost_optimizer::ingest::RecordNormalizer;
///
/// let csv = "Service,Region,Cost,Date\nEC2,us-east-1,450.00,2025-09\nS3,us-east-1,oops,2025-09\n";
/// let normalized = RecordNormalizer::new().normalize(csv)?;
/// assert_eq!(normalized.records.len(), 1);
/// assert_eq!(normalized.row_errors.len(), 1);
/// # Ok::<(), cost_optimizer::ingest::IngestError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordNormalizer;

impl RecordNormalizer {
    /// Create a normalizer
    pub fn new() -> Self {
        Self
    }

    /// Normalize delimited text with a header row
    ///
    /// # Errors
    /// Returns a schema error when the header is absent or lacks a required
    /// column. Malformed data rows never fail the call; they are reported in
    /// [`Normalized::row_errors`].
    pub fn normalize(&self, raw_text: &str) -> Result<Normalized, IngestError> {
        if raw_text.trim().is_empty() {
            return Err(SchemaError::MissingHeader.into());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(raw_text.as_bytes());

        let columns = ColumnMap::from_headers(reader.headers()?)?;
        let mut normalized = Normalized::default();

        for result in reader.records() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    log::warn!("Skipping unreadable row at line {}: {}", line, e);
                    normalized.row_errors.push(RowError {
                        line,
                        raw: String::new(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if row.iter().all(|field| field.is_empty()) {
                continue;
            }

            let line = row.position().map(|p| p.line()).unwrap_or(0);
            match parse_row(&row, &columns) {
                Ok(record) => normalized.records.push(record),
                Err(reason) => {
                    let raw = row.iter().collect::<Vec<_>>().join(",");
                    log::warn!("Skipping malformed row at line {}: {}", line, reason);
                    normalized.row_errors.push(RowError { line, raw, reason });
                }
            }
        }

        log::debug!(
            "Normalized {} of {} rows",
            normalized.records.len(),
            normalized.total_rows()
        );
        Ok(normalized)
    }
}

/// Normalize with the default normalizer
pub fn normalize(raw_text: &str) -> Result<Normalized, IngestError> {
    RecordNormalizer::new().normalize(raw_text)
}

fn field<'a>(row: &'a StringRecord, idx: usize) -> &'a str {
    row.get(idx).unwrap_or("")
}

fn optional_field<'a>(row: &'a StringRecord, idx: Option<usize>) -> &'a str {
    idx.map(|i| field(row, i)).unwrap_or("")
}

fn parse_row(row: &StringRecord, columns: &ColumnMap) -> Result<CostRecord, String> {
    let cost = parse_cost(field(row, columns.cost))?;

    let date = field(row, columns.date);
    if date.is_empty() {
        return Err("date is empty".to_string());
    }
    let period = Period::parse(date).ok_or_else(|| format!("date '{}' is not a valid date", date))?;

    let signals = UsageSignals {
        instance_type: non_empty(optional_field(row, columns.instance_type)),
        cpu_utilization: parse_number(optional_field(row, columns.cpu_utilization), "CPUUtilization")?,
        memory_utilization: parse_number(
            optional_field(row, columns.memory_utilization),
            "MemoryUtilization",
        )?,
        network_io: parse_number(optional_field(row, columns.network_io), "NetworkIO")?,
        storage_used: parse_number(optional_field(row, columns.storage_used), "StorageUsed")?,
        running_hours: parse_number(optional_field(row, columns.running_hours), "RunningHours")?,
        access_count: parse_count(optional_field(row, columns.access_count), "AccessCount")?,
        attached: parse_flag(optional_field(row, columns.attached), "Attached")?,
    };

    let record = CostRecord::new(
        field(row, columns.service),
        field(row, columns.region),
        cost,
        period,
    )
    .ok_or_else(|| format!("cost '{}' is out of range", field(row, columns.cost)))?
    .with_resource_id(optional_field(row, columns.resource_id))
    .with_signals(signals);

    Ok(record)
}

/// Parse a cost cell, accepting a leading `$` and thousands separators
pub(crate) fn parse_cost(raw: &str) -> Result<Decimal, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("cost is empty".to_string());
    }

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let cleaned: String = unsigned
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| format!("cost '{}' is not a number", trimmed))?;

    if negative && !value.is_zero() {
        return Err(format!("cost '{}' is negative", trimmed));
    }
    if value > MAX_COST {
        return Err(format!("cost '{}' exceeds the maximum of {}", trimmed, MAX_COST));
    }
    Ok(value)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_number(value: &str, column: &str) -> Result<Option<f64>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| format!("{} value '{}' is not a number", column, value))
}

fn parse_count(value: &str, column: &str) -> Result<Option<u64>, String> {
    match parse_number(value, column)? {
        None => Ok(None),
        Some(v) if v >= 0.0 => Ok(Some(v.round() as u64)),
        Some(_) => Err(format!("{} value '{}' is negative", column, value)),
    }
}

fn parse_flag(value: &str, column: &str) -> Result<Option<bool>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(Some(true)),
        "false" | "no" | "n" | "0" => Ok(Some(false)),
        _ => Err(format!("{} value '{}' is not a boolean", column, value)),
    }
}
