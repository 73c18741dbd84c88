//! Normalized billing line items

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service/region label used when a row leaves the cell empty
pub const UNKNOWN: &str = "unknown";

/// Largest accepted cost for a single line item (one quadrillion)
///
/// Totals and annualized figures over any number of rows stay inside
/// `Decimal`'s range.
pub const MAX_COST: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// A billing month (`YYYY-MM`), ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month (1-12)
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Parse a date-ish cell and truncate it to its month
    ///
    /// Accepts `YYYY-MM`, `YYYY/MM`, `YYYY-MM-DD`, `YYYY/MM/DD`,
    /// `YYYY-MM-DD HH:MM:SS` and RFC 3339 timestamps.
    ///
    /// # Examples
    ///
    /// ```
    /// use cost_optimizer::ingest::Period;
    ///
    /// let period = Period::parse("2025-09-17").unwrap();
    /// assert_eq!(period.to_string(), "2025-09");
    /// assert_eq!(Period::parse("2025-09"), Some(period));
    /// assert!(Period::parse("September").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
            return Self::new(ts.year(), ts.month());
        }

        for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
                return Self::new(ts.year(), ts.month());
            }
        }

        for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Self::new(date.year(), date.month());
            }
        }

        // Year-month only: pin to the first of the month
        for sep in ['-', '/'] {
            let padded = format!("{s}{sep}01");
            let fmt = format!("%Y{sep}%m{sep}%d");
            if let Ok(date) = NaiveDate::parse_from_str(&padded, &fmt) {
                return Self::new(date.year(), date.month());
            }
        }

        None
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid billing period '{}'", s.trim()))
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl TryFrom<String> for Period {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Optional per-resource usage signals carried by richer billing extracts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSignals {
    /// Instance type, storage class or Lambda memory size (e.g. `t3.large`, `Standard`, `1024MB`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    /// Average CPU utilization in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_utilization: Option<f64>,
    /// Average memory utilization in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_utilization: Option<f64>,
    /// Network throughput in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_io: Option<f64>,
    /// Stored data in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_used: Option<f64>,
    /// Hours the resource ran during the period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running_hours: Option<f64>,
    /// Requests against the resource during the period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_count: Option<u64>,
    /// Whether a volume is attached to an instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached: Option<bool>,
}

impl UsageSignals {
    /// True when no signal column carried a value
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// One normalized line item of cloud spend
///
/// Constructed by the normalizer; fields are read through accessors so the
/// non-negative cost invariant cannot be broken afterwards.
///
/// # Examples
///
/// ```
/// use cost_optimizer::ingest::{CostRecord, Period};
/// use rust_decimal::Decimal;
///
/// let record = CostRecord::new("EC2", "us-east-1", Decimal::new(45000, 2), Period::new(2025, 9).unwrap())
///     .unwrap()
///     .with_resource_id("i-0abc");
/// assert_eq!(record.service(), "EC2");
/// assert_eq!(record.resource_id(), Some("i-0abc"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    service: String,
    region: String,
    cost: Decimal,
    period: Period,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "UsageSignals::is_empty")]
    signals: UsageSignals,
}

impl CostRecord {
    /// Create a record; `None` when `cost` is negative or above [`MAX_COST`]
    ///
    /// Empty service or region labels become [`UNKNOWN`].
    pub fn new(
        service: impl Into<String>,
        region: impl Into<String>,
        cost: Decimal,
        period: Period,
    ) -> Option<Self> {
        if (cost.is_sign_negative() && !cost.is_zero()) || cost > MAX_COST {
            return None;
        }
        Some(Self {
            service: or_unknown(service.into()),
            region: or_unknown(region.into()),
            cost,
            period,
            resource_id: None,
            signals: UsageSignals::default(),
        })
    }

    /// Attach a resource identifier (ignored when blank)
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        let id = resource_id.into();
        let id = id.trim();
        self.resource_id = (!id.is_empty()).then(|| id.to_string());
        self
    }

    /// Attach usage signals
    pub fn with_signals(mut self, signals: UsageSignals) -> Self {
        self.signals = signals;
        self
    }

    /// Service name as written in the extract
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Region name
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Line item cost
    pub fn cost(&self) -> Decimal {
        self.cost
    }

    /// Billing month
    pub fn period(&self) -> Period {
        self.period
    }

    /// Resource identifier, when the extract has one
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    /// Usage signals (empty for plain Service/Region/Cost/Date extracts)
    pub fn signals(&self) -> &UsageSignals {
        &self.signals
    }

    /// True when the service matches `name` ignoring case
    pub fn is_service(&self, name: &str) -> bool {
        self.service.eq_ignore_ascii_case(name)
    }
}

fn or_unknown(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}
