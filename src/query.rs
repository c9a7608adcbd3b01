//! Query criteria and the filter/sort/limit pipeline.
//!
//! The pipeline is stateless:
//! 1. Filter rows by every predicate the criteria carry
//! 2. Stable-sort by the chosen measure and direction
//! 3. Take the first `limit` rows
//!
//! The aggregate totals are taken over the filtered rows before the limit,
//! so callers see both the displayed slice and everything that matched.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;
use tracing::info;

use crate::catalog::ReportType;
use crate::loader::ReportRow;
use crate::stats::{QueryOutcome, Totals};

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: usize = 200;

/// Measure to rank rows by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SortField {
    #[default]
    Visitors,
    Total,
}

impl SortField {
    fn key(self, row: &ReportRow) -> u64 {
        match self {
            SortField::Visitors => row.visitors,
            SortField::Total => row.total,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SortField::Visitors => "visitors",
            SortField::Total => "total",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "visitors" | "visitor" => Ok(SortField::Visitors),
            "total" | "visits" => Ok(SortField::Total),
            _ => Err(format!("Unknown sort field: {}", s)),
        }
    }
}

impl TryFrom<String> for SortField {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum SortOrder {
    /// Smallest first
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn name(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

impl TryFrom<String> for SortOrder {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Everything a caller can ask of one report query. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Criteria {
    pub report_type: Option<ReportType>,
    /// Explicit file; wins over `report_type`
    pub file_name: Option<String>,
    /// List the catalog instead of querying a report
    pub list_reports: Option<bool>,
    /// Case-insensitive substring of the item
    pub page_contains: Option<String>,
    /// Case-sensitive prefix of the item
    pub starts_with: Option<String>,
    pub min_visitors: Option<u64>,
    pub min_total: Option<u64>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<i64>,
    pub include_summary: Option<bool>,
}

impl Criteria {
    pub fn list_reports(&self) -> bool {
        self.list_reports.unwrap_or(false)
    }

    pub fn include_summary(&self) -> bool {
        self.include_summary.unwrap_or(true)
    }

    /// Requested limit clamped to `1..=MAX_LIMIT`
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT as i64) as usize
    }

    fn matches(&self, row: &ReportRow, contains_lower: Option<&str>) -> bool {
        if let Some(needle) = contains_lower {
            if !row.item.to_lowercase().contains(needle) {
                return false;
            }
        }
        if let Some(prefix) = &self.starts_with {
            if !row.item.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if self.min_visitors.is_some_and(|min| row.visitors < min) {
            return false;
        }
        if self.min_total.is_some_and(|min| row.total < min) {
            return false;
        }
        true
    }
}

pub fn run_query(rows: &[ReportRow], criteria: &Criteria) -> QueryOutcome {
    let start_time = Instant::now();
    let sort_by = criteria.sort_by.unwrap_or_default();
    let sort_order = criteria.sort_order.unwrap_or_default();
    let limit = criteria.effective_limit();
    let contains_lower = criteria.page_contains.as_deref().map(str::to_lowercase);

    let mut matched: Vec<&ReportRow> = rows
        .iter()
        .filter(|row| criteria.matches(row, contains_lower.as_deref()))
        .collect();

    let mut totals = Totals::default();
    for row in &matched {
        totals.add(row);
    }

    // sort_by is stable, so equal keys keep file order in both directions
    match sort_order {
        SortOrder::Ascending => matched.sort_by(|a, b| sort_by.key(a).cmp(&sort_by.key(b))),
        SortOrder::Descending => matched.sort_by(|a, b| sort_by.key(b).cmp(&sort_by.key(a))),
    }

    let matched_count = matched.len();
    let ranked: Vec<ReportRow> = matched.into_iter().take(limit).cloned().collect();

    info!(
        action = "complete",
        component = "query_pipeline",
        scanned = rows.len(),
        matched = matched_count,
        returned = ranked.len(),
        sort_by = sort_by.name(),
        sort_order = sort_order.name(),
        duration_ms = start_time.elapsed().as_millis(),
        "Query pipeline completed"
    );

    QueryOutcome {
        rows: ranked,
        scanned: rows.len(),
        matched: matched_count,
        totals,
        sort_by,
        sort_order,
        limit,
    }
}
