use serde::Serialize;

use crate::catalog::ReportFile;
use crate::loader::ReportRow;
use crate::query::{SortField, SortOrder};

/// Sums over every row that passed the filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub visitors: u64,
    pub total: u64,
}

impl Totals {
    pub fn add(&mut self, row: &ReportRow) {
        self.visitors = self.visitors.saturating_add(row.visitors);
        self.total = self.total.saturating_add(row.total);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    /// Ranked rows after the limit
    pub rows: Vec<ReportRow>,
    /// Rows read from the file
    pub scanned: usize,
    /// Rows that passed the filters, before the limit
    pub matched: usize,
    pub totals: Totals,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportOutput {
    pub file: ReportFile,
    pub include_summary: bool,
    pub outcome: QueryOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogListing {
    pub location: String,
    pub reports: Vec<ReportFile>,
}

/// Anything a successful invocation can produce.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Answer {
    Listing(CatalogListing),
    Report(ReportOutput),
}
