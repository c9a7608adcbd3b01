use clap::Parser;
use std::path::PathBuf;

use crate::catalog::ReportType;
use crate::query::{Criteria, SortField, SortOrder};

#[derive(Parser, Debug)]
#[command(
    name = "report-query",
    about = "Query exported analytics reports: filter, rank and summarize rows",
    version,
    long_about = None
)]
pub struct Args {
    /// Directory holding the exported report files
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Report file to use when no type or file is requested
    #[arg(long)]
    pub default_file: Option<String>,

    /// List available reports instead of querying one
    #[arg(short, long)]
    pub list: bool,

    /// Report type (pages, referrers, countries, browsers, devices, operating-systems)
    #[arg(short, long)]
    pub report_type: Option<ReportType>,

    /// Explicit report file name, overrides --report-type
    #[arg(short, long)]
    pub file: Option<String>,

    /// Keep items containing this text (case-insensitive)
    #[arg(short, long)]
    pub contains: Option<String>,

    /// Keep items starting with this text (case-sensitive)
    #[arg(long)]
    pub starts_with: Option<String>,

    /// Minimum visitors
    #[arg(long)]
    pub min_visitors: Option<u64>,

    /// Minimum total visits
    #[arg(long)]
    pub min_total: Option<u64>,

    /// Field to rank by (visitors, total)
    #[arg(long)]
    pub sort_by: Option<SortField>,

    /// Sort direction (asc, desc)
    #[arg(long)]
    pub order: Option<SortOrder>,

    /// Number of rows to show, clamped to 1-200
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Omit the summary block
    #[arg(long)]
    pub no_summary: bool,

    /// Criteria as tool-call JSON arguments; replaces the query flags
    #[arg(long)]
    pub criteria: Option<String>,

    /// Print structured JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn to_criteria(&self) -> Criteria {
        Criteria {
            report_type: self.report_type,
            file_name: self.file.clone(),
            list_reports: Some(self.list),
            page_contains: self.contains.clone(),
            starts_with: self.starts_with.clone(),
            min_visitors: self.min_visitors,
            min_total: self.min_total,
            sort_by: self.sort_by,
            sort_order: self.order,
            limit: self.limit,
            include_summary: Some(!self.no_summary),
        }
    }
}
