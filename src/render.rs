use std::fmt::Write;

use crate::error::ReportError;
use crate::stats::{Answer, CatalogListing, ReportOutput};
use crate::utils::format_number;

pub fn render_answer(answer: &Answer) -> String {
    match answer {
        Answer::Listing(listing) => render_listing(listing),
        Answer::Report(report) => render_report(report),
    }
}

pub fn render_listing(listing: &CatalogListing) -> String {
    if listing.reports.is_empty() {
        return format!("No reports found in {}.", listing.location);
    }

    let mut out = format!("Available reports ({}):\n", listing.reports.len());
    for (i, report) in listing.reports.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} | {} | {}",
            i + 1,
            report.label,
            report.date_range,
            report.file_name
        );
    }
    out.trim_end().to_string()
}

fn write_header(out: &mut String, report: &ReportOutput) {
    let _ = writeln!(out, "Report: {}", report.file.label);
    let _ = writeln!(out, "Period: {}", report.file.date_range);
    let _ = writeln!(out, "File: {}", report.file.file_name);
    let _ = writeln!(out, "Rows scanned: {}", format_number(report.outcome.scanned as u64));
}

pub fn render_report(report: &ReportOutput) -> String {
    let outcome = &report.outcome;
    let mut out = String::new();

    if outcome.rows.is_empty() {
        out.push_str("No rows match the given filters.\n");
        write_header(&mut out, report);
        return out.trim_end().to_string();
    }

    if report.include_summary {
        write_header(&mut out, report);
        let _ = writeln!(out, "Rows matched: {}", format_number(outcome.matched as u64));
        let _ = writeln!(out, "Total visitors: {}", format_number(outcome.totals.visitors));
        let _ = writeln!(out, "Total visits: {}", format_number(outcome.totals.total));
        let _ = writeln!(
            out,
            "Showing top {} by {} ({})\n",
            outcome.rows.len(),
            outcome.sort_by.name(),
            outcome.sort_order.name()
        );
    }

    for (i, row) in outcome.rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} | Visitors: {} | Total: {}",
            i + 1,
            row.item,
            format_number(row.visitors),
            format_number(row.total)
        );
    }
    out.trim_end().to_string()
}

pub fn render_json(answer: &Answer) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(answer)
}

/// One-line error message for the tool boundary.
pub fn render_error(error: &ReportError) -> String {
    match error {
        ReportError::Read { file, source } => {
            format!("Error reading {}: {}", file, cause_text(source))
        }
        ReportError::Configuration { path, source } => format!(
            "Error: cannot read data directory '{}': {}",
            path.display(),
            cause_text(source)
        ),
        other => format!("Error: {}", other),
    }
}

/// I/O errors built from an empty message display as nothing.
fn cause_text(source: &std::io::Error) -> String {
    let text = source.to_string();
    if text.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ReportFile;
    use crate::loader::ReportRow;
    use crate::query::{run_query, Criteria};

    fn report(rows: Vec<ReportRow>, criteria: &Criteria) -> ReportOutput {
        ReportOutput {
            file: ReportFile::describe("Top Pages - Jan 1, 26.csv"),
            include_summary: criteria.include_summary(),
            outcome: run_query(&rows, criteria),
        }
    }

    fn rows() -> Vec<ReportRow> {
        vec![
            ReportRow {
                item: "/home".to_string(),
                visitors: 100,
                total: 150,
            },
            ReportRow {
                item: "/about".to_string(),
                visitors: 50,
                total: 1200,
            },
        ]
    }

    #[test]
    fn test_render_summary_and_rows() {
        let text = render_report(&report(rows(), &Criteria::default()));
        assert!(text.starts_with("Report: Pages\nPeriod: Jan 1, 26\nFile: Top Pages - Jan 1, 26.csv"));
        assert!(text.contains("Rows scanned: 2\nRows matched: 2"));
        assert!(text.contains("Total visitors: 150"));
        assert!(text.contains("Total visits: 1,350"));
        assert!(text.ends_with(
            "1. /home | Visitors: 100 | Total: 150\n2. /about | Visitors: 50 | Total: 1,200"
        ));
    }

    #[test]
    fn test_render_without_summary() {
        let criteria = Criteria {
            include_summary: Some(false),
            limit: Some(1),
            ..Criteria::default()
        };
        let text = render_report(&report(rows(), &criteria));
        assert_eq!(text, "1. /home | Visitors: 100 | Total: 150");
    }

    #[test]
    fn test_render_no_matches() {
        let criteria = Criteria {
            min_visitors: Some(999_999),
            include_summary: Some(false),
            ..Criteria::default()
        };
        let text = render_report(&report(rows(), &criteria));
        assert!(text.starts_with("No rows match the given filters."));
        assert!(text.contains("Report: Pages"));
        assert!(text.contains("Period: Jan 1, 26"));
        assert!(text.ends_with("Rows scanned: 2"));
    }

    #[test]
    fn test_render_listing() {
        let listing = CatalogListing {
            location: "reports".to_string(),
            reports: vec![
                ReportFile::describe("Top Devices - Feb.csv"),
                ReportFile::describe("misc.csv"),
            ],
        };
        assert_eq!(
            render_listing(&listing),
            "Available reports (2):\n1. Devices | Feb | Top Devices - Feb.csv\n2. Unknown | misc | misc.csv"
        );

        let empty = CatalogListing {
            location: "reports".to_string(),
            reports: Vec::new(),
        };
        assert_eq!(render_listing(&empty), "No reports found in reports.");
    }

    #[test]
    fn test_render_error_kinds() {
        let err = ReportError::NotFound("secret.csv".to_string());
        assert_eq!(render_error(&err), "Error: report file 'secret.csv' not found");

        let err = ReportError::Read {
            file: "a.csv".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(render_error(&err), "Error reading a.csv: denied");
    }

    #[test]
    fn test_render_error_without_message() {
        let err = ReportError::Read {
            file: "a.csv".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, ""),
        };
        assert_eq!(render_error(&err), "Error reading a.csv: Unknown error");

        let err = ReportError::Configuration {
            path: std::path::PathBuf::from("reports"),
            source: std::io::Error::new(std::io::ErrorKind::Other, ""),
        };
        assert_eq!(
            render_error(&err),
            "Error: cannot read data directory 'reports': Unknown error"
        );
    }
}
