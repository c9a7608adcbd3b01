use std::time::Instant;
use tracing::{error, info};

use crate::catalog::{Catalog, DirStore, ReportStore};
use crate::config::Config;
use crate::error::{ReportError, Result};
use crate::loader::load_rows;
use crate::query::{run_query, Criteria};
use crate::render::{render_answer, render_error, render_json};
use crate::stats::{Answer, CatalogListing, ReportOutput};

/// Runs one invocation against a catalog.
pub fn run<S: ReportStore>(catalog: &Catalog<S>, criteria: &Criteria) -> Result<Answer> {
    let total_start_time = Instant::now();

    if criteria.list_reports() {
        let reports = catalog.list()?;
        info!(action = "complete", component = "engine", report_count = reports.len(), "Listed reports");
        return Ok(Answer::Listing(CatalogListing {
            location: catalog.store().location().display().to_string(),
            reports,
        }));
    }

    info!(action = "start", component = "engine", criteria = ?criteria, "Starting report query");

    let file = catalog.resolve(criteria)?;
    let rows = load_rows(catalog.store(), &file.file_name)?;
    let outcome = run_query(&rows, criteria);

    info!(
        action = "complete",
        component = "engine",
        file_name = %file.file_name,
        matched = outcome.matched,
        duration_ms = total_start_time.elapsed().as_millis(),
        "Report query completed"
    );

    Ok(Answer::Report(ReportOutput {
        file,
        include_summary: criteria.include_summary(),
        outcome,
    }))
}

fn catalog_for(config: &Config) -> Catalog<DirStore> {
    Catalog::new(DirStore::new(config.data_dir()), config.default_file.clone())
}

fn failed(err: ReportError) -> String {
    error!(action = "fail", component = "engine", error = %err, "Report query failed");
    render_error(&err)
}

/// Tool boundary: always returns text, failures included.
pub fn answer(config: &Config, criteria: &Criteria) -> String {
    match run(&catalog_for(config), criteria) {
        Ok(answer) => render_answer(&answer),
        Err(err) => failed(err),
    }
}

/// Like [`answer`], but emits the structured result as JSON.
pub fn answer_structured(config: &Config, criteria: &Criteria) -> String {
    match run(&catalog_for(config), criteria) {
        Ok(answer) => render_json(&answer).unwrap_or_else(|e| format!("Error: {}", e)),
        Err(err) => failed(err),
    }
}

fn parse_arguments(arguments: &str) -> Result<Criteria> {
    let arguments = if arguments.trim().is_empty() { "{}" } else { arguments };
    serde_json::from_str(arguments).map_err(|e| ReportError::InvalidArguments(e.to_string()))
}

/// Tool boundary for raw tool-call arguments.
pub fn answer_json(config: &Config, arguments: &str) -> String {
    match parse_arguments(arguments) {
        Ok(criteria) => answer(config, &criteria),
        Err(err) => failed(err),
    }
}

/// Raw tool-call arguments in, structured JSON out.
pub fn answer_json_structured(config: &Config, arguments: &str) -> String {
    match parse_arguments(arguments) {
        Ok(criteria) => answer_structured(config, &criteria),
        Err(err) => failed(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::MemoryStore;
    use crate::catalog::ReportLabel;

    const PAGES: &str = "item,visitors,total\n/home,100,150\n/about,50,\"1,200\"\n";

    #[test]
    fn test_run_default_report() {
        let catalog = Catalog::new(
            MemoryStore::new(&[("Top Pages - Jan 1, 26.csv", PAGES)]),
            None,
        );
        let Answer::Report(report) = run(&catalog, &Criteria::default()).unwrap() else {
            panic!("expected a report");
        };
        assert_eq!(report.file.label, ReportLabel::Pages);
        assert_eq!(report.outcome.matched, 2);
        assert_eq!(report.outcome.totals.visitors, 150);
        assert_eq!(report.outcome.totals.total, 1350);
    }

    #[test]
    fn test_run_listing_ignores_other_criteria() {
        let catalog = Catalog::new(MemoryStore::new(&[("Top Pages - Jan.csv", PAGES)]), None);
        let criteria = Criteria {
            list_reports: Some(true),
            file_name: Some("missing.csv".to_string()),
            ..Criteria::default()
        };
        let Answer::Listing(listing) = run(&catalog, &criteria).unwrap() else {
            panic!("expected a listing");
        };
        assert_eq!(listing.reports.len(), 1);
    }

    #[test]
    fn test_answer_json_rejects_bad_arguments() {
        let config = Config::new("does-not-matter");
        let text = answer_json(&config, r#"{"sortBy":"height"}"#);
        assert!(text.starts_with("Error: invalid arguments:"), "{text}");

        let text = answer_json_structured(&config, "{not json");
        assert!(text.starts_with("Error: invalid arguments:"), "{text}");
    }

    #[test]
    fn test_answer_json_accepts_mixed_case_values() {
        let dir = std::env::temp_dir().join("report-query-unused");
        let config = Config::new(dir);
        for arguments in [
            r#"{"reportType":"Pages","listReports":null}"#,
            r#"{"reportType":"page","sortBy":"Total","sortOrder":"DESC"}"#,
        ] {
            let text = answer_json(&config, arguments);
            assert!(!text.starts_with("Error: invalid arguments"), "{text}");
        }
    }

    #[test]
    fn test_answer_missing_directory() {
        let config = Config::new("/nonexistent/report-query/data");
        let text = answer(&config, &Criteria::default());
        assert!(text.starts_with("Error: cannot read data directory"), "{text}");
    }
}
