use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

use crate::catalog::ReportStore;
use crate::error::Result;
use crate::parser::{coerce_count, parse_line};

/// One analytics record: an item label with its two measures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub item: String,
    pub visitors: u64,
    pub total: u64,
}

/// The three positional fields of a data line, before conversion.
#[derive(Debug, Default)]
struct RawRow {
    item: String,
    visitors: String,
    total: String,
}

impl RawRow {
    fn from_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        Self {
            item: fields.next().unwrap_or_default(),
            visitors: fields.next().unwrap_or_default(),
            total: fields.next().unwrap_or_default(),
        }
    }

    fn into_row(self) -> Option<ReportRow> {
        if self.item.is_empty() {
            return None;
        }
        Some(ReportRow {
            item: self.item,
            visitors: coerce_count(&self.visitors),
            total: coerce_count(&self.total),
        })
    }
}

/// Turns report text into rows. The first non-blank line is the header.
pub fn parse_rows(content: &str) -> Vec<ReportRow> {
    let lines: Vec<&str> = content
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return Vec::new();
    }

    let data_lines = lines.len() - 1;
    let rows: Vec<ReportRow> = lines[1..]
        .iter()
        .filter_map(|line| RawRow::from_fields(parse_line(line)).into_row())
        .collect();

    if rows.len() < data_lines {
        warn!(
            action = "parse",
            component = "row_loader",
            skipped = data_lines - rows.len(),
            "Skipped rows with an empty item"
        );
    }
    rows
}

pub fn load_rows<S: ReportStore>(store: &S, file_name: &str) -> Result<Vec<ReportRow>> {
    let start_time = Instant::now();
    info!(action = "start", component = "row_loader", file_name = file_name, "Loading report rows");

    let content = store.read(file_name)?;
    let rows = parse_rows(&content);

    info!(
        action = "complete",
        component = "row_loader",
        row_count = rows.len(),
        bytes = content.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Loaded report rows"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::MemoryStore;
    use crate::error::ReportError;

    fn row(item: &str, visitors: u64, total: u64) -> ReportRow {
        ReportRow {
            item: item.to_string(),
            visitors,
            total,
        }
    }

    #[test]
    fn test_parse_rows_basic() {
        let rows = parse_rows("item,visitors,total\n/home,100,150\n/about,50,\"1,200\"\n");
        assert_eq!(rows, vec![row("/home", 100, 150), row("/about", 50, 1200)]);
    }

    #[test]
    fn test_parse_rows_mixed_line_endings() {
        let rows = parse_rows("h\r\n  a,1,2  \r\n\r\nb,3,4\rc,5,6\n\n");
        assert_eq!(rows, vec![row("a", 1, 2), row("b", 3, 4), row("c", 5, 6)]);
    }

    #[test]
    fn test_header_only_or_empty() {
        assert!(parse_rows("").is_empty());
        assert!(parse_rows("\n\n  \n").is_empty());
        assert!(parse_rows("item,visitors,total\n").is_empty());
    }

    #[test]
    fn test_missing_and_extra_fields() {
        let rows = parse_rows("h\nonly\nx,7\ny,1,2,3,4\n");
        assert_eq!(rows, vec![row("only", 0, 0), row("x", 7, 0), row("y", 1, 2)]);
    }

    #[test]
    fn test_empty_item_skipped() {
        let rows = parse_rows("h\n,5,5\n\"\",1,1\nz,oops,n/a\n");
        assert_eq!(rows, vec![row("z", 0, 0)]);
    }

    #[test]
    fn test_load_rows_from_store() {
        let store = MemoryStore::new(&[("r.csv", "item,visitors,total\n/home,\"1,000\",2000\n")]);
        assert_eq!(load_rows(&store, "r.csv").unwrap(), vec![row("/home", 1000, 2000)]);
        assert!(matches!(
            load_rows(&store, "gone.csv").unwrap_err(),
            ReportError::Read { ref file, .. } if file == "gone.csv"
        ));
    }
}
