pub mod args;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod parser;
pub mod query;
pub mod render;
pub mod stats;
pub mod utils;

pub use args::Args;
pub use catalog::{Catalog, DirStore, ReportFile, ReportLabel, ReportStore, ReportType};
pub use config::Config;
pub use engine::{answer, answer_json, answer_json_structured, answer_structured, run};
pub use error::{ReportError, Result};
pub use loader::ReportRow;
pub use query::{run_query, Criteria, SortField, SortOrder};
pub use stats::{Answer, QueryOutcome, Totals};
