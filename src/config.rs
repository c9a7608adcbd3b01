use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::args::Args;

pub const DATA_DIR_ENV: &str = "REPORT_QUERY_DATA_DIR";
pub const DEFAULT_FILE_ENV: &str = "REPORT_QUERY_DEFAULT_FILE";
pub const DEFAULT_DATA_DIR: &str = "reports";
pub const DEFAULT_REPORT_FILE: &str = "Top Pages - Jan 1, 26.csv";

/// Where reports live and which one to use when nothing is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub default_file: Option<String>,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            default_file: None,
        }
    }

    pub fn with_default_file(mut self, file_name: impl Into<String>) -> Self {
        self.default_file = Some(file_name.into());
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Flags first, then environment, then built-in defaults.
    pub fn from_args(args: &Args) -> Self {
        let data_dir = args
            .data_dir
            .clone()
            .or_else(|| env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let default_file = args
            .default_file
            .clone()
            .or_else(|| env::var(DEFAULT_FILE_ENV).ok())
            .unwrap_or_else(|| DEFAULT_REPORT_FILE.to_string());

        info!(action = "resolve", component = "config", data_dir = ?data_dir, default_file = %default_file, "Configuration resolved");

        Self {
            data_dir,
            default_file: Some(default_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_win() {
        let args = Args::parse_from([
            "report-query",
            "--data-dir",
            "/srv/analytics",
            "--default-file",
            "Top Devices - Mar.csv",
        ]);
        let config = Config::from_args(&args);
        assert_eq!(config.data_dir(), Path::new("/srv/analytics"));
        assert_eq!(config.default_file.as_deref(), Some("Top Devices - Mar.csv"));
    }

    #[test]
    fn test_builder() {
        let config = Config::new("data").with_default_file("a.csv");
        assert_eq!(config.data_dir(), Path::new("data"));
        assert_eq!(config.default_file.as_deref(), Some("a.csv"));
    }
}
