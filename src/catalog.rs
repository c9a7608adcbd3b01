use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{ReportError, Result};
use crate::query::Criteria;

// "<Prefix> - <DateRange>.csv"
static REPORT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>.+?) - (?P<range>.*)\.(?i:csv)$").expect("valid report name regex")
});

/// Category of a report file, inferred from its filename prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportLabel {
    Pages,
    Referrers,
    Countries,
    Browsers,
    Devices,
    OperatingSystems,
    Unknown,
}

impl ReportLabel {
    const KNOWN: [ReportLabel; 6] = [
        ReportLabel::Pages,
        ReportLabel::Referrers,
        ReportLabel::Countries,
        ReportLabel::Browsers,
        ReportLabel::Devices,
        ReportLabel::OperatingSystems,
    ];

    /// Filename prefix the report exporter uses for this category
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            ReportLabel::Pages => Some("Top Pages"),
            ReportLabel::Referrers => Some("Top Referrers"),
            ReportLabel::Countries => Some("Top Countries"),
            ReportLabel::Browsers => Some("Top Browsers"),
            ReportLabel::Devices => Some("Top Devices"),
            ReportLabel::OperatingSystems => Some("Top Operating Systems"),
            ReportLabel::Unknown => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ReportLabel::Pages => "Pages",
            ReportLabel::Referrers => "Referrers",
            ReportLabel::Countries => "Countries",
            ReportLabel::Browsers => "Browsers",
            ReportLabel::Devices => "Devices",
            ReportLabel::OperatingSystems => "Operating Systems",
            ReportLabel::Unknown => "Unknown",
        }
    }

    fn from_prefix(prefix: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|label| label.prefix() == Some(prefix))
            .unwrap_or(ReportLabel::Unknown)
    }
}

impl fmt::Display for ReportLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Report category a caller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum ReportType {
    #[default]
    Pages,
    Referrers,
    Countries,
    Browsers,
    Devices,
    OperatingSystems,
}

impl ReportType {
    pub fn label(self) -> ReportLabel {
        match self {
            ReportType::Pages => ReportLabel::Pages,
            ReportType::Referrers => ReportLabel::Referrers,
            ReportType::Countries => ReportLabel::Countries,
            ReportType::Browsers => ReportLabel::Browsers,
            ReportType::Devices => ReportLabel::Devices,
            ReportType::OperatingSystems => ReportLabel::OperatingSystems,
        }
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pages" | "page" => Ok(ReportType::Pages),
            "referrers" | "referrer" => Ok(ReportType::Referrers),
            "countries" | "country" => Ok(ReportType::Countries),
            "browsers" | "browser" => Ok(ReportType::Browsers),
            "devices" | "device" => Ok(ReportType::Devices),
            "operating-systems" | "operating_systems" | "os" => Ok(ReportType::OperatingSystems),
            _ => Err(format!("Unknown report type: {}", s)),
        }
    }
}

impl TryFrom<String> for ReportType {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

/// One report file in the catalog, described by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFile {
    pub file_name: String,
    pub label: ReportLabel,
    pub date_range: String,
}

impl ReportFile {
    pub fn describe(file_name: &str) -> Self {
        if let Some(captures) = REPORT_NAME.captures(file_name) {
            let label = ReportLabel::from_prefix(&captures["prefix"]);
            if label != ReportLabel::Unknown {
                return Self {
                    file_name: file_name.to_string(),
                    label,
                    date_range: captures["range"].to_string(),
                };
            }
        }

        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.to_string());

        Self {
            file_name: file_name.to_string(),
            label: ReportLabel::Unknown,
            date_range: stem,
        }
    }
}

/// Read-only access to the place report files live.
pub trait ReportStore {
    /// Where the reports come from, for messages
    fn location(&self) -> &Path;

    /// Names of the regular files available
    fn list(&self) -> Result<Vec<String>>;

    /// Full contents of one file from the listing
    fn read(&self, file_name: &str) -> Result<String>;
}

/// Reports stored as files in one directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReportStore for DirStore {
    fn location(&self) -> &Path {
        &self.dir
    }

    fn list(&self) -> Result<Vec<String>> {
        let configuration = |source| ReportError::Configuration {
            path: self.dir.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(configuration)? {
            let entry = entry.map_err(configuration)?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn read(&self, file_name: &str) -> Result<String> {
        fs::read_to_string(self.dir.join(file_name)).map_err(|source| ReportError::Read {
            file: file_name.to_string(),
            source,
        })
    }
}

fn has_csv_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Basename of a requested file, whatever separator the caller used.
fn base_name(requested: &str) -> &str {
    requested
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(requested)
}

/// Resolves report selections against the current contents of a store.
pub struct Catalog<S> {
    store: S,
    default_file: Option<String>,
}

impl<S: ReportStore> Catalog<S> {
    pub fn new(store: S, default_file: Option<String>) -> Self {
        Self {
            store,
            default_file,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Eligible report filenames, sorted
    pub fn file_names(&self) -> Result<Vec<String>> {
        let start_time = Instant::now();
        let mut names: Vec<String> = self
            .store
            .list()?
            .into_iter()
            .filter(|name| has_csv_extension(name))
            .collect();
        names.sort();

        debug!(
            action = "list",
            component = "catalog",
            location = ?self.store.location(),
            file_count = names.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Listed report files"
        );
        Ok(names)
    }

    /// Every eligible file with its inferred label and date range
    pub fn list(&self) -> Result<Vec<ReportFile>> {
        Ok(self
            .file_names()?
            .iter()
            .map(|name| ReportFile::describe(name))
            .collect())
    }

    pub fn resolve_file_name(&self, requested: &str) -> Result<ReportFile> {
        let name = base_name(requested);
        if !has_csv_extension(name) {
            return Err(ReportError::InvalidFormat(name.to_string()));
        }

        if !self.file_names()?.iter().any(|candidate| candidate == name) {
            return Err(ReportError::NotFound(name.to_string()));
        }

        info!(action = "resolve", component = "catalog", file_name = name, "Resolved report by file name");
        Ok(ReportFile::describe(name))
    }

    /// Latest file for a report type; filenames sort by date under the
    /// exporter's naming convention, so the last match wins.
    pub fn resolve_type(&self, report_type: ReportType) -> Result<ReportFile> {
        let label = report_type.label();
        let prefix = format!("{} - ", label.prefix().unwrap_or_default());

        let name = self
            .file_names()?
            .into_iter()
            .filter(|name| name.starts_with(&prefix))
            .next_back()
            .ok_or_else(|| ReportError::NoMatch(label.name().to_lowercase()))?;

        info!(action = "resolve", component = "catalog", report_type = ?report_type, file_name = %name, "Resolved report by type");
        Ok(ReportFile::describe(&name))
    }

    pub fn resolve_default(&self) -> Result<ReportFile> {
        let names = self.file_names()?;

        if let Some(default_file) = &self.default_file {
            if names.iter().any(|name| name == default_file) {
                info!(action = "resolve", component = "catalog", file_name = %default_file, "Using configured default report");
                return Ok(ReportFile::describe(default_file));
            }
            debug!(action = "resolve", component = "catalog", file_name = %default_file, "Configured default report not present");
        }

        let name = names
            .last()
            .ok_or_else(|| ReportError::EmptyCatalog(self.store.location().to_path_buf()))?;

        info!(action = "resolve", component = "catalog", file_name = %name, "Using latest report");
        Ok(ReportFile::describe(name))
    }

    /// Picks the file for a query: explicit name, then type, then default.
    pub fn resolve(&self, criteria: &Criteria) -> Result<ReportFile> {
        if let Some(file_name) = criteria.file_name.as_deref().filter(|f| !f.trim().is_empty()) {
            return self.resolve_file_name(file_name);
        }

        match criteria.report_type {
            Some(report_type) => self.resolve_type(report_type),
            None => self.resolve_default(),
        }
    }
}
