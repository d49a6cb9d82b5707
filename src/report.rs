use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scanner::ScanWarning;
use crate::{ClassUsage, RunStats};

/// Metadata for a generation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Version of the report format
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: DateTime<Utc>,

    /// Generator version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator_version: Option<String>,
}

/// Per-class usage information in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportClassInfo {
    /// Number of occurrences across all scanned files
    pub count: usize,

    /// Files where this class was found
    pub files: Vec<String>,
}

/// A skipped file, in report form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportWarning {
    pub path: String,
    pub reason: String,
}

/// Statistics about the generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStatistics {
    /// Number of files matched by the content patterns
    pub files_matched: usize,

    /// Number of files read and scanned
    pub files_scanned: usize,

    /// Number of matched files skipped
    pub files_skipped: usize,

    /// Candidate tokens seen before resolution
    pub candidates_seen: usize,

    /// Unique classes that resolved to rules
    pub classes_matched: usize,

    /// Generated CSS size in bytes
    pub css_size_bytes: usize,

    /// Whether the CSS was minified
    pub minified: bool,

    /// Processing time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

/// Complete report structure, written as JSON next to the stylesheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about the run
    pub metadata: ReportMetadata,

    /// Map of class names to their usage information
    pub classes: IndexMap<String, ReportClassInfo>,

    /// Files that matched but contributed nothing
    pub warnings: Vec<ReportWarning>,

    /// Statistics about the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ReportStatistics>,
}

impl Report {
    /// Create a new report with default metadata
    pub fn new() -> Self {
        Self {
            metadata: ReportMetadata {
                version: "1.0.0".to_string(),
                generated_at: Utc::now(),
                generator_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            },
            classes: IndexMap::new(),
            warnings: Vec::new(),
            statistics: None,
        }
    }

    /// Convert the report to a JSON value
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }

    /// Convert the report to a pretty JSON string
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder assembling a report from the pieces a run produces
pub struct ReportBuilder {
    report: Report,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            report: Report::new(),
        }
    }

    /// Record class usage, in scan discovery order
    pub fn with_classes(mut self, classes: &IndexMap<String, ClassUsage>) -> Self {
        for (name, usage) in classes {
            let files = usage
                .files
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            self.report.classes.insert(
                name.clone(),
                ReportClassInfo {
                    count: usage.count,
                    files,
                },
            );
        }
        self
    }

    /// Record the files skipped during the scan
    pub fn with_warnings(mut self, warnings: &[ScanWarning]) -> Self {
        for warning in warnings {
            self.report.warnings.push(ReportWarning {
                path: warning.path.display().to_string(),
                reason: warning.reason.to_string(),
            });
        }
        self
    }

    /// Record run statistics
    pub fn with_stats(mut self, stats: &RunStats, minified: bool) -> Self {
        self.report.statistics = Some(ReportStatistics {
            files_matched: stats.files_matched,
            files_scanned: stats.files_scanned,
            files_skipped: stats.files_skipped,
            candidates_seen: stats.candidates_seen,
            classes_matched: stats.classes_matched,
            css_size_bytes: stats.css_size_bytes,
            minified,
            processing_time_ms: Some(stats.elapsed.as_millis() as u64),
        });
        self
    }

    pub fn build(self) -> Report {
        self.report
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
