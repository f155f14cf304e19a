//! Ingest feed domain models: workspaces, strikes, scans, and ingests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::job::Job;

// ============================================================================
// Ingest status
// ============================================================================

/// Lifecycle status of an ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestStatus {
    Transferring,
    Transferred,
    Deferred,
    Ingesting,
    Ingested,
    Errored,
    Duplicate,
    /// Catch-all for statuses this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

impl IngestStatus {
    /// The wire form of the status, usable as a query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            IngestStatus::Transferring => "TRANSFERRING",
            IngestStatus::Transferred => "TRANSFERRED",
            IngestStatus::Deferred => "DEFERRED",
            IngestStatus::Ingesting => "INGESTING",
            IngestStatus::Ingested => "INGESTED",
            IngestStatus::Errored => "ERRORED",
            IngestStatus::Duplicate => "DUPLICATE",
            IngestStatus::Unknown => "UNKNOWN",
        }
    }

    /// Whether the file reached a final disposition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            IngestStatus::Ingested
                | IngestStatus::Errored
                | IngestStatus::Duplicate
                | IngestStatus::Deferred
        )
    }
}

// ============================================================================
// Workspaces, strikes, scans
// ============================================================================

/// A storage workspace files land in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Workspace {
    pub id: Option<i64>,
    pub name: String,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// One file-matching rule of a strike configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IngestFileRule {
    pub filename_regex: String,
    pub data_types: Vec<String>,
    pub workspace_path: String,
    pub workspace_name: String,
}

/// Configuration block of a strike process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StrikeConfiguration {
    pub version: String,
    pub mount: String,
    pub transfer_suffix: String,
    pub files_to_ingest: Vec<IngestFileRule>,
}

/// A strike process watching a drop directory.
///
/// The list endpoint returns strikes without configuration; the details
/// endpoint fills it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Strike {
    pub id: Option<i64>,
    pub name: String,
    pub title: String,
    pub description: String,
    pub job: Option<Job>,
    pub configuration: StrikeConfiguration,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl Strike {
    /// Patterns this strike ingests, from its configuration rules.
    pub fn filename_patterns(&self) -> Vec<&str> {
        self.configuration
            .files_to_ingest
            .iter()
            .map(|rule| rule.filename_regex.as_str())
            .collect()
    }
}

/// A scan process sweeping a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Scan {
    pub id: Option<i64>,
    pub name: String,
    pub title: String,
    pub description: String,
    pub file_count: i64,
    pub job: Option<Job>,
    pub dry_run_job: Option<Job>,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

// ============================================================================
// Ingests
// ============================================================================

/// One file moving through the ingest pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Ingest {
    pub id: Option<i64>,
    pub file_name: String,
    pub scan: Option<Scan>,
    pub strike: Option<Strike>,
    pub status: IngestStatus,
    pub bytes_transferred: i64,
    pub transfer_started: Option<DateTime<Utc>>,
    pub transfer_ended: Option<DateTime<Utc>>,
    pub media_type: String,
    pub file_size: i64,
    pub data_type: Vec<String>,
    pub file_path: String,
    pub workspace: Option<Workspace>,
    pub new_file_path: String,
    pub new_workspace: Option<Workspace>,
    pub ingest_started: Option<DateTime<Utc>>,
    pub ingest_ended: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl Ingest {
    /// Fraction of the file transferred so far, in [0, 1].
    pub fn transfer_progress(&self) -> f64 {
        if self.file_size <= 0 {
            return 0.0;
        }
        (self.bytes_transferred as f64 / self.file_size as f64).clamp(0.0, 1.0)
    }
}

// ============================================================================
// Ingest-rate feed
// ============================================================================

/// One time bucket of a strike's ingest rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FeedValue {
    pub time: Option<DateTime<Utc>>,
    pub files: i64,
    pub size: i64,
}

/// Ingest-rate feed for one strike: recent totals plus the bucketed
/// history the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StrikeFeed {
    pub strike: Strike,
    pub most_recent: Option<DateTime<Utc>>,
    pub files: i64,
    pub size: i64,
    pub values: Vec<FeedValue>,
}

impl StrikeFeed {
    /// Total files across all buckets.
    pub fn total_files(&self) -> i64 {
        self.values.iter().map(|value| value.files).sum()
    }

    /// Total bytes across all buckets.
    pub fn total_size(&self) -> i64 {
        self.values.iter().map(|value| value.size).sum()
    }
}
