//! Job domain models: job types, jobs, executions, and status rollups.
//!
//! Field sets mirror the cluster REST API. Every struct takes
//! `#[serde(default)]` so normalization can degrade absent or null fields
//! to zero values instead of failing the whole payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::node::Node;

// ============================================================================
// Job status
// ============================================================================

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Blocked,
    Queued,
    Running,
    Failed,
    Completed,
    Canceled,
    /// Catch-all for statuses this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// The wire form of the status, usable as a query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Blocked => "BLOCKED",
            JobStatus::Queued => "QUEUED",
            JobStatus::Running => "RUNNING",
            JobStatus::Failed => "FAILED",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Canceled => "CANCELED",
            JobStatus::Unknown => "UNKNOWN",
        }
    }

    /// Whether the job has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::Completed | JobStatus::Canceled
        )
    }

    /// Whether the job is queued or executing.
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }
}

// ============================================================================
// Job type
// ============================================================================

/// A registered job type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobType {
    pub id: Option<i64>,
    pub name: String,
    pub version: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub author_name: String,
    pub author_url: String,
    pub is_system: bool,
    pub is_long_running: bool,
    pub is_active: bool,
    pub is_operational: bool,
    pub is_paused: bool,
    pub icon_code: String,
    pub uses_docker: bool,
    pub docker_image: String,
    pub revision_num: i64,
    pub priority: i64,
    pub max_scheduled: Option<i64>,
    pub max_tries: i64,
    pub created: Option<DateTime<Utc>>,
    pub archived: Option<DateTime<Utc>>,
    pub paused: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl JobType {
    /// `name` and `version` together identify a job type.
    pub fn key(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}

// ============================================================================
// Errors and trigger events
// ============================================================================

/// A registered error definition attached to failed jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobError {
    pub id: Option<i64>,
    pub name: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// The trigger event that created a job or recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobEvent {
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub rule: Option<i64>,
    pub occurred: Option<DateTime<Utc>>,
}

// ============================================================================
// Job
// ============================================================================

/// One job as listed by the jobs grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Job {
    pub id: Option<i64>,
    pub job_type: JobType,
    pub job_type_rev: i64,
    pub event: JobEvent,
    pub error: Option<JobError>,
    pub status: JobStatus,
    pub priority: i64,
    pub num_exes: i64,
    pub timeout: i64,
    pub max_tries: i64,
    pub cpus_required: f64,
    pub mem_required: f64,
    pub disk_in_required: f64,
    pub disk_out_required: f64,
    pub created: Option<DateTime<Utc>>,
    pub queued: Option<DateTime<Utc>>,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
    pub last_status_change: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl Job {
    /// Wall-clock duration from start to end, when both are known.
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started, self.ended) {
            (Some(started), Some(ended)) => Some(ended - started),
            _ => None,
        }
    }
}

/// PATCH body for editing a job's status (cancel, for instance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobUpdate {
    pub status: JobStatus,
}

// ============================================================================
// Job execution
// ============================================================================

/// One execution attempt of a job on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobExecution {
    pub id: Option<i64>,
    pub status: JobStatus,
    pub command_arguments: String,
    pub timeout: i64,
    pub exit_code: Option<i64>,
    pub node: Node,
    pub error: Option<JobError>,
    pub job: Job,
    pub cpus_scheduled: f64,
    pub mem_scheduled: f64,
    pub disk_in_scheduled: f64,
    pub disk_out_scheduled: f64,
    pub disk_total_scheduled: f64,
    pub queued: Option<DateTime<Utc>>,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

// ============================================================================
// Job data and details
// ============================================================================

/// One named input or output slot of a job interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobDataEntry {
    pub name: String,
    pub value: Option<String>,
    pub file_id: Option<i64>,
    pub file_ids: Vec<i64>,
    pub workspace_id: Option<i64>,
}

/// The data block of a job or recipe: interface version plus the bound
/// inputs and outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobData {
    pub version: String,
    pub input_data: Vec<JobDataEntry>,
    pub output_data: Vec<JobDataEntry>,
}

/// A produced file registered from a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Product {
    pub id: Option<i64>,
    pub workspace: super::ingest::Workspace,
    pub file_name: String,
    pub media_type: String,
    pub file_size: i64,
    pub data_type: Vec<String>,
    pub is_operational: bool,
    pub is_published: bool,
    pub published: Option<DateTime<Utc>>,
    pub unpublished: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    pub url: String,
}

/// Full job record from the job details endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobDetails {
    pub id: Option<i64>,
    pub job_type: JobType,
    pub event: JobEvent,
    pub error: Option<JobError>,
    pub status: JobStatus,
    pub priority: i64,
    pub num_exes: i64,
    pub timeout: i64,
    pub max_tries: i64,
    pub cpus_required: f64,
    pub mem_required: f64,
    pub disk_in_required: f64,
    pub disk_out_required: f64,
    pub data: JobData,
    pub results: JobData,
    pub recipes: Vec<super::recipe::Recipe>,
    pub job_exes: Vec<JobExecution>,
    pub products: Vec<Product>,
    pub created: Option<DateTime<Utc>>,
    pub queued: Option<DateTime<Utc>>,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
    pub last_status_change: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl JobDetails {
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started, self.ended) {
            (Some(started), Some(ended)) => Some(ended - started),
            _ => None,
        }
    }

    /// Latest execution attempt, if any ran.
    pub fn latest_execution(&self) -> Option<&JobExecution> {
        self.job_exes.first()
    }
}

// ============================================================================
// Status rollups
// ============================================================================

/// One status/count row of a job type or node rollup. Failed rows carry
/// the error category (SYSTEM, DATA, ALGORITHM).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobCount {
    pub status: JobStatus,
    pub count: i64,
    pub most_recent: Option<DateTime<Utc>>,
    pub category: String,
}

/// Health bucket derived from a job type's recent success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    Success,
    Warning,
    Error,
    Inactive,
}

/// Success/failure breakdown computed from a status rollup window.
#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    /// Success percentage over the window, 0 when nothing ran.
    pub rate: f64,
    pub level: PerformanceLevel,
    pub failed: i64,
    /// Error category with the most failures, empty when none failed.
    pub failed_category: String,
    pub completed: i64,
    pub total: i64,
}

/// Recent per-status counts for one job type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobTypeStatus {
    pub job_type: JobType,
    pub job_counts: Vec<JobCount>,
}

impl JobTypeStatus {
    /// Whether any executions are currently running.
    pub fn has_running(&self) -> bool {
        self.job_counts
            .iter()
            .any(|count| count.status == JobStatus::Running)
    }

    /// Number of running executions.
    pub fn running_count(&self) -> i64 {
        self.job_counts
            .iter()
            .filter(|count| count.status == JobStatus::Running)
            .map(|count| count.count)
            .sum()
    }

    /// Success/failure breakdown over the rollup window.
    ///
    /// Success rate compares completions against the sum of failures; a
    /// rate at or below 30% flags an error, at or below 60% a warning,
    /// and a window with no finished work and nothing running is
    /// inactive.
    pub fn performance(&self) -> Performance {
        let mut failed_rows: Vec<&JobCount> = self
            .job_counts
            .iter()
            .filter(|count| count.status == JobStatus::Failed)
            .collect();
        failed_rows.sort_by(|a, b| b.count.cmp(&a.count));

        let completed = self
            .job_counts
            .iter()
            .find(|count| count.status == JobStatus::Completed)
            .map(|count| count.count)
            .unwrap_or(0);
        let failed: i64 = failed_rows.iter().map(|count| count.count).sum();
        let failed_category = failed_rows
            .first()
            .map(|count| count.category.clone())
            .unwrap_or_default();
        let total = if failed_rows.is_empty() {
            completed
        } else {
            failed + completed
        };

        let rate = if total == 0 {
            0.0
        } else {
            100.0 - (failed as f64 / total as f64) * 100.0
        };

        let level = if total > 0 && rate <= 30.0 {
            PerformanceLevel::Error
        } else if total > 0 && rate <= 60.0 {
            PerformanceLevel::Warning
        } else if total == 0 && !self.has_running() {
            PerformanceLevel::Inactive
        } else {
            PerformanceLevel::Success
        };

        Performance {
            rate,
            level,
            failed,
            failed_category,
            completed,
            total,
        }
    }

    /// Failure percentage over the window, for worst-first overview
    /// sorting. Zero when nothing finished.
    pub fn failure_rate(&self) -> f64 {
        let perf = self.performance();
        if perf.total == 0 {
            0.0
        } else {
            (perf.failed as f64 / perf.total as f64) * 100.0
        }
    }

    /// Failure counts keyed by error category, largest first.
    pub fn failure_counts(&self) -> Vec<(String, i64)> {
        let mut counts: Vec<(String, i64)> = self
            .job_counts
            .iter()
            .filter(|count| count.status == JobStatus::Failed)
            .map(|count| (count.category.clone(), count.count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

/// A job type with currently running executions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RunningJobGroup {
    pub job_type: JobType,
    pub count: i64,
    pub longest_running: Option<DateTime<Utc>>,
}
