//! Runtime configuration.
//!
//! Defaults cover a local cluster gateway; deployments override them with a
//! JSON config file (fields merge over the defaults) and the
//! `SMELTERDECK_API` environment variable for the API root.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::state::NavLocation;

/// Environment variable overriding the configured API root.
pub const API_ROOT_ENV: &str = "SMELTERDECK_API";

const DEFAULT_API_ROOT: &str = "http://127.0.0.1:8000/api";
const DEFAULT_API_VERSION: &str = "v4";

/// Default poll interval for every resource, in milliseconds.
const DEFAULT_POLL_INTERVAL_MS: u64 = 300_000;

// ============================================================================
// Poll intervals
// ============================================================================

/// Per-resource poll intervals, in milliseconds.
///
/// Every polled endpoint gets its own entry so a deployment can tune the
/// chatty ones (status, queue) independently of the slow movers (job types).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollIntervals {
    pub jobs: u64,
    pub job_type_status: u64,
    pub running_jobs: u64,
    pub recipes: u64,
    pub ingests: u64,
    pub nodes: u64,
    pub node_status: u64,
    pub queue_status: u64,
    pub job_load: u64,
    pub status: u64,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            jobs: DEFAULT_POLL_INTERVAL_MS,
            job_type_status: DEFAULT_POLL_INTERVAL_MS,
            running_jobs: DEFAULT_POLL_INTERVAL_MS,
            recipes: DEFAULT_POLL_INTERVAL_MS,
            ingests: DEFAULT_POLL_INTERVAL_MS,
            nodes: DEFAULT_POLL_INTERVAL_MS,
            node_status: DEFAULT_POLL_INTERVAL_MS,
            queue_status: DEFAULT_POLL_INTERVAL_MS,
            job_load: DEFAULT_POLL_INTERVAL_MS,
            status: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl PollIntervals {
    /// Converts a stored interval to a [`Duration`].
    pub fn duration(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }
}

// ============================================================================
// Queue thresholds
// ============================================================================

/// Alert level for a queue depth reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum QueueAlert {
    Success,
    Info,
    Warning,
    Danger,
}

impl QueueAlert {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueAlert::Success => "success",
            QueueAlert::Info => "info",
            QueueAlert::Warning => "warning",
            QueueAlert::Danger => "danger",
        }
    }
}

/// Queue depth cut points for alert levels.
///
/// A depth at or below `success` is healthy; each higher band escalates, and
/// anything past `warning` is flagged `danger`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueThresholds {
    pub success: i64,
    pub info: i64,
    pub warning: i64,
    pub danger: i64,
}

impl Default for QueueThresholds {
    fn default() -> Self {
        Self {
            success: 4,
            info: 8,
            warning: 12,
            danger: 16,
        }
    }
}

impl QueueThresholds {
    /// Classifies a queue depth against the configured cut points.
    pub fn classify(&self, depth: i64) -> QueueAlert {
        if depth <= self.success {
            QueueAlert::Success
        } else if depth <= self.info {
            QueueAlert::Info
        } else if depth <= self.warning {
            QueueAlert::Warning
        } else {
            QueueAlert::Danger
        }
    }
}

// ============================================================================
// Subnavigation
// ============================================================================

/// One link in a section's subnavigation strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnavLink {
    pub path: &'static str,
    pub label: &'static str,
}

impl SubnavLink {
    const fn new(path: &'static str, label: &'static str) -> Self {
        Self { path, label }
    }
}

static SUBNAV_LINKS: Lazy<HashMap<NavLocation, Vec<SubnavLink>>> = Lazy::new(|| {
    let mut links = HashMap::new();
    links.insert(
        NavLocation::Jobs,
        vec![
            SubnavLink::new("jobs", "Jobs"),
            SubnavLink::new("jobs/types", "Job Types"),
        ],
    );
    links.insert(
        NavLocation::Recipes,
        vec![
            SubnavLink::new("recipes", "Recipes"),
            SubnavLink::new("recipes/types", "Recipe Types"),
        ],
    );
    links.insert(
        NavLocation::Feed,
        vec![
            SubnavLink::new("feed", "Status"),
            SubnavLink::new("feed/ingests", "Ingest Records"),
        ],
    );
    links.insert(
        NavLocation::Queue,
        vec![
            SubnavLink::new("queue", "Queued"),
            SubnavLink::new("queue/running", "Running"),
            SubnavLink::new("queue/depth", "Job Load"),
        ],
    );
    links
});

// ============================================================================
// DeckConfig
// ============================================================================

/// Top-level runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Root URL of the cluster API gateway, without the version segment.
    pub api_root: String,
    /// API version segment appended after the root.
    pub api_version: String,
    /// Per-resource poll intervals in milliseconds.
    pub poll_intervals: PollIntervals,
    /// Queue depth alert cut points.
    pub queue_thresholds: QueueThresholds,
    /// Directory for durable local state. `None` uses `~/.smelterdeck`.
    pub storage_dir: Option<PathBuf>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            poll_intervals: PollIntervals::default(),
            queue_thresholds: QueueThresholds::default(),
            storage_dir: None,
        }
    }
}

impl DeckConfig {
    /// Builds a configuration from the defaults and environment overrides.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Loads configuration: optional JSON file merged over the defaults,
    /// then environment overrides on top.
    ///
    /// A missing or unparseable file logs a warning and falls back to the
    /// defaults rather than failing startup.
    pub fn load(path: Option<&Path>) -> Self {
        let config = match path {
            Some(path) => Self::from_file(path).unwrap_or_default(),
            None => Self::default(),
        };
        config.with_env_overrides()
    }

    fn from_file(path: &Path) -> Option<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read config file");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to parse config file");
                None
            }
        }
    }

    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_storage_dir(mut self, storage_dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(storage_dir.into());
        self
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(api_root) = std::env::var(API_ROOT_ENV) {
            if !api_root.trim().is_empty() {
                self.api_root = api_root;
            }
        }
        self
    }

    /// Builds a full resource URL from the root, version segment, and path.
    ///
    /// The cluster API requires the trailing slash on resource paths, so the
    /// path is joined verbatim.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.api_root.trim_end_matches('/'),
            self.api_version.trim_matches('/'),
            path.trim_start_matches('/'),
        )
    }

    /// Subnavigation links for a section. Sections without a strip return
    /// an empty slice.
    pub fn subnav_links(&self, section: NavLocation) -> &'static [SubnavLink] {
        SUBNAV_LINKS
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var(API_ROOT_ENV);
    }

    #[test]
    #[serial]
    fn test_default_values() {
        clear_env();
        let config = DeckConfig::default();
        assert_eq!(config.api_root, "http://127.0.0.1:8000/api");
        assert_eq!(config.api_version, "v4");
        assert_eq!(config.poll_intervals.jobs, 300_000);
        assert_eq!(config.poll_intervals.queue_status, 300_000);
        assert_eq!(config.queue_thresholds.success, 4);
        assert_eq!(config.queue_thresholds.danger, 16);
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn test_url_joins_root_version_and_path() {
        let config = DeckConfig::default().with_api_root("http://cluster:9000/api/");
        assert_eq!(config.url("jobs/"), "http://cluster:9000/api/v4/jobs/");
        assert_eq!(
            config.url("nodes/status/"),
            "http://cluster:9000/api/v4/nodes/status/"
        );
    }

    #[test]
    fn test_url_strips_leading_slash_from_path() {
        let config = DeckConfig::default();
        assert_eq!(config.url("/status/"), "http://127.0.0.1:8000/api/v4/status/");
    }

    #[test]
    fn test_builders() {
        let config = DeckConfig::default()
            .with_api_root("http://smelter/api")
            .with_api_version("v5")
            .with_storage_dir("/tmp/deck");
        assert_eq!(config.api_root, "http://smelter/api");
        assert_eq!(config.api_version, "v5");
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/deck")));
    }

    #[test]
    fn test_classify_queue_depth() {
        let thresholds = QueueThresholds::default();
        assert_eq!(thresholds.classify(0), QueueAlert::Success);
        assert_eq!(thresholds.classify(4), QueueAlert::Success);
        assert_eq!(thresholds.classify(5), QueueAlert::Info);
        assert_eq!(thresholds.classify(8), QueueAlert::Info);
        assert_eq!(thresholds.classify(12), QueueAlert::Warning);
        assert_eq!(thresholds.classify(13), QueueAlert::Danger);
        assert_eq!(thresholds.classify(5_000), QueueAlert::Danger);
    }

    #[test]
    fn test_alert_labels() {
        assert_eq!(QueueAlert::Success.as_str(), "success");
        assert_eq!(QueueAlert::Danger.as_str(), "danger");
    }

    #[test]
    fn test_subnav_links_per_section() {
        let config = DeckConfig::default();
        let jobs = config.subnav_links(NavLocation::Jobs);
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].path, "jobs");
        assert_eq!(jobs[0].label, "Jobs");
        assert_eq!(jobs[1].path, "jobs/types");

        let queue = config.subnav_links(NavLocation::Queue);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue[2].label, "Job Load");

        assert!(config.subnav_links(NavLocation::Overview).is_empty());
        assert!(config.subnav_links(NavLocation::Nodes).is_empty());
    }

    #[test]
    #[serial]
    fn test_load_merges_partial_file_over_defaults() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"api_root": "http://cluster:9000/api", "poll_intervals": {{"jobs": 1000}}}}"#
        )
        .unwrap();

        let config = DeckConfig::load(Some(file.path()));
        assert_eq!(config.api_root, "http://cluster:9000/api");
        assert_eq!(config.poll_intervals.jobs, 1000);
        // Untouched fields keep their defaults.
        assert_eq!(config.poll_intervals.nodes, 300_000);
        assert_eq!(config.api_version, "v4");
        assert_eq!(config.queue_thresholds.warning, 12);
    }

    #[test]
    #[serial]
    fn test_load_unparseable_file_falls_back_to_defaults() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();

        let config = DeckConfig::load(Some(file.path()));
        assert_eq!(config, DeckConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_missing_file_falls_back_to_defaults() {
        clear_env();
        let config = DeckConfig::load(Some(Path::new("/nonexistent/deck.json")));
        assert_eq!(config, DeckConfig::default());
    }

    #[test]
    #[serial]
    fn test_env_var_overrides_api_root() {
        std::env::set_var(API_ROOT_ENV, "http://override:8080/api");
        let config = DeckConfig::load(None);
        assert_eq!(config.api_root, "http://override:8080/api");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_var_overrides_file_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api_root": "http://from-file/api"}}"#).unwrap();

        std::env::set_var(API_ROOT_ENV, "http://from-env/api");
        let config = DeckConfig::load(Some(file.path()));
        assert_eq!(config.api_root, "http://from-env/api");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_env_var_is_ignored() {
        std::env::set_var(API_ROOT_ENV, "  ");
        let config = DeckConfig::from_env();
        assert_eq!(config.api_root, "http://127.0.0.1:8000/api");
        clear_env();
    }
}
