//! Node domain models: cluster hosts and their execution status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::job::{JobCount, JobExecution, JobStatus};

/// A host registered with the cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Node {
    pub id: Option<i64>,
    pub hostname: String,
    pub port: i64,
    pub slave_id: String,
    pub pause_reason: String,
    pub is_paused: bool,
    /// Paused automatically because of a high failure rate.
    pub is_paused_errors: bool,
    pub is_active: bool,
    pub total_cpus: f64,
    pub total_mem: f64,
    pub total_disk: f64,
    pub archived: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// PATCH body for pausing or resuming a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdate {
    pub hostname: String,
    pub port: i64,
    pub pause_reason: String,
    pub is_paused: bool,
}

impl NodeUpdate {
    /// Build the pause/resume toggle body for a node, the way the
    /// dashboard's pause button does.
    pub fn toggle_pause(node: &Node, pause_reason: Option<String>) -> Self {
        Self {
            hostname: node.hostname.clone(),
            port: node.port,
            pause_reason: pause_reason.unwrap_or_default(),
            is_paused: !node.is_paused,
        }
    }
}

/// Derived display state of a node, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    Offline,
    HighFailure,
    Paused,
    Online,
}

impl NodeState {
    pub fn label(&self) -> &'static str {
        match self {
            NodeState::Offline => "Offline",
            NodeState::HighFailure => "High Failure Rate",
            NodeState::Paused => "Paused",
            NodeState::Online => "Online",
        }
    }
}

/// Execution rollup for one node over the status window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NodeStatus {
    pub node: Node,
    pub is_online: bool,
    pub job_exe_counts: Vec<JobCount>,
    pub job_exes_running: Vec<JobExecution>,
}

impl NodeStatus {
    /// Completed executions in the window.
    pub fn completed_count(&self) -> i64 {
        self.count_for(JobStatus::Completed)
    }

    /// Failed executions in the window.
    pub fn failed_count(&self) -> i64 {
        self.count_for(JobStatus::Failed)
    }

    fn count_for(&self, status: JobStatus) -> i64 {
        self.job_exe_counts
            .iter()
            .find(|count| count.status == status)
            .map(|count| count.count)
            .unwrap_or(0)
    }

    /// Failure percentage of finished executions in the window. Zero when
    /// nothing finished.
    pub fn failure_rate(&self) -> f64 {
        let completed = self.completed_count();
        let failed = self.failed_count();
        let total = completed + failed;
        if total == 0 {
            0.0
        } else {
            (failed as f64 / total as f64) * 100.0
        }
    }

    /// Display state: offline wins, then error-pause, then manual pause.
    pub fn state(&self) -> NodeState {
        if !self.is_online {
            NodeState::Offline
        } else if self.node.is_paused_errors {
            NodeState::HighFailure
        } else if self.node.is_paused {
            NodeState::Paused
        } else {
            NodeState::Online
        }
    }
}
