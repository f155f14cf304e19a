//! Cluster status models: master/scheduler health, resource usage,
//! queue depth, and system load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{QueueAlert, QueueThresholds};

// ============================================================================
// System status
// ============================================================================

/// The master node the scheduler registered with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MasterInfo {
    pub hostname: String,
    pub port: i64,
    pub is_online: bool,
}

/// The cluster scheduler process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SchedulerInfo {
    pub hostname: String,
    pub is_online: bool,
    pub is_paused: bool,
}

/// One cpu/mem/disk triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResourceSlice {
    pub cpus: f64,
    pub mem: f64,
    pub disk: f64,
}

/// Cluster-wide resources: capacity, what the scheduler has claimed,
/// and what running executions actually consume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResourceGauge {
    pub total: ResourceSlice,
    pub scheduled: ResourceSlice,
    pub used: ResourceSlice,
}

impl ResourceGauge {
    /// Percent of total cpus currently scheduled, 0 when capacity is unknown.
    pub fn cpus_scheduled_pct(&self) -> f64 {
        Self::pct(self.scheduled.cpus, self.total.cpus)
    }

    /// Percent of total memory currently scheduled.
    pub fn mem_scheduled_pct(&self) -> f64 {
        Self::pct(self.scheduled.mem, self.total.mem)
    }

    /// Percent of total disk currently scheduled.
    pub fn disk_scheduled_pct(&self) -> f64 {
        Self::pct(self.scheduled.disk, self.total.disk)
    }

    fn pct(part: f64, total: f64) -> f64 {
        if total <= 0.0 {
            0.0
        } else {
            part / total * 100.0
        }
    }
}

/// Snapshot of overall cluster health.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SystemStatus {
    pub master: MasterInfo,
    pub scheduler: SchedulerInfo,
    pub queue_depth: i64,
    pub resources: ResourceGauge,
}

impl SystemStatus {
    /// Both the master and scheduler are reachable.
    pub fn is_healthy(&self) -> bool {
        self.master.is_online && self.scheduler.is_online
    }
}

/// Patch body for pausing or resuming the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SchedulerUpdate {
    pub is_paused: bool,
}

/// Cluster API version report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VersionInfo {
    pub version: String,
}

// ============================================================================
// Queue status
// ============================================================================

/// Queue backlog for one job type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QueueStatus {
    pub job_type_name: String,
    pub job_type_version: String,
    pub count: i64,
    pub longest_queued: Option<DateTime<Utc>>,
    pub highest_priority: i64,
    pub is_paused: bool,
}

impl QueueStatus {
    /// "name version" label for display and grouping.
    pub fn key(&self) -> String {
        format!("{} {}", self.job_type_name, self.job_type_version)
    }

    /// Alert level for this backlog under the configured cut points.
    pub fn depth_alert(&self, thresholds: &QueueThresholds) -> QueueAlert {
        thresholds.classify(self.count)
    }
}

/// Envelope the queue status endpoint wraps its rows in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QueueStatusReport {
    pub queue_status: Vec<QueueStatus>,
}

impl QueueStatusReport {
    /// Total queued count across all job types.
    pub fn total_count(&self) -> i64 {
        self.queue_status.iter().map(|row| row.count).sum()
    }

    /// Rows ordered by backlog depth, deepest first.
    pub fn deepest_first(&self) -> Vec<&QueueStatus> {
        let mut rows: Vec<&QueueStatus> = self.queue_status.iter().collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows
    }
}

// ============================================================================
// Job load
// ============================================================================

/// One time bucket of pending/queued/running counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobLoad {
    pub time: Option<DateTime<Utc>>,
    pub pending_count: i64,
    pub queued_count: i64,
    pub running_count: i64,
}

impl JobLoad {
    /// Jobs in flight across all three phases.
    pub fn total(&self) -> i64 {
        self.pending_count + self.queued_count + self.running_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform;
    use serde_json::json;

    #[test]
    fn test_system_status_build() {
        let status: SystemStatus = transform::build(Some(json!({
            "master": {"hostname": "master.cluster", "port": 5050, "is_online": true},
            "scheduler": {"hostname": "sched.cluster", "is_online": true, "is_paused": false},
            "queue_depth": 1195,
            "resources": {
                "total": {"cpus": 256.0, "mem": 131072.0, "disk": 4194304.0},
                "scheduled": {"cpus": 192.0, "mem": 98304.0, "disk": 1048576.0},
                "used": {"cpus": 180.5, "mem": 91022.0, "disk": 997888.0}
            }
        })));

        assert!(status.is_healthy());
        assert_eq!(status.queue_depth, 1195);
        assert_eq!(status.resources.cpus_scheduled_pct(), 75.0);
        assert_eq!(status.resources.mem_scheduled_pct(), 75.0);
        assert_eq!(status.resources.disk_scheduled_pct(), 25.0);
    }

    #[test]
    fn test_system_status_unhealthy_when_offline() {
        let status: SystemStatus = transform::build(Some(json!({
            "master": {"hostname": "master.cluster", "port": 5050, "is_online": true},
            "scheduler": {"hostname": "sched.cluster", "is_online": false}
        })));
        assert!(!status.is_healthy());
    }

    #[test]
    fn test_resource_pct_zero_capacity() {
        let gauge = ResourceGauge::default();
        assert_eq!(gauge.cpus_scheduled_pct(), 0.0);
        assert_eq!(gauge.mem_scheduled_pct(), 0.0);
        assert_eq!(gauge.disk_scheduled_pct(), 0.0);
    }

    #[test]
    fn test_queue_status_report_envelope() {
        let report: QueueStatusReport = transform::build(Some(json!({
            "queue_status": [
                {"job_type_name": "landsat-parse", "job_type_version": "1.0.0",
                 "count": 19, "longest_queued": "2015-09-08T15:24:53.503Z",
                 "highest_priority": 1, "is_paused": false},
                {"job_type_name": "scale-clock", "job_type_version": "1.0",
                 "count": 7, "longest_queued": "2015-09-08T16:00:00.000Z",
                 "highest_priority": 100, "is_paused": true}
            ]
        })));

        assert_eq!(report.queue_status.len(), 2);
        assert_eq!(report.total_count(), 26);
        assert_eq!(report.queue_status[0].key(), "landsat-parse 1.0.0");
        assert!(report.queue_status[1].is_paused);
    }

    #[test]
    fn test_queue_depth_alert() {
        let thresholds = QueueThresholds::default();
        let mut row = QueueStatus {
            count: 2,
            ..QueueStatus::default()
        };
        assert_eq!(row.depth_alert(&thresholds), QueueAlert::Success);
        row.count = 10;
        assert_eq!(row.depth_alert(&thresholds), QueueAlert::Warning);
        row.count = 50;
        assert_eq!(row.depth_alert(&thresholds), QueueAlert::Danger);
    }

    #[test]
    fn test_queue_status_deepest_first() {
        let report: QueueStatusReport = transform::build(Some(json!({
            "queue_status": [
                {"job_type_name": "small", "count": 3},
                {"job_type_name": "big", "count": 42},
                {"job_type_name": "mid", "count": 11}
            ]
        })));

        let names: Vec<&str> = report
            .deepest_first()
            .iter()
            .map(|row| row.job_type_name.as_str())
            .collect();
        assert_eq!(names, vec!["big", "mid", "small"]);
    }

    #[test]
    fn test_job_load_total() {
        let load: JobLoad = transform::build(Some(json!({
            "time": "2015-10-21T00:00:00.000Z",
            "pending_count": 1,
            "queued_count": 2,
            "running_count": 3
        })));
        assert_eq!(load.total(), 6);
    }
}
