//! System status and scheduler control.

use std::sync::Arc;

use crate::config::{DeckConfig, PollIntervals};
use crate::models::{SchedulerUpdate, SystemStatus, VersionInfo};
use crate::poll::{PollPolicy, PollerFactory};
use crate::resource::ResourceDescriptor;
use crate::traits::FetchError;
use crate::transform;

use super::{patch_value, ServiceSubscription};

/// Queries over `status/`, `scheduler/`, and `version/`.
#[derive(Clone)]
pub struct StatusService {
    factory: PollerFactory,
    config: Arc<DeckConfig>,
    policy: PollPolicy,
}

impl StatusService {
    pub fn new(factory: PollerFactory, config: Arc<DeckConfig>) -> Self {
        Self {
            factory,
            config,
            policy: PollPolicy::StopOnError,
        }
    }

    /// Use `policy` for the polls this service starts.
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn status_resource(&self) -> ResourceDescriptor {
        ResourceDescriptor::new(self.config.url("status/"))
    }

    /// Poll overall cluster health.
    pub fn status(&self) -> ServiceSubscription<SystemStatus> {
        let sub = self.factory.poll_with_policy(
            &self.status_resource(),
            PollIntervals::duration(self.config.poll_intervals.status),
            self.policy,
        );
        ServiceSubscription::new(sub, |value| transform::build(Some(value)))
    }

    /// Fetch overall cluster health once.
    pub async fn status_once(&self) -> Result<SystemStatus, FetchError> {
        let value = self.factory.fetch_once(&self.status_resource()).await?;
        Ok(transform::build(Some(value)))
    }

    /// PATCH the scheduler (pause or resume).
    pub async fn update_scheduler_once(
        &self,
        update: &SchedulerUpdate,
    ) -> Result<SystemStatus, FetchError> {
        let url = self.config.url("scheduler/");
        let value = patch_value(self.factory.fetcher().as_ref(), &url, update).await?;
        Ok(transform::build(Some(value)))
    }

    /// Fetch the cluster API version report.
    pub async fn version_once(&self) -> Result<VersionInfo, FetchError> {
        let resource = ResourceDescriptor::new(self.config.url("version/"));
        let value = self.factory.fetch_once(&resource).await?;
        Ok(transform::build(Some(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockFetcher, MockResponse};
    use crate::poll::PollPolicy;
    use crate::traits::FetchResponse;
    use bytes::Bytes;
    use serde_json::json;

    fn service_with_mock() -> (StatusService, MockFetcher) {
        let mock = MockFetcher::new();
        let factory = PollerFactory::new(Arc::new(mock.clone()));
        let config = Arc::new(DeckConfig::default().with_api_root("http://smelter/api"));
        (StatusService::new(factory, config), mock)
    }

    fn ok(body: serde_json::Value) -> MockResponse {
        MockResponse::Success(FetchResponse::new(200, Bytes::from(body.to_string())))
    }

    #[tokio::test]
    async fn test_status_once_decodes_health() {
        let (service, mock) = service_with_mock();
        mock.set_response(
            "http://smelter/api/v4/status/",
            ok(json!({
                "master": {"hostname": "master01", "port": 5050, "is_online": true},
                "scheduler": {"hostname": "sched01", "is_online": true, "is_paused": false},
                "queue_depth": 12
            })),
        );

        let status = service.status_once().await.unwrap();
        assert!(status.is_healthy());
        assert_eq!(status.queue_depth, 12);
    }

    #[tokio::test]
    async fn test_update_scheduler_once_patches_pause() {
        let (service, mock) = service_with_mock();
        mock.set_response(
            "http://smelter/api/v4/scheduler/",
            ok(json!({
                "master": {"is_online": true},
                "scheduler": {"is_online": true, "is_paused": true}
            })),
        );

        let status = service
            .update_scheduler_once(&SchedulerUpdate { is_paused: true })
            .await
            .unwrap();
        assert!(status.scheduler.is_paused);

        let requests = mock.get_requests();
        assert_eq!(requests[0].method, "PATCH");
        assert_eq!(requests[0].url, "http://smelter/api/v4/scheduler/");
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"is_paused":true}"#));
    }

    #[tokio::test]
    async fn test_version_once() {
        let (service, mock) = service_with_mock();
        mock.set_response(
            "http://smelter/api/v4/version/",
            ok(json!({"version": "4.2.1"})),
        );

        let info = service.version_once().await.unwrap();
        assert_eq!(info.version, "4.2.1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_poll_degrades_without_stopping() {
        let (service, mock) = service_with_mock();
        mock.set_default_response(MockResponse::Success(FetchResponse::new(
            503,
            Bytes::from("scheduler unavailable"),
        )));

        let mut sub = service
            .with_policy(PollPolicy::ContinueOnError)
            .status();

        let tick = sub.next_tick().await.unwrap();
        assert!(tick.is_degraded());
        assert!(!sub.is_stopped());
        sub.stop();
    }
}
