//! Queue backlog and load history queries.

use std::sync::Arc;

use crate::config::{DeckConfig, PollIntervals};
use crate::models::{JobLoad, QueueStatusReport, ResultPage};
use crate::poll::{PollPolicy, PollerFactory};
use crate::resource::{JobLoadParams, ResourceDescriptor};
use crate::traits::FetchError;
use crate::transform;

use super::ServiceSubscription;

/// Queries over `queue/status/` and `load/`.
#[derive(Clone)]
pub struct LoadService {
    factory: PollerFactory,
    config: Arc<DeckConfig>,
    policy: PollPolicy,
}

impl LoadService {
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

    fn queue_status_resource(&self) -> ResourceDescriptor {
        ResourceDescriptor::new(self.config.url("queue/status/"))
    }

    /// Poll the per-type queue backlog.
    pub fn queue_status(&self) -> ServiceSubscription<QueueStatusReport> {
        let sub = self.factory.poll_with_policy(
            &self.queue_status_resource(),
            PollIntervals::duration(self.config.poll_intervals.queue_status),
            self.policy,
        );
        ServiceSubscription::new(sub, |value| transform::build(Some(value)))
    }

    /// Fetch the per-type queue backlog once.
    pub async fn queue_status_once(&self) -> Result<QueueStatusReport, FetchError> {
        let value = self.factory.fetch_once(&self.queue_status_resource()).await?;
        Ok(transform::build(Some(value)))
    }

    fn job_load_resource(&self, params: &JobLoadParams) -> ResourceDescriptor {
        ResourceDescriptor::new(self.config.url("load/")).with_params(params.to_query())
    }

    /// Poll the pending/queued/running load history.
    pub fn job_load(&self, params: &JobLoadParams) -> ServiceSubscription<ResultPage<JobLoad>> {
        let sub = self.factory.poll_with_policy(
            &self.job_load_resource(params),
            PollIntervals::duration(self.config.poll_intervals.job_load),
            self.policy,
        );
        ServiceSubscription::new(sub, |value| ResultPage::from_value(Some(value)))
    }

    /// Fetch the load history once.
    pub async fn job_load_once(
        &self,
        params: &JobLoadParams,
    ) -> Result<ResultPage<JobLoad>, FetchError> {
        let value = self.factory.fetch_once(&self.job_load_resource(params)).await?;
        Ok(ResultPage::from_value(Some(value)))
    }
}
