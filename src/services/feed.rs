//! Ingest feed queries: ingest records, per-strike rates, strike processes.

use std::sync::Arc;

use crate::config::{DeckConfig, PollIntervals};
use crate::models::{Ingest, ResultPage, Strike, StrikeFeed};
use crate::poll::{PollPolicy, PollerFactory};
use crate::resource::{FeedParams, IngestsParams, ResourceDescriptor};
use crate::traits::FetchError;
use crate::transform;

use super::ServiceSubscription;

/// Queries over `ingests/`, `ingests/status/`, and `strikes/`.
#[derive(Clone)]
pub struct FeedService {
    factory: PollerFactory,
    config: Arc<DeckConfig>,
    policy: PollPolicy,
}

impl FeedService {
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

    fn ingests_resource(&self, params: &IngestsParams) -> ResourceDescriptor {
        ResourceDescriptor::new(self.config.url("ingests/")).with_params(params.to_query())
    }

    /// Poll the ingest records grid.
    pub fn ingests(&self, params: &IngestsParams) -> ServiceSubscription<ResultPage<Ingest>> {
        let sub = self.factory.poll_with_policy(
            &self.ingests_resource(params),
            PollIntervals::duration(self.config.poll_intervals.ingests),
            self.policy,
        );
        ServiceSubscription::new(sub, |value| ResultPage::from_value(Some(value)))
    }

    /// Fetch one page of ingest records.
    pub async fn ingests_once(
        &self,
        params: &IngestsParams,
    ) -> Result<ResultPage<Ingest>, FetchError> {
        let value = self.factory.fetch_once(&self.ingests_resource(params)).await?;
        Ok(ResultPage::from_value(Some(value)))
    }

    /// Fetch the per-strike ingest-rate feed.
    pub async fn feed_once(&self, params: &FeedParams) -> Result<ResultPage<StrikeFeed>, FetchError> {
        let resource =
            ResourceDescriptor::new(self.config.url("ingests/status/")).with_params(params.to_query());
        let value = self.factory.fetch_once(&resource).await?;
        Ok(ResultPage::from_value(Some(value)))
    }

    /// Fetch the strike process roster.
    pub async fn strikes_once(&self) -> Result<ResultPage<Strike>, FetchError> {
        let resource = ResourceDescriptor::new(self.config.url("strikes/"));
        let value = self.factory.fetch_once(&resource).await?;
        Ok(ResultPage::from_value(Some(value)))
    }

    /// Fetch one strike process with its configuration.
    pub async fn strike_details_once(&self, id: i64) -> Result<Strike, FetchError> {
        let resource = ResourceDescriptor::new(self.config.url(&format!("strikes/{}/", id)));
        let value = self.factory.fetch_once(&resource).await?;
        Ok(transform::build(Some(value)))
    }
}
