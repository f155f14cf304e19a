//! Poller construction bound to a shared [`ResourceFetcher`].
//!
//! Services describe WHAT to watch as a [`ResourceDescriptor`]; the
//! factory supplies the HOW: fetch the resource over the injected
//! fetcher, classify the status, decode the body, repeat on schedule.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::poller::{self, PollPolicy, PollSubscription};
use crate::resource::ResourceDescriptor;
use crate::traits::{FetchError, Headers, ResourceFetcher};

/// One-shot GET of a resource, decoded the same way poller ticks are.
pub async fn fetch_value(
    fetcher: &dyn ResourceFetcher,
    resource: &ResourceDescriptor,
) -> Result<Value, FetchError> {
    let response = fetcher.get(&resource.uri(), &Headers::new()).await?;
    response.into_value()
}

/// Builds pollers around a shared fetcher.
#[derive(Clone)]
pub struct PollerFactory {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl PollerFactory {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }

    /// The fetcher this factory binds into its pollers.
    pub fn fetcher(&self) -> Arc<dyn ResourceFetcher> {
        self.fetcher.clone()
    }

    /// Start polling `resource` every `interval`, stopping on the first
    /// failed attempt.
    pub fn poll(&self, resource: &ResourceDescriptor, interval: Duration) -> PollSubscription {
        self.poll_with_policy(resource, interval, PollPolicy::StopOnError)
    }

    /// Start polling `resource` with an explicit error policy.
    pub fn poll_with_policy(
        &self,
        resource: &ResourceDescriptor,
        interval: Duration,
        policy: PollPolicy,
    ) -> PollSubscription {
        let fetcher = self.fetcher.clone();
        let url = resource.uri();
        tracing::debug!(url = %url, interval_ms = interval.as_millis() as u64, "starting poller");
        poller::start(
            move || {
                let fetcher = fetcher.clone();
                let url = url.clone();
                async move {
                    let response = fetcher.get(&url, &Headers::new()).await?;
                    response.into_value()
                }
            },
            interval,
            policy,
        )
    }

    /// Fetch `resource` once without starting a schedule.
    pub async fn fetch_once(&self, resource: &ResourceDescriptor) -> Result<Value, FetchError> {
        fetch_value(self.fetcher.as_ref(), resource).await
    }
}
