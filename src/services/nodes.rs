//! Node roster and per-node health queries.

use std::sync::Arc;

use crate::config::{DeckConfig, PollIntervals};
use crate::models::{Node, NodeStatus, NodeUpdate, ResultPage};
use crate::poll::{PollPolicy, PollerFactory};
use crate::resource::ResourceDescriptor;
use crate::traits::FetchError;
use crate::transform;

use super::{patch_value, ServiceSubscription};

/// Queries over `nodes/` and `nodes/status/`.
#[derive(Clone)]
pub struct NodesService {
    factory: PollerFactory,
    config: Arc<DeckConfig>,
    policy: PollPolicy,
}

impl NodesService {
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

    fn nodes_resource(&self) -> ResourceDescriptor {
        ResourceDescriptor::new(self.config.url("nodes/"))
    }

    /// Poll the node roster.
    pub fn nodes(&self) -> ServiceSubscription<ResultPage<Node>> {
        let sub = self.factory.poll_with_policy(
            &self.nodes_resource(),
            PollIntervals::duration(self.config.poll_intervals.nodes),
            self.policy,
        );
        ServiceSubscription::new(sub, |value| ResultPage::from_value(Some(value)))
    }

    /// Fetch the node roster once.
    pub async fn nodes_once(&self) -> Result<ResultPage<Node>, FetchError> {
        let value = self.factory.fetch_once(&self.nodes_resource()).await?;
        Ok(ResultPage::from_value(Some(value)))
    }

    /// Fetch one node record.
    pub async fn node_once(&self, id: i64) -> Result<Node, FetchError> {
        let resource = ResourceDescriptor::new(self.config.url(&format!("nodes/{}/", id)));
        let value = self.factory.fetch_once(&resource).await?;
        Ok(transform::build(Some(value)))
    }

    fn node_status_resource(&self) -> ResourceDescriptor {
        ResourceDescriptor::new(self.config.url("nodes/status/"))
    }

    /// Poll per-node health and execution counts.
    pub fn node_status(&self) -> ServiceSubscription<ResultPage<NodeStatus>> {
        let sub = self.factory.poll_with_policy(
            &self.node_status_resource(),
            PollIntervals::duration(self.config.poll_intervals.node_status),
            self.policy,
        );
        ServiceSubscription::new(sub, |value| ResultPage::from_value(Some(value)))
    }

    /// Fetch per-node health once.
    pub async fn node_status_once(&self) -> Result<ResultPage<NodeStatus>, FetchError> {
        let value = self.factory.fetch_once(&self.node_status_resource()).await?;
        Ok(ResultPage::from_value(Some(value)))
    }

    /// PATCH a node (pause or resume) and return the updated record.
    pub async fn update_node_once(
        &self,
        id: i64,
        update: &NodeUpdate,
    ) -> Result<Node, FetchError> {
        let url = self.config.url(&format!("nodes/{}/", id));
        let value = patch_value(self.factory.fetcher().as_ref(), &url, update).await?;
        Ok(transform::build(Some(value)))
    }
}
