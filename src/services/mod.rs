//! Typed service layer over the cluster REST API.
//!
//! Each service binds the shared [`PollerFactory`](crate::poll::PollerFactory)
//! and [`DeckConfig`](crate::config::DeckConfig). One-shot calls fetch and
//! decode a single response; polled calls return a [`ServiceSubscription`]
//! whose ticks carry decoded domain models instead of raw JSON.

pub mod feed;
pub mod jobs;
pub mod load;
pub mod nodes;
pub mod recipes;
pub mod status;

pub use feed::FeedService;
pub use jobs::JobsService;
pub use load::LoadService;
pub use nodes::NodesService;
pub use recipes::RecipesService;
pub use status::StatusService;

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::poll::{PollStopper, PollSubscription, PollTick};
use crate::traits::{FetchError, Headers, ResourceFetcher};

/// One delivery from a typed poll stream.
#[derive(Debug)]
pub enum ServiceTick<T> {
    /// A decoded payload.
    Data(T),
    /// The poll attempt failed under a continue-on-error policy.
    Degraded(FetchError),
}

impl<T> ServiceTick<T> {
    /// The payload, if this tick carried one.
    pub fn data(self) -> Option<T> {
        match self {
            ServiceTick::Data(data) => Some(data),
            ServiceTick::Degraded(_) => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ServiceTick::Degraded(_))
    }
}

type Decoder<T> = Arc<dyn Fn(Value) -> T + Send + Sync>;

/// A poll subscription whose ticks decode to a domain type.
///
/// Wraps the raw [`PollSubscription`]: same stop semantics, same terminal
/// behavior, with each data tick run through the service's decoder.
pub struct ServiceSubscription<T> {
    inner: PollSubscription,
    decode: Decoder<T>,
}

impl<T> ServiceSubscription<T> {
    pub(crate) fn new(
        inner: PollSubscription,
        decode: impl Fn(Value) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner,
            decode: Arc::new(decode),
        }
    }

    /// Identity of the underlying poller.
    pub fn id(&self) -> Uuid {
        self.inner.id()
    }

    /// Handle for stopping the poll loop from another task.
    pub fn stopper(&self) -> PollStopper {
        self.inner.stopper()
    }

    /// Stop the underlying poll loop.
    pub fn stop(&mut self) {
        self.inner.stop()
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.is_stopped()
    }

    /// Wait for the next tick. `None` means the stream is terminal.
    pub async fn next_tick(&mut self) -> Option<ServiceTick<T>> {
        let tick = self.inner.next_tick().await?;
        Some(self.map_tick(tick))
    }

    fn map_tick(&self, tick: PollTick) -> ServiceTick<T> {
        match tick {
            PollTick::Data(value) => ServiceTick::Data((self.decode)(value)),
            PollTick::Degraded(err) => ServiceTick::Degraded(err),
        }
    }
}

impl<T> Stream for ServiceSubscription<T> {
    type Item = ServiceTick<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(tick)) => Poll::Ready(Some(this.map_tick(tick))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> fmt::Debug for ServiceSubscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceSubscription")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// PATCH a JSON body and decode the response the way GETs are decoded.
pub(crate) async fn patch_value(
    fetcher: &dyn ResourceFetcher,
    url: &str,
    body: &impl Serialize,
) -> Result<Value, FetchError> {
    let body = serde_json::to_string(body).map_err(|err| FetchError::Other(err.to_string()))?;
    let response = fetcher.patch(url, &body, &Headers::new()).await?;
    response.into_value()
}
