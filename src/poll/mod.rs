//! Interval polling of cluster REST resources.
//!
//! The dashboard never opens push channels; every live view is a
//! poller that re-fetches its resource on a fixed interval. This
//! module provides the engine ([`poller`]) and the factory that binds
//! it to a [`crate::traits::ResourceFetcher`] ([`factory`]).

pub mod factory;
pub mod poller;

pub use factory::{fetch_value, PollerFactory};
pub use poller::{PollPolicy, PollStopper, PollSubscription, PollTick};
