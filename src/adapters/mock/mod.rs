//! Mock implementations for testing.
//!
//! This module provides mock implementations of the trait abstractions,
//! enabling unit testing without network dependencies.
//!
//! # Available Mocks
//!
//! - [`MockFetcher`] - Resource fetcher with configurable responses

pub mod fetch;

pub use fetch::{MockFetcher, MockResponse, RecordedRequest};
