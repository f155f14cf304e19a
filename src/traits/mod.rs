//! Trait abstractions for dependency injection and testability.
//!
//! This module provides trait-based abstractions for core functionality,
//! enabling dependency injection, mocking, and better testability.
//!
//! # Traits
//!
//! - [`ResourceFetcher`] - Cluster REST API operations (GET, PATCH)

pub mod fetch;

pub use fetch::{FetchError, FetchResponse, Headers, ResourceFetcher};
