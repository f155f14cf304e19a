//! Concrete implementations of trait abstractions.
//!
//! This module provides production-ready adapters that implement the traits
//! defined in `crate::traits`. These adapters enable dependency injection
//! and testability while maintaining the same functionality.
//!
//! # Adapters
//!
//! - [`ReqwestFetcher`] - Resource fetcher using reqwest
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockFetcher`] - Configurable scripted responses and request recording

pub mod mock;
pub mod reqwest_fetch;

pub use mock::MockFetcher;
pub use reqwest_fetch::ReqwestFetcher;
