//! Smelterdeck - a headless monitoring client for Smelter processing clusters
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod config;
pub mod error;
pub mod models;
pub mod poll;
pub mod resource;
pub mod services;
pub mod state;
pub mod storage;
pub mod traits;
pub mod transform;
