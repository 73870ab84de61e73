//! shortstat - short links with time-bucketed hit statistics
//!
//! Assigns short codes to destination URLs and keeps per-code hit counters
//! at several calendar granularities on a key-value store, then rebuilds
//! ordered, gap-filled series and leaderboards from them.
//!
//! # Features
//! - **cli**: Command-line binary (default)
//!
//! # Architecture
//! - `links`: code generation, URL normalization, link records
//! - `analytics`: hit recording and stats reconstruction
//! - `storage`: key-value store seam (Redis, in-memory) and key grammar
//! - `services`: the `Shortener` facade
//! - `config`: configuration management
//! - `system`: logging initialization

pub mod analytics;
#[cfg(feature = "cli")]
pub mod cli;
pub mod clock;
pub mod config;
pub mod errors;
pub mod links;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
