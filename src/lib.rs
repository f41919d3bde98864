//! LLM Replay Cache
//!
//! A deterministic replay layer for LLM response caches:
//! - Repeated identical requests get distinct, ordered cache slots
//! - Later passes replay recorded responses in the order they were stored
//! - Pluggable in-memory (moka) and Redis backends

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
