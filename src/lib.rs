// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod analyzer;
pub mod api;
pub mod cache;
pub mod classify;
pub mod config;
pub mod ensemble;
pub mod headlines;
pub mod metrics;
pub mod scoring;
pub mod sentiment;

// ---- Re-exports for stable public API ----
pub use crate::analyzer::{TickerAnalyzer, TickerScore};
pub use crate::api::{create_router, AppState};
pub use crate::config::AnalyzerConfig;
