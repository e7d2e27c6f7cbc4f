// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod model;
pub mod pipeline;
pub mod refresh;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::error::DashboardError;
pub use crate::model::{NewsItem, SortKey};
pub use crate::pipeline::{DateRange, FilterParams, SourceSelection};
