// src/error.rs
use chrono::NaiveDate;

/// Failure taxonomy for the dashboard.
///
/// Validation errors (`EmptySelection`, `InvalidDateRange`) are detected
/// before any filtering runs. `NoData` means the fetch produced an empty
/// table, which is distinct from "no rows matched the filters" (the latter
/// is a legitimate zero-row result, not an error).
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("no news data available; try refreshing later")]
    NoData,

    #[error("select at least one source (or \"All\") to display news")]
    EmptySelection,

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Anything unexpected (feed I/O, CSV serialization, ...); surfaced as a
    /// generic retryable failure, never an uncaught crash.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
