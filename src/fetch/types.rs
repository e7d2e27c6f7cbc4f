// src/fetch/types.rs
use anyhow::Result;
use chrono::NaiveDate;

/// A news row as parsed from a feed, before validation.
///
/// `date` is `None` when the feed carried no publication date or it failed
/// to parse; such rows are dropped (with a warning) during aggregation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct RawNewsItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub source: String,
    pub date: Option<NaiveDate>,
}

#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<RawNewsItem>>;
    fn name(&self) -> &str;
}
