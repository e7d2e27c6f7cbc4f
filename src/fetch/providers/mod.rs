// src/fetch/providers/mod.rs
pub mod rss;

pub use rss::RssProvider;

use crate::config::FeedConfig;
use crate::fetch::types::NewsProvider;

/// Build HTTP providers for the configured feed list.
pub fn from_feed_configs(feeds: &[FeedConfig]) -> Vec<Box<dyn NewsProvider>> {
    feeds
        .iter()
        .map(|f| Box::new(RssProvider::from_url(&f.name, &f.url)) as Box<dyn NewsProvider>)
        .collect()
}
