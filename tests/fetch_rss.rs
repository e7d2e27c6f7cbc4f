// tests/fetch_rss.rs
//
// Feed aggregation over fixture providers: field mapping, malformed-row
// dropping, and tolerance of a failing provider.

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use ai_news_dashboard::fetch::{
    self,
    providers::RssProvider,
    types::{NewsProvider, RawNewsItem},
};

const FEED_XML: &str = include_str!("fixtures/ai_feed.xml");

struct BrokenProvider;

#[async_trait]
impl NewsProvider for BrokenProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawNewsItem>> {
        Err(anyhow!("connection reset"))
    }
    fn name(&self) -> &str {
        "Broken"
    }
}

#[tokio::test]
async fn fixture_feed_keeps_dated_rows_and_drops_malformed() {
    let providers: Vec<Box<dyn NewsProvider>> =
        vec![Box::new(RssProvider::from_fixture_str("AI Wire", FEED_XML))];
    let (kept, dropped) = fetch::run_once(&providers).await;

    assert_eq!(kept.len(), 2);
    assert_eq!(dropped, 2);

    assert_eq!(kept[0].title, "OpenAI ships new reasoning model");
    assert_eq!(kept[0].source, "AI Wire");
    assert_eq!(kept[0].link, "https://ai-wire.test/openai-reasoning");
    assert_eq!(kept[0].date.to_string(), "2024-01-01");
    assert_eq!(
        kept[0].description,
        "The lab says the model is \"materially better\" at math."
    );

    assert_eq!(kept[1].date.to_string(), "2024-01-05");
}

#[tokio::test]
async fn failing_provider_does_not_abort_the_run() {
    let providers: Vec<Box<dyn NewsProvider>> = vec![
        Box::new(BrokenProvider),
        Box::new(RssProvider::from_fixture_str("AI Wire", FEED_XML)),
    ];
    let (kept, _dropped) = fetch::run_once(&providers).await;
    assert_eq!(kept.len(), 2);
}

#[tokio::test]
async fn all_providers_empty_yields_empty_table() {
    let empty =
        r#"<?xml version="1.0"?><rss version="2.0"><channel><title>e</title></channel></rss>"#;
    let providers: Vec<Box<dyn NewsProvider>> =
        vec![Box::new(RssProvider::from_fixture_str("Empty", empty))];
    let (kept, dropped) = fetch::run_once(&providers).await;
    assert!(kept.is_empty());
    assert_eq!(dropped, 0);
}
