use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::fetch::types::{NewsProvider, RawNewsItem};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

fn parse_rfc2822_date(ts: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc2822(ts).ok().map(|dt| dt.date_naive())
}

/// An RSS 2.0 feed provider. Fixture mode parses an in-memory document
/// (tests); HTTP mode fetches the configured URL.
pub struct RssProvider {
    source: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl RssProvider {
    pub fn from_fixture_str(source: &str, xml: &str) -> Self {
        Self {
            source: source.to_string(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn from_url(source: &str, url: &str) -> Self {
        let client = reqwest::Client::new();
        Self {
            source: source.to_string(),
            mode: Mode::Http {
                url: url.to_string(),
                client,
            },
        }
    }

    fn parse_items_from_str(&self, s: &str) -> Result<Vec<RawNewsItem>> {
        let t0 = std::time::Instant::now();
        let xml_clean = scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean)
            .with_context(|| format!("parsing rss xml for {}", self.source))?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let title = crate::fetch::normalize_text(it.title.as_deref().unwrap_or_default());
            if title.is_empty() {
                continue;
            }
            let description =
                crate::fetch::normalize_text(it.description.as_deref().unwrap_or_default());

            out.push(RawNewsItem {
                title,
                description,
                link: it.link.unwrap_or_default(),
                source: self.source.clone(),
                date: it.pub_date.as_deref().and_then(parse_rfc2822_date),
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("fetch_parse_ms").record(ms);
        counter!("fetch_items_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl NewsProvider for RssProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawNewsItem>> {
        match &self.mode {
            Mode::Fixture(s) => self.parse_items_from_str(s),

            Mode::Http { url, client } => {
                let body = match client.get(url).send().await {
                    Ok(resp) => resp
                        .text()
                        .await
                        .with_context(|| format!("{} http .text()", self.source))?,
                    Err(e) => {
                        tracing::warn!(error = ?e, provider = %self.source, "provider http error");
                        counter!("fetch_provider_errors_total").increment(1);
                        return Err(e).with_context(|| format!("{} http get()", self.source));
                    }
                };
                self.parse_items_from_str(&body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.source
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
