// src/fetch/mod.rs
pub mod providers;
pub mod types;

use crate::fetch::types::{NewsProvider, RawNewsItem};
use crate::model::NewsItem;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("fetch_items_total", "Total items parsed from feed providers.");
        describe_counter!("fetch_kept_total", "Items kept after validation.");
        describe_counter!(
            "fetch_rows_dropped_total",
            "Malformed rows dropped (missing title or unparseable date)."
        );
        describe_counter!("fetch_provider_errors_total", "Provider fetch/parse errors.");
        describe_histogram!("fetch_parse_ms", "Provider parse time in milliseconds.");
        describe_gauge!("fetch_last_run_ts", "Unix ts when the feed fetch last ran.");
    });
}

/// Clean up feed text for display: decode HTML entities, drop markup,
/// fold typographic quotes to ASCII, and collapse whitespace runs.
///
/// Punctuation and length are left alone; headlines like "Is AGI near?"
/// must survive verbatim so the table (and its CSV export) reflects the
/// source content.
pub fn normalize_text(s: &str) -> String {
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();

    let decoded = html_escape::decode_html_entities(s);

    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    let stripped = re_tags.replace_all(&decoded, "");

    // “ ” « » → ", ‘ ’ → '
    let ascii_quoted = stripped
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&ascii_quoted, " ").trim().to_string()
}

/// Validate raw rows into the final table, dropping malformed ones.
///
/// A row needs a non-empty title and a parseable date; anything else is
/// dropped with a warning rather than aborting the whole fetch. Returns the
/// kept rows and the drop count.
pub fn validate_rows(raw: Vec<RawNewsItem>) -> (Vec<NewsItem>, usize) {
    let mut dropped = 0usize;
    let mut kept = Vec::with_capacity(raw.len());
    for row in raw {
        if row.title.is_empty() {
            tracing::warn!(source = %row.source, link = %row.link, "dropping row with empty title");
            dropped += 1;
            continue;
        }
        let Some(date) = row.date else {
            tracing::warn!(source = %row.source, title = %row.title, "dropping row with missing or unparseable date");
            dropped += 1;
            continue;
        };
        kept.push(NewsItem {
            title: row.title,
            description: row.description,
            link: row.link,
            source: row.source,
            date,
        });
    }
    (kept, dropped)
}

/// Fetch once from every provider and aggregate the validated table.
///
/// A failing provider contributes nothing but does not abort the run.
/// Returns (kept rows, dropped-row count).
pub async fn run_once(providers: &[Box<dyn NewsProvider>]) -> (Vec<NewsItem>, usize) {
    ensure_metrics_described();

    let mut raw = Vec::new();
    for p in providers {
        match p.fetch_latest().await {
            Ok(mut v) => raw.append(&mut v),
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), "provider error");
                counter!("fetch_provider_errors_total").increment(1);
            }
        }
    }

    let (kept, dropped) = validate_rows(raw);

    // Telemetry
    counter!("fetch_kept_total").increment(kept.len() as u64);
    counter!("fetch_rows_dropped_total").increment(dropped as u64);
    gauge!("fetch_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

    (kept, dropped)
}
