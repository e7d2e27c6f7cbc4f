// src/export.rs
//
// CSV export of the filtered/sorted table. Column order matches the
// display fields; quoting/escaping is RFC 4180 via the csv crate, so text
// containing commas, quotes, or newlines round-trips losslessly.

use anyhow::{Context, Result};

use crate::model::NewsItem;

/// Fixed download filename offered to the browser.
pub const EXPORT_FILE_NAME: &str = "ai_news.csv";

const HEADER: [&str; 5] = ["Title", "Description", "Link", "Source", "Date"];

/// Serialize the table to CSV (UTF-8, header row, dates as `YYYY-MM-DD`).
pub fn to_csv(items: &[NewsItem]) -> Result<String> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(HEADER).context("writing csv header")?;
    for it in items {
        w.write_record([
            it.title.as_str(),
            it.description.as_str(),
            it.link.as_str(),
            it.source.as_str(),
            &it.date.format("%Y-%m-%d").to_string(),
        ])
        .context("writing csv record")?;
    }
    let bytes = w.into_inner().context("flushing csv writer")?;
    String::from_utf8(bytes).context("csv output was not utf-8")
}

/// Parse CSV produced by [`to_csv`] back into a table. Rows with an
/// unparseable date are rejected; the export path never produces them.
pub fn from_csv(data: &str) -> Result<Vec<NewsItem>> {
    let mut r = csv::Reader::from_reader(data.as_bytes());
    let mut out = Vec::new();
    for rec in r.records() {
        let rec = rec.context("reading csv record")?;
        let field = |i: usize| rec.get(i).unwrap_or_default().to_string();
        out.push(NewsItem {
            title: field(0),
            description: field(1),
            link: field(2),
            source: field(3),
            date: rec
                .get(4)
                .unwrap_or_default()
                .parse()
                .context("parsing csv date column")?,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(title: &str, desc: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            description: desc.to_string(),
            link: "https://example.test/a".to_string(),
            source: "X".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn header_row_and_date_format() {
        let out = to_csv(&[item("A", "d")]).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Title,Description,Link,Source,Date"));
        assert_eq!(lines.next(), Some("A,d,https://example.test/a,X,2024-01-01"));
    }

    #[test]
    fn embedded_commas_and_quotes_round_trip() {
        let rows = vec![
            item("Hello, world", "say \"hi\""),
            item("line\nbreak", ""),
        ];
        let csv_text = to_csv(&rows).unwrap();
        let back = from_csv(&csv_text).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn empty_table_exports_header_only() {
        let out = to_csv(&[]).unwrap();
        assert_eq!(out.trim_end(), "Title,Description,Link,Source,Date");
    }
}
