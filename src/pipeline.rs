//! # News Filter Pipeline
//! Pure filter/sort/search transformations over the news table.
//!
//! Every operation takes the table by reference or by value and returns a
//! new table; nothing here holds state and each call is independent, so the
//! HTTP layer may run it concurrently without coordination.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::error::{DashboardError, Result};
use crate::model::{NewsItem, SortKey};

/// Inclusive date range. `start <= end` is enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A single picked day counts as the range `[d, d]`.
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Which sources the user picked. `All` is the sentinel that skips source
/// filtering entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    All,
    Only(BTreeSet<String>),
}

/// The literal multiselect option that stands for "every source".
pub const ALL_SOURCES: &str = "All";

impl SourceSelection {
    /// Build a selection from the raw option list.
    ///
    /// An empty list without the `All` sentinel is rejected here, before any
    /// filtering runs, so a blocked request is never confused with a
    /// legitimately empty result set.
    pub fn from_list<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.into();
            if name == ALL_SOURCES {
                return Ok(Self::All);
            }
            if !name.trim().is_empty() {
                set.insert(name);
            }
        }
        if set.is_empty() {
            return Err(DashboardError::EmptySelection);
        }
        Ok(Self::Only(set))
    }

    pub fn allows(&self, source: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(source),
        }
    }
}

/// User-selected parameters for one pipeline run.
#[derive(Debug, Clone)]
pub struct FilterParams {
    /// Case-insensitive substring to search for; empty means passthrough.
    pub keyword: String,
    /// `None` defaults to the full min/max span of the current data.
    pub range: Option<DateRange>,
    pub sources: SourceSelection,
    pub sort: SortKey,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            range: None,
            sources: SourceSelection::All,
            sort: SortKey::default(),
        }
    }
}

/// Per-source occurrence counts plus the total, computed after the keyword
/// filter (matching what the dashboard displays above the sort controls).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FeedSummary {
    pub total: usize,
    pub per_source: Vec<SourceCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: usize,
}

/// Output of a full pipeline run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FeedView {
    pub items: Vec<NewsItem>,
    pub summary: FeedSummary,
}

/// Keep rows whose title or description contains `keyword` as a
/// case-insensitive substring. Empty keyword is a passthrough; an empty
/// description simply never matches. Row order is preserved.
pub fn filter_by_keyword(items: &[NewsItem], keyword: &str) -> Vec<NewsItem> {
    if keyword.is_empty() {
        return items.to_vec();
    }
    let needle = keyword.to_lowercase();
    items
        .iter()
        .filter(|it| {
            it.title.to_lowercase().contains(&needle)
                || it.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Total row count plus per-source counts, descending by count.
/// Ties are broken by source name so the ordering is deterministic.
pub fn summarize(items: &[NewsItem]) -> FeedSummary {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for it in items {
        *counts.entry(it.source.as_str()).or_insert(0) += 1;
    }
    let mut per_source: Vec<SourceCount> = counts
        .into_iter()
        .map(|(source, count)| SourceCount {
            source: source.to_string(),
            count,
        })
        .collect();
    per_source.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.source.cmp(&b.source)));
    FeedSummary {
        total: items.len(),
        per_source,
    }
}

/// Stable sort on the designated field. Text comparisons are ordinary
/// lexicographic, matching the source data's casing.
pub fn sort_items(mut items: Vec<NewsItem>, key: SortKey) -> Vec<NewsItem> {
    match key {
        SortKey::DateNewest => items.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::DateOldest => items.sort_by(|a, b| a.date.cmp(&b.date)),
        SortKey::TitleAsc => items.sort_by(|a, b| a.title.cmp(&b.title)),
        SortKey::TitleDesc => items.sort_by(|a, b| b.title.cmp(&a.title)),
        SortKey::SourceAsc => items.sort_by(|a, b| a.source.cmp(&b.source)),
        SortKey::SourceDesc => items.sort_by(|a, b| b.source.cmp(&a.source)),
    }
    items
}

/// Keep rows inside the inclusive date range whose source is allowed by the
/// selection. The selection was validated at construction, so this cannot
/// produce a misleading empty result from a blocked request.
pub fn filter_by_range_and_source(
    items: Vec<NewsItem>,
    range: &DateRange,
    selection: &SourceSelection,
) -> Vec<NewsItem> {
    items
        .into_iter()
        .filter(|it| range.contains(it.date) && selection.allows(&it.source))
        .collect()
}

/// Min/max date span of the table; `None` for an empty table.
pub fn full_span(items: &[NewsItem]) -> Option<DateRange> {
    let start = items.iter().map(|it| it.date).min()?;
    let end = items.iter().map(|it| it.date).max()?;
    Some(DateRange { start, end })
}

/// Sorted list of distinct source names, for the filter's option list.
pub fn distinct_sources(items: &[NewsItem]) -> Vec<String> {
    let set: BTreeSet<&str> = items.iter().map(|it| it.source.as_str()).collect();
    set.into_iter().map(str::to_string).collect()
}

/// Full pipeline: keyword filter, summary, sort, then range/source filter.
///
/// The summary reflects the keyword-filtered table before range/source
/// filtering, which is what the dashboard shows. When no explicit range is
/// given, the span of the keyword-filtered data is used, so every row passes.
pub fn run(items: &[NewsItem], params: &FilterParams) -> FeedView {
    let filtered = filter_by_keyword(items, &params.keyword);
    let summary = summarize(&filtered);
    let sorted = sort_items(filtered, params.sort);

    let items = match params.range.or_else(|| full_span(&sorted)) {
        Some(range) => filter_by_range_and_source(sorted, &range, &params.sources),
        // Empty table: nothing to filter.
        None => sorted,
    };

    FeedView { items, summary }
}
