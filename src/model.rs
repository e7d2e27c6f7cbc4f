// src/model.rs
use chrono::NaiveDate;

/// One row of the news table, as produced by the fetch layer.
///
/// Immutable once built; the pipeline returns new tables instead of
/// mutating input in place.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct NewsItem {
    pub title: String,       // non-empty after ingest normalization
    pub description: String, // may be empty
    pub link: String,
    pub source: String, // publisher label, e.g. "TechCrunch"
    pub date: NaiveDate,
}

/// The six sort orders the dashboard offers. Default is newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    DateNewest,
    DateOldest,
    TitleAsc,
    TitleDesc,
    SourceAsc,
    SourceDesc,
}

impl SortKey {
    /// Parse the wire form used in query strings (`date_newest`, `title_asc`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "date_newest" => Some(Self::DateNewest),
            "date_oldest" => Some(Self::DateOldest),
            "title_asc" => Some(Self::TitleAsc),
            "title_desc" => Some(Self::TitleDesc),
            "source_asc" => Some(Self::SourceAsc),
            "source_desc" => Some(Self::SourceDesc),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_parses_all_wire_forms() {
        for (s, k) in [
            ("date_newest", SortKey::DateNewest),
            ("date_oldest", SortKey::DateOldest),
            ("title_asc", SortKey::TitleAsc),
            ("title_desc", SortKey::TitleDesc),
            ("source_asc", SortKey::SourceAsc),
            ("source_desc", SortKey::SourceDesc),
        ] {
            assert_eq!(SortKey::parse(s), Some(k));
        }
        assert_eq!(SortKey::parse("newest"), None);
    }

    #[test]
    fn default_sort_is_newest_first() {
        assert_eq!(SortKey::default(), SortKey::DateNewest);
    }
}
