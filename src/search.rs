//! Region name search over a normalized lookup structure.
//!
//! Names and countries are NFD-decomposed, stripped of combining marks
//! and lowercased once at index build time, so queries like "sao paulo"
//! match "São Paulo" without per-query decomposition of the corpus.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// The searchable identity of one region.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchableRegion {
    pub gdl_code: String,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub gdl_code: String,
    /// Display label, `"{name}, {country}"`.
    pub label: String,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    gdl_code: String,
    normalized_name: String,
    normalized_country: String,
    label: String,
}

/// Pre-normalized search corpus.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
}

impl SearchIndex {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

pub fn build_search_index(regions: &[SearchableRegion]) -> SearchIndex {
    SearchIndex {
        entries: regions
            .iter()
            .map(|region| IndexEntry {
                gdl_code: region.gdl_code.clone(),
                normalized_name: normalize(&region.name),
                normalized_country: normalize(&region.country),
                label: format!("{}, {}", region.name, region.country),
            })
            .collect(),
    }
}

/// Substring search over normalized name and country.
///
/// An empty or whitespace-only query returns nothing; results keep
/// index order and truncate to `limit`.
pub fn search_regions(query: &str, index: &SearchIndex, limit: usize) -> Vec<SearchResult> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let normalized_query = normalize(trimmed);

    index
        .entries
        .iter()
        .filter(|entry| {
            entry.normalized_name.contains(&normalized_query)
                || entry.normalized_country.contains(&normalized_query)
        })
        .take(limit)
        .map(|entry| SearchResult {
            gdl_code: entry.gdl_code.clone(),
            label: entry.label.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(code: &str, name: &str, country: &str) -> SearchableRegion {
        SearchableRegion {
            gdl_code: code.to_string(),
            name: name.to_string(),
            country: country.to_string(),
        }
    }

    fn fixture() -> SearchIndex {
        build_search_index(&[
            region("BRAr127", "São Paulo", "Brazil"),
            region("FRAr110", "Île-de-France", "France"),
            region("GBRr101", "North East England", "United Kingdom"),
            region("NORr101", "Oslo og Akershus", "Norway"),
        ])
    }

    #[test]
    fn test_diacritics_fold_both_ways() {
        let index = fixture();
        let results = search_regions("sao paulo", &index, DEFAULT_SEARCH_LIMIT);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].gdl_code, "BRAr127");
        assert_eq!(results[0].label, "São Paulo, Brazil");

        // Accented query against the folded corpus also matches.
        let results = search_regions("Île", &index, DEFAULT_SEARCH_LIMIT);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].gdl_code, "FRAr110");
    }

    #[test]
    fn test_country_matches_too() {
        let results = search_regions("norway", &fixture(), DEFAULT_SEARCH_LIMIT);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].gdl_code, "NORr101");
    }

    #[test]
    fn test_empty_and_whitespace_queries() {
        let index = fixture();
        assert!(search_regions("", &index, DEFAULT_SEARCH_LIMIT).is_empty());
        assert!(search_regions("   ", &index, DEFAULT_SEARCH_LIMIT).is_empty());
    }

    #[test]
    fn test_case_insensitive_substring() {
        let results = search_regions("EAST", &fixture(), DEFAULT_SEARCH_LIMIT);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].gdl_code, "GBRr101");
    }

    #[test]
    fn test_limit_truncates() {
        let regions: Vec<SearchableRegion> = (0..25)
            .map(|i| region(&format!("GBRr1{i:02}"), &format!("Region {i}"), "United Kingdom"))
            .collect();
        let index = build_search_index(&regions);
        assert_eq!(search_regions("region", &index, 10).len(), 10);
        assert_eq!(search_regions("kingdom", &index, 3).len(), 3);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(search_regions("atlantis", &fixture(), DEFAULT_SEARCH_LIMIT).is_empty());
    }
}
