//! Per-source value extraction.
//!
//! Each extractor is an independent transform from source-specific rows
//! into one normalized `{code → value-record}` map, and each keeps its
//! own null/duplicate/aggregation policy:
//!
//! - `hdi`: region-keyed, filter-out on null composite, no aggregation;
//! - `whr`: country-keyed, latest-year-wins per country, nulls pass through;
//! - `oecd`: country-keyed, per-dimension null-skipping mean over
//!   subnational rows.

pub mod hdi;
pub mod oecd;
pub mod whr;

pub use hdi::extract_hdi_values;
pub use oecd::{extract_oecd_values, parse_oecd_csv, OecdRow};
pub use whr::{extract_whr_values, parse_whr_csv, WhrRow};

use crate::error::AtlasError;
use rustc_hash::FxHashMap;

/// Country-name → ISO-3 mapping table.
///
/// A `None` value means "deliberately excluded, no ISO code exists";
/// both it and a missing entry drop the country's rows silently.
pub type CountryIsoMap = FxHashMap<String, Option<String>>;

/// Parse a mapping table from its JSON config document.
pub fn parse_country_iso_map(text: &str) -> Result<CountryIsoMap, AtlasError> {
    serde_json::from_str(text)
        .map_err(|e| AtlasError::validation("country-to-iso mapping", e.to_string()))
}

const WHR_COUNTRY_ISO_JSON: &str = include_str!("data/whr-country-to-iso.json");
const OECD_COUNTRY_ISO_JSON: &str = include_str!("data/oecd-country-to-iso.json");

/// Built-in happiness-report mapping, used when the data directory
/// carries no override file.
pub fn default_whr_country_iso_map() -> CountryIsoMap {
    parse_country_iso_map(WHR_COUNTRY_ISO_JSON).expect("embedded whr mapping is valid JSON")
}

/// Built-in regional well-being mapping.
pub fn default_oecd_country_iso_map() -> CountryIsoMap {
    parse_country_iso_map(OECD_COUNTRY_ISO_JSON).expect("embedded oecd mapping is valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_accepts_null_entries() {
        let map = parse_country_iso_map(
            r#"{"Australia": "AUS", "Kosovo": null}"#,
        )
        .unwrap();
        assert_eq!(map.get("Australia"), Some(&Some("AUS".to_string())));
        assert_eq!(map.get("Kosovo"), Some(&None));
        assert_eq!(map.get("Atlantis"), None);
    }

    #[test]
    fn test_mapping_rejects_non_object() {
        assert!(parse_country_iso_map("[1, 2]").is_err());
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let whr = default_whr_country_iso_map();
        assert_eq!(whr.get("Finland"), Some(&Some("FIN".to_string())));
        assert_eq!(whr.get("Kosovo"), Some(&None));

        let oecd = default_oecd_country_iso_map();
        assert_eq!(oecd.get("Korea"), Some(&Some("KOR".to_string())));
        assert_eq!(oecd.get("Türkiye"), Some(&Some("TUR".to_string())));
    }
}
