//! World Happiness Report value extraction.
//!
//! Input rows are country+year granular (one row per country per report
//! year). For each country only the latest year survives, the same dedup
//! law the SHDI parser applies, except keyed through an external
//! country-name → ISO-3 mapping. Unmapped or null-mapped country names
//! are dropped silently; absent sub-factors become null.

use super::CountryIsoMap;
use crate::error::AtlasError;
use crate::schema::{WhrRegionValue, WhrValues};
use csv::ReaderBuilder;
use rustc_hash::FxHashMap;

/// One row of the happiness-report spreadsheet export.
#[derive(Debug, Clone, PartialEq)]
pub struct WhrRow {
    pub country: String,
    pub year: i32,
    /// Life evaluation (3-year average).
    pub score: Option<f64>,
    pub gdp_per_capita: Option<f64>,
    pub social_support: Option<f64>,
    pub life_expectancy: Option<f64>,
    pub freedom: Option<f64>,
    pub generosity: Option<f64>,
    pub corruption: Option<f64>,
}

pub fn extract_whr_values(rows: &[WhrRow], country_to_iso: &CountryIsoMap) -> WhrValues {
    let mut latest_by_iso: FxHashMap<String, &WhrRow> = FxHashMap::default();

    for row in rows {
        let Some(Some(iso)) = country_to_iso.get(&row.country) else {
            continue;
        };
        match latest_by_iso.get(iso.as_str()) {
            Some(existing) if row.year <= existing.year => {}
            _ => {
                latest_by_iso.insert(iso.clone(), row);
            }
        }
    }

    latest_by_iso
        .into_iter()
        .map(|(iso, row)| {
            (
                iso,
                WhrRegionValue {
                    score: row.score,
                    gdp_per_capita: row.gdp_per_capita,
                    social_support: row.social_support,
                    life_expectancy: row.life_expectancy,
                    freedom: row.freedom,
                    generosity: row.generosity,
                    corruption: row.corruption,
                    year: row.year,
                },
            )
        })
        .collect()
}

/// Fixed header names of the report's figure export.
const COL_YEAR: &str = "Year";
const COL_COUNTRY: &str = "Country name";
const COL_SCORE: &str = "Life evaluation (3-year average)";
const COL_GDP: &str = "Explained by: Log GDP per capita";
const COL_SOCIAL: &str = "Explained by: Social support";
const COL_LIFE: &str = "Explained by: Healthy life expectancy";
const COL_FREEDOM: &str = "Explained by: Freedom to make life choices";
const COL_GENEROSITY: &str = "Explained by: Generosity";
const COL_CORRUPTION: &str = "Explained by: Perceptions of corruption";

/// Parse the CSV export of the report spreadsheet into raw rows.
///
/// Fails only on a structurally missing header; per-field numeric
/// problems degrade to null as everywhere else.
pub fn parse_whr_csv(text: &str) -> Result<Vec<WhrRow>, AtlasError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AtlasError::validation("whr spreadsheet", e.to_string()))?
        .clone();
    let positions: FxHashMap<&str, usize> =
        headers.iter().enumerate().map(|(i, h)| (h.trim(), i)).collect();

    if !positions.contains_key(COL_COUNTRY) || !positions.contains_key(COL_YEAR) {
        return Err(AtlasError::validation(
            "whr spreadsheet",
            format!("missing `{COL_COUNTRY}` or `{COL_YEAR}` column"),
        ));
    }

    let get = |row: &csv::StringRecord, name: &str| -> Option<f64> {
        positions
            .get(name)
            .and_then(|&i| row.get(i))
            .and_then(|v| v.trim().parse::<f64>().ok())
    };

    Ok(reader
        .records()
        .flatten()
        .filter_map(|row| {
            let country = positions
                .get(COL_COUNTRY)
                .and_then(|&i| row.get(i))
                .unwrap_or("")
                .trim()
                .to_string();
            if country.is_empty() {
                return None;
            }
            Some(WhrRow {
                country,
                year: get(&row, COL_YEAR).map(|y| y as i32).unwrap_or(0),
                score: get(&row, COL_SCORE),
                gdp_per_capita: get(&row, COL_GDP),
                social_support: get(&row, COL_SOCIAL),
                life_expectancy: get(&row, COL_LIFE),
                freedom: get(&row, COL_FREEDOM),
                generosity: get(&row, COL_GENEROSITY),
                corruption: get(&row, COL_CORRUPTION),
            })
        })
        .collect())
}
