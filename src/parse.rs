//! SHDI CSV parsing with latest-year deduplication.
//!
//! The Global Data Lab subnational HDI export is a plain comma-delimited
//! table with a header row. Coverage is sparse: numeric columns are often
//! empty or unparsable, and the same region code appears once per survey
//! year. Parsing degrades bad numerics to `None` (never zero, never NaN)
//! and keeps exactly one record per region code, the one with the highest
//! year; ties keep the first occurrence.

use csv::ReaderBuilder;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Administrative level of a region row.
///
/// The source encodes this as `Subnat` / `National`; anything else is
/// treated as subnational, matching the source's own convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionLevel {
    Subnational,
    National,
}

impl RegionLevel {
    pub fn from_source(value: &str) -> Self {
        match value {
            "National" => RegionLevel::National,
            _ => RegionLevel::Subnational,
        }
    }
}

/// One deduplicated row of the subnational HDI table.
#[derive(Debug, Clone, PartialEq)]
pub struct ShdiRecord {
    /// Stable region code, globally unique after dedup (e.g. `GBRr101`).
    pub gdl_code: String,
    pub name: String,
    pub country: String,
    /// Three-letter ISO country code.
    pub country_iso: String,
    pub level: RegionLevel,
    pub year: i32,
    /// Composite index, [0, 1] when present.
    pub hdi: Option<f64>,
    pub education_index: Option<f64>,
    pub health_index: Option<f64>,
    pub income_index: Option<f64>,
}

/// Empty or unparsable numeric fields become `None`, not zero.
fn parse_numeric_or_null(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Header name → column index dictionary, so column order in the export
/// does not matter.
fn header_positions(headers: &csv::StringRecord) -> FxHashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_string(), i))
        .collect()
}

/// Field accessor that pads short rows with empty strings.
fn field<'a>(
    row: &'a csv::StringRecord,
    positions: &FxHashMap<String, usize>,
    name: &str,
) -> &'a str {
    positions
        .get(name)
        .and_then(|&i| row.get(i))
        .unwrap_or("")
}

/// Parse the SHDI CSV text into deduplicated records.
///
/// Blank lines are ignored; quoted fields suspend delimiter recognition.
/// Header-only input (or anything shorter) yields an empty result.
pub fn parse_shdi_csv(text: &str) -> Vec<ShdiRecord> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let positions = match reader.headers() {
        Ok(headers) => header_positions(headers),
        Err(_) => return Vec::new(),
    };

    // First-seen order is preserved so ties on year resolve to the first
    // occurrence and output order is deterministic.
    let mut order: Vec<String> = Vec::new();
    let mut latest_by_code: FxHashMap<String, ShdiRecord> = FxHashMap::default();

    for row in reader.records().flatten() {
        let record = ShdiRecord {
            gdl_code: field(&row, &positions, "gdlcode").to_string(),
            name: field(&row, &positions, "region").to_string(),
            country: field(&row, &positions, "country").to_string(),
            country_iso: field(&row, &positions, "isocode3").to_string(),
            level: RegionLevel::from_source(field(&row, &positions, "level")),
            year: field(&row, &positions, "year").trim().parse().unwrap_or(0),
            hdi: parse_numeric_or_null(field(&row, &positions, "shdi")),
            education_index: parse_numeric_or_null(field(&row, &positions, "edindex")),
            health_index: parse_numeric_or_null(field(&row, &positions, "healthindex")),
            income_index: parse_numeric_or_null(field(&row, &positions, "incindex")),
        };

        match latest_by_code.get(&record.gdl_code) {
            Some(existing) if record.year <= existing.year => {}
            Some(_) => {
                latest_by_code.insert(record.gdl_code.clone(), record);
            }
            None => {
                order.push(record.gdl_code.clone());
                latest_by_code.insert(record.gdl_code.clone(), record);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|code| latest_by_code.remove(&code))
        .collect()
}
