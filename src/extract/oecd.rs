//! OECD Better Life value extraction.
//!
//! Input rows are subnational (TL2 region) granular. Rows group by
//! country through the name → ISO-3 mapping, then each of the eleven
//! dimensions is averaged across the country's rows independently:
//! a row missing `income` still contributes its `safety` score, so a
//! country can have some dimensions averaged over fewer rows than
//! others. Averages round to 1 decimal place; a dimension nobody in the
//! group reports stays null.

use super::CountryIsoMap;
use crate::error::AtlasError;
use crate::schema::{Dimension, OecdBliRegionValue, OecdBliValues};
use csv::ReaderBuilder;
use rustc_hash::FxHashMap;

/// One TL2-region row of the regional well-being spreadsheet export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OecdRow {
    pub country: String,
    pub region: String,
    /// TL2 region code (e.g. `AU1`).
    pub code: String,
    pub scores: OecdBliRegionValue,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn extract_oecd_values(rows: &[OecdRow], country_to_iso: &CountryIsoMap) -> OecdBliValues {
    let mut rows_by_iso: FxHashMap<String, Vec<&OecdRow>> = FxHashMap::default();

    for row in rows {
        if row.country.is_empty() {
            continue;
        }
        let Some(Some(iso)) = country_to_iso.get(&row.country) else {
            continue;
        };
        rows_by_iso.entry(iso.clone()).or_default().push(row);
    }

    rows_by_iso
        .into_iter()
        .map(|(iso, country_rows)| {
            let mut averaged = OecdBliRegionValue::default();
            for dimension in Dimension::ALL {
                let values: Vec<f64> = country_rows
                    .iter()
                    .filter_map(|r| r.scores.dimension(dimension))
                    .collect();
                let mean = if values.is_empty() {
                    None
                } else {
                    Some(round1(values.iter().sum::<f64>() / values.len() as f64))
                };
                averaged.set_dimension(dimension, mean);
            }
            (iso, averaged)
        })
        .collect()
}

/// The `Score_Last` sheet carries 8 preamble rows before the data, and
/// the columns sit at fixed positions.
const HEADER_OFFSET: usize = 8;
const COL_COUNTRY: usize = 1;
const COL_REGION: usize = 2;
const COL_CODE: usize = 3;
const FIRST_DIMENSION_COL: usize = 4;

/// Parse the CSV export of the `Score_Last` sheet into raw rows.
///
/// Rows without a TL2 code (headers, footnotes, country separators) are
/// skipped; numeric fields degrade to null.
pub fn parse_oecd_csv(text: &str) -> Result<Vec<OecdRow>, AtlasError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for row in reader.records().flatten().skip(HEADER_OFFSET) {
        let cell = |i: usize| row.get(i).unwrap_or("").trim();
        if cell(COL_CODE).is_empty() {
            continue;
        }

        let mut scores = OecdBliRegionValue::default();
        for (offset, dimension) in Dimension::ALL.into_iter().enumerate() {
            let value = cell(FIRST_DIMENSION_COL + offset).parse::<f64>().ok();
            scores.set_dimension(dimension, value);
        }

        rows.push(OecdRow {
            country: cell(COL_COUNTRY).to_string(),
            region: cell(COL_REGION).to_string(),
            code: cell(COL_CODE).to_string(),
            scores,
        });
    }

    if rows.is_empty() {
        return Err(AtlasError::validation(
            "oecd spreadsheet",
            "no data rows found after the fixed header offset",
        ));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mapping() -> CountryIsoMap {
        let mut map = CountryIsoMap::default();
        map.insert("Australia".to_string(), Some("AUS".to_string()));
        map.insert("Austria".to_string(), Some("AUT".to_string()));
        map
    }

    fn row(country: &str, code: &str, income: Option<f64>, safety: Option<f64>) -> OecdRow {
        OecdRow {
            country: country.to_string(),
            region: format!("{code} region"),
            code: code.to_string(),
            scores: OecdBliRegionValue {
                income,
                safety,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_subnational_rows_average_to_national() {
        let values = extract_oecd_values(
            &[
                row("Australia", "AU1", Some(4.0), Some(9.0)),
                row("Australia", "AU2", Some(6.0), Some(8.0)),
            ],
            &mapping(),
        );
        assert_relative_eq!(values["AUS"].income.unwrap(), 5.0);
        assert_relative_eq!(values["AUS"].safety.unwrap(), 8.5);
    }

    #[test]
    fn test_each_dimension_skips_nulls_independently() {
        // income present in one row, safety in the other: both average
        // over exactly the rows that report them.
        let values = extract_oecd_values(
            &[
                row("Australia", "AU1", Some(4.0), None),
                row("Australia", "AU2", None, Some(8.0)),
                row("Australia", "AU3", Some(5.0), None),
            ],
            &mapping(),
        );
        assert_relative_eq!(values["AUS"].income.unwrap(), 4.5);
        assert_relative_eq!(values["AUS"].safety.unwrap(), 8.0);
        assert_eq!(values["AUS"].jobs, None);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        let values = extract_oecd_values(
            &[
                row("Australia", "AU1", Some(4.0), None),
                row("Australia", "AU2", Some(4.05), None),
                row("Australia", "AU3", Some(4.0), None),
            ],
            &mapping(),
        );
        assert_relative_eq!(values["AUS"].income.unwrap(), 4.0);
    }

    #[test]
    fn test_unmapped_and_empty_countries_dropped() {
        let values = extract_oecd_values(
            &[
                row("Australia", "AU1", Some(4.0), None),
                row("Freedonia", "FD1", Some(9.0), None),
                row("", "XX1", Some(9.0), None),
            ],
            &mapping(),
        );
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_parse_oecd_csv_fixed_offset_and_columns() {
        let mut text = String::new();
        for i in 0..HEADER_OFFSET {
            text.push_str(&format!("preamble {i},,,,,,,,,,,,,,\n"));
        }
        text.push_str(",Australia,New South Wales,AU1,4.0,7.0,6.5,8.0,8.5,5.0,9.0,4.5,6.0,7.5,7.2\n");
        text.push_str(",Australia,,,,,,,,,,,,,\n"); // no code: skipped
        text.push_str(",Austria,Vienna,AT13,6.0,6.5,5.0,7.0,8.0,6.5,8.0,5.5,8.5,6.0,6.8\n");

        let rows = parse_oecd_csv(&text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "AU1");
        assert_relative_eq!(rows[0].scores.income.unwrap(), 4.0);
        assert_relative_eq!(rows[0].scores.life_satisfaction.unwrap(), 7.2);
        assert_eq!(rows[1].country, "Austria");
    }

    #[test]
    fn test_parse_oecd_csv_empty_is_validation_error() {
        let err = parse_oecd_csv("just,one,line\n").unwrap_err();
        assert!(matches!(err, AtlasError::Validation { .. }));
    }
}
