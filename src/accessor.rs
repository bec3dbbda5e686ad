//! Uniform value lookup across the three index stores.
//!
//! The stores key differently (HDI by region code, WHR and OECD BLI by
//! country ISO) and the OECD store additionally answers either a single
//! dimension or a weighted composite. `ValueAccessor` hides all of that
//! behind one `value_for` call so the choropleth renderer never
//! branches on index kind.

use crate::registry::IndexId;
use crate::schema::{Dimension, HdiValues, OecdBliValues, WhrValues};
use crate::weights::{compute_weighted_average, DimensionWeights, EQUAL_WEIGHTS};

/// Loaded values for exactly one index, tagged so the keying rule and
/// null policy travel with the data.
#[derive(Debug, Clone)]
pub enum ValueStore {
    Hdi(HdiValues),
    Whr(WhrValues),
    OecdBli(OecdBliValues),
}

impl ValueStore {
    pub fn index_id(&self) -> IndexId {
        match self {
            ValueStore::Hdi(_) => IndexId::Hdi,
            ValueStore::Whr(_) => IndexId::Whr,
            ValueStore::OecdBli(_) => IndexId::OecdBli,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ValueStore::Hdi(v) => v.len(),
            ValueStore::Whr(v) => v.len(),
            ValueStore::OecdBli(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lookup policy: which dimension (OECD only) and which weights apply
/// when no single dimension is selected.
#[derive(Debug, Clone)]
pub struct ValueAccessor {
    pub dimension: Option<Dimension>,
    pub weights: DimensionWeights,
}

impl Default for ValueAccessor {
    fn default() -> Self {
        ValueAccessor {
            dimension: None,
            weights: EQUAL_WEIGHTS,
        }
    }
}

impl ValueAccessor {
    pub fn new(dimension: Option<Dimension>, weights: Option<DimensionWeights>) -> Self {
        ValueAccessor {
            dimension,
            weights: weights.unwrap_or(EQUAL_WEIGHTS),
        }
    }

    pub fn with_dimension(dimension: Dimension) -> Self {
        ValueAccessor {
            dimension: Some(dimension),
            ..Default::default()
        }
    }

    pub fn with_weights(weights: DimensionWeights) -> Self {
        ValueAccessor {
            dimension: None,
            weights,
        }
    }

    /// The displayable value for one region, or `None` for no-data.
    ///
    /// HDI resolves by region code; WHR and OECD BLI resolve by the
    /// region's country ISO, so every region of a country shares its
    /// national value. The dimension selection only affects the OECD
    /// store.
    pub fn value_for(&self, store: &ValueStore, gdl_code: &str, country_iso: &str) -> Option<f64> {
        match store {
            ValueStore::Hdi(values) => values.get(gdl_code)?.hdi,
            ValueStore::Whr(values) => values.get(country_iso)?.score,
            ValueStore::OecdBli(values) => {
                let record = values.get(country_iso)?;
                match self.dimension {
                    Some(dimension) => record.dimension(dimension),
                    None => compute_weighted_average(record, &self.weights),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        mock_hdi_region_value, mock_oecd_bli_region_value, mock_whr_region_value, OecdBliRegionValue,
    };
    use approx::assert_relative_eq;

    fn hdi_store() -> ValueStore {
        let mut values = HdiValues::default();
        values.insert("GBRr101".to_string(), mock_hdi_region_value());
        ValueStore::Hdi(values)
    }

    fn whr_store() -> ValueStore {
        let mut values = WhrValues::default();
        values.insert("GBR".to_string(), mock_whr_region_value());
        ValueStore::Whr(values)
    }

    fn oecd_store() -> ValueStore {
        let mut values = OecdBliValues::default();
        values.insert("AUS".to_string(), mock_oecd_bli_region_value());
        ValueStore::OecdBli(values)
    }

    #[test]
    fn test_hdi_resolves_by_region_code() {
        let accessor = ValueAccessor::default();
        assert_eq!(
            accessor.value_for(&hdi_store(), "GBRr101", "GBR"),
            Some(0.729)
        );
        // Country ISO alone is not enough for the region-keyed store.
        assert_eq!(accessor.value_for(&hdi_store(), "GBRr102", "GBR"), None);
    }

    #[test]
    fn test_whr_resolves_by_country_ignoring_region() {
        let accessor = ValueAccessor::default();
        let store = whr_store();
        // Two different regions of the same country share the value.
        assert_eq!(accessor.value_for(&store, "GBRr101", "GBR"), Some(6.714));
        assert_eq!(accessor.value_for(&store, "GBRr112", "GBR"), Some(6.714));
        assert_eq!(accessor.value_for(&store, "FRAr101", "FRA"), None);
    }

    #[test]
    fn test_oecd_single_dimension_selection() {
        let accessor = ValueAccessor::with_dimension(Dimension::Safety);
        assert_eq!(
            accessor.value_for(&oecd_store(), "AUSr101", "AUS"),
            Some(9.2)
        );
    }

    #[test]
    fn test_oecd_composite_defaults_to_equal_weights() {
        let accessor = ValueAccessor::default();
        let value = accessor
            .value_for(&oecd_store(), "AUSr101", "AUS")
            .unwrap();
        let record = mock_oecd_bli_region_value();
        let expected = compute_weighted_average(&record, &EQUAL_WEIGHTS).unwrap();
        assert_relative_eq!(value, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_oecd_composite_respects_custom_weights() {
        let mut values = OecdBliValues::default();
        values.insert(
            "AUS".to_string(),
            OecdBliRegionValue {
                income: Some(2.0),
                jobs: Some(10.0),
                ..Default::default()
            },
        );
        let store = ValueStore::OecdBli(values);

        let mut weights = EQUAL_WEIGHTS;
        weights.set(Dimension::Income, 0.75);
        weights.set(Dimension::Jobs, 0.25);
        let accessor = ValueAccessor::with_weights(weights);

        let value = accessor.value_for(&store, "AUSr101", "AUS").unwrap();
        assert_relative_eq!(value, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_null_dimension_is_no_data() {
        let mut values = OecdBliValues::default();
        values.insert("AUS".to_string(), OecdBliRegionValue::default());
        let store = ValueStore::OecdBli(values);

        let accessor = ValueAccessor::with_dimension(Dimension::Income);
        assert_eq!(accessor.value_for(&store, "AUSr101", "AUS"), None);
        assert_eq!(
            ValueAccessor::default().value_for(&store, "AUSr101", "AUS"),
            None
        );
    }

    #[test]
    fn test_store_tags() {
        assert_eq!(hdi_store().index_id(), IndexId::Hdi);
        assert_eq!(whr_store().index_id(), IndexId::Whr);
        assert_eq!(oecd_store().index_id(), IndexId::OecdBli);
        assert_eq!(hdi_store().len(), 1);
    }
}
