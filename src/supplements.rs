//! Manually curated region overrides.
//!
//! Three regions are null or wrong in the primary source even though
//! real-world data exists from a named secondary source: Taiwan and
//! Hong Kong are absent from the GDL table under their Chinese region
//! codes, and San Marino ships without values. Application is a full
//! replacement of the matched region's properties, not a field merge.

use crate::join::{JoinedRegion, RegionProperties};
use crate::parse::RegionLevel;

const DEFAULT_SOURCE: &str = "GDL SHDI v8.3";

/// One curated override: corrected identity and composite value, plus
/// the provenance of the correction.
#[derive(Debug, Clone)]
pub struct RegionSupplement {
    pub gdl_code: &'static str,
    pub source: &'static str,
    pub properties: RegionProperties,
}

fn supplement(
    gdl_code: &'static str,
    source: &'static str,
    name: &str,
    country_iso: &str,
    hdi: Option<f64>,
    year: i32,
    centroid: (f64, f64),
) -> RegionSupplement {
    RegionSupplement {
        gdl_code,
        source,
        properties: RegionProperties {
            gdl_code: gdl_code.to_string(),
            name: name.to_string(),
            country: name.to_string(),
            country_iso: country_iso.to_string(),
            level: RegionLevel::National,
            year,
            hdi,
            education_index: None,
            health_index: None,
            income_index: None,
            centroid,
        },
    }
}

/// The static override table, in application order.
pub fn region_supplements() -> Vec<RegionSupplement> {
    vec![
        supplement(
            "CHNr133",
            "DGBAS (Taiwan)",
            "Taiwan",
            "TWN",
            Some(0.926),
            2022,
            (120.960, 23.697),
        ),
        supplement(
            "CHNr132",
            "UNDP HDR",
            "Hong Kong",
            "HKG",
            Some(0.956),
            2022,
            (114.134, 22.384),
        ),
        supplement(
            "SMRt",
            "UNDP HDR",
            "San Marino",
            "SMR",
            Some(0.867),
            2022,
            (12.461, 43.939),
        ),
    ]
}

/// Replace the properties of every joined region the table names.
/// Regions the table does not name are untouched.
pub fn apply_supplements(regions: &mut [JoinedRegion]) {
    for entry in region_supplements() {
        if let Some(region) = regions
            .iter_mut()
            .find(|r| r.properties.gdl_code == entry.gdl_code)
        {
            region.properties = entry.properties;
        }
    }
}

/// Provenance string for a region code: the supplement's source when
/// overridden, the primary source otherwise.
pub fn source_of(gdl_code: &str) -> &'static str {
    region_supplements()
        .iter()
        .find(|s| s.gdl_code == gdl_code)
        .map(|s| s.source)
        .unwrap_or(DEFAULT_SOURCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::{Geometry, Value};

    fn joined(code: &str, name: &str) -> JoinedRegion {
        JoinedRegion {
            properties: RegionProperties {
                gdl_code: code.to_string(),
                name: name.to_string(),
                country: "China".to_string(),
                country_iso: "CHN".to_string(),
                level: RegionLevel::Subnational,
                year: 0,
                hdi: None,
                education_index: Some(0.5),
                health_index: None,
                income_index: None,
                centroid: (0.0, 0.0),
            },
            geometry: Geometry::new(Value::Point(vec![0.0, 0.0])),
        }
    }

    #[test]
    fn test_replacement_is_total_not_a_merge() {
        let mut regions = vec![joined("CHNr133", "CHNr133")];
        apply_supplements(&mut regions);

        let props = &regions[0].properties;
        assert_eq!(props.name, "Taiwan");
        assert_eq!(props.country_iso, "TWN");
        assert_eq!(props.level, RegionLevel::National);
        assert_eq!(props.hdi, Some(0.926));
        // The old education value does not survive the replacement.
        assert_eq!(props.education_index, None);
        assert_eq!(props.centroid, (120.960, 23.697));
    }

    #[test]
    fn test_unlisted_regions_untouched() {
        let mut regions = vec![joined("CHNr101", "Beijing")];
        let before = regions[0].properties.clone();
        apply_supplements(&mut regions);
        assert_eq!(regions[0].properties, before);
    }

    #[test]
    fn test_source_lookup() {
        assert_eq!(source_of("CHNr133"), "DGBAS (Taiwan)");
        assert_eq!(source_of("CHNr132"), "UNDP HDR");
        assert_eq!(source_of("SMRt"), "UNDP HDR");
        assert_eq!(source_of("GBRr101"), "GDL SHDI v8.3");
    }

    #[test]
    fn test_geometry_is_preserved() {
        let mut regions = vec![joined("SMRt", "SMRt")];
        let geometry_before = regions[0].geometry.clone();
        apply_supplements(&mut regions);
        assert_eq!(regions[0].geometry, geometry_before);
    }
}
