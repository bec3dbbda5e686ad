//! Geometry-to-record join with data-quality auditing.
//!
//! Joins boundary geometries against deduplicated SHDI records by region
//! code, computes a rounded centroid per geometry, and reports match
//! quality. A match rate below the configured minimum is a hard failure:
//! silently shipping a map with a collapsed join is worse than failing
//! the build.

use crate::error::AtlasError;
use crate::parse::{RegionLevel, ShdiRecord};
use geojson::{GeoJson, Geometry, Value};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// One boundary geometry with its raw identity block. Read-only input;
/// the join never mutates it.
#[derive(Debug, Clone)]
pub struct GeoFeature {
    pub gdl_code: String,
    pub continent: String,
    /// ISO-3 country code carried by the geometry itself, used as the
    /// fallback identity when no record matches.
    pub iso_code: String,
    pub geometry: Geometry,
}

/// Normalized per-region properties carried by the joined output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionProperties {
    pub gdl_code: String,
    pub name: String,
    pub country: String,
    pub country_iso: String,
    pub level: RegionLevel,
    pub year: i32,
    pub hdi: Option<f64>,
    pub education_index: Option<f64>,
    pub health_index: Option<f64>,
    pub income_index: Option<f64>,
    /// (longitude, latitude), each rounded to 3 decimal places.
    pub centroid: (f64, f64),
}

#[derive(Debug, Clone)]
pub struct JoinedRegion {
    pub properties: RegionProperties,
    pub geometry: Geometry,
}

/// Derived audit of one join pass. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinReport {
    pub matched: usize,
    /// Record keys never matched by any geometry.
    pub csv_only: Vec<String>,
    /// Geometry keys with no corresponding record.
    pub geo_only: Vec<String>,
    /// matched / total geometries; 0 when there are no geometries.
    pub match_rate: f64,
}

#[derive(Debug)]
pub struct JoinOutput {
    pub joined: Vec<JoinedRegion>,
    pub report: JoinReport,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn ring_area_and_centroid(ring: &[Vec<f64>]) -> (f64, f64, f64) {
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..ring.len() {
        let p = &ring[i];
        let q = &ring[(i + 1) % ring.len()];
        let cross = p[0] * q[1] - q[0] * p[1];
        area2 += cross;
        cx += (p[0] + q[0]) * cross;
        cy += (p[1] + q[1]) * cross;
    }
    if area2.abs() < f64::EPSILON {
        return (0.0, 0.0, 0.0);
    }
    (area2 / 2.0, cx / (3.0 * area2), cy / (3.0 * area2))
}

fn positions_mean(positions: impl Iterator<Item = (f64, f64)>) -> (f64, f64) {
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut n = 0usize;
    for (x, y) in positions {
        sx += x;
        sy += y;
        n += 1;
    }
    if n == 0 {
        (0.0, 0.0)
    } else {
        (sx / n as f64, sy / n as f64)
    }
}

fn polygon_centroid(rings: &[Vec<Vec<f64>>]) -> Option<(f64, f64, f64)> {
    // The exterior ring dominates; holes are ignored, which is accurate
    // enough for a 3-decimal label anchor.
    let exterior = rings.first()?;
    let (area, cx, cy) = ring_area_and_centroid(exterior);
    if area.abs() < f64::EPSILON {
        return None;
    }
    Some((area.abs(), cx, cy))
}

/// Centroid of a geometry, rounded to 3 decimal places.
///
/// Polygons use the area-weighted planar centroid of their exterior
/// rings; degenerate and non-areal geometries fall back to the mean of
/// their positions.
pub fn compute_centroid(geometry: &Geometry) -> (f64, f64) {
    let raw = match &geometry.value {
        Value::Point(p) => (p[0], p[1]),
        Value::Polygon(rings) => match polygon_centroid(rings) {
            Some((_, cx, cy)) => (cx, cy),
            None => positions_mean(rings.iter().flatten().map(|p| (p[0], p[1]))),
        },
        Value::MultiPolygon(polygons) => {
            let parts: Vec<(f64, f64, f64)> = polygons
                .iter()
                .filter_map(|rings| polygon_centroid(rings))
                .collect();
            let total: f64 = parts.iter().map(|(w, _, _)| w).sum();
            if parts.is_empty() || total < f64::EPSILON {
                positions_mean(polygons.iter().flatten().flatten().map(|p| (p[0], p[1])))
            } else {
                (
                    parts.iter().map(|(w, cx, _)| w * cx).sum::<f64>() / total,
                    parts.iter().map(|(w, _, cy)| w * cy).sum::<f64>() / total,
                )
            }
        }
        Value::MultiPoint(points) | Value::LineString(points) => {
            positions_mean(points.iter().map(|p| (p[0], p[1])))
        }
        Value::MultiLineString(lines) => {
            positions_mean(lines.iter().flatten().map(|p| (p[0], p[1])))
        }
        Value::GeometryCollection(geometries) => {
            let centroids: Vec<(f64, f64)> =
                geometries.iter().map(compute_centroid).collect();
            positions_mean(centroids.into_iter())
        }
    };
    (round3(raw.0), round3(raw.1))
}

/// Fallback level inference for geometry-only regions: national totals
/// carry a trailing literal `t` in their code.
fn level_from_code(gdl_code: &str) -> RegionLevel {
    if gdl_code.ends_with('t') {
        RegionLevel::National
    } else {
        RegionLevel::Subnational
    }
}

fn matched_properties(record: &ShdiRecord, centroid: (f64, f64)) -> RegionProperties {
    RegionProperties {
        gdl_code: record.gdl_code.clone(),
        name: record.name.clone(),
        country: record.country.clone(),
        country_iso: record.country_iso.clone(),
        level: record.level,
        year: record.year,
        hdi: record.hdi,
        education_index: record.education_index,
        health_index: record.health_index,
        income_index: record.income_index,
        centroid,
    }
}

fn unmatched_properties(feature: &GeoFeature, centroid: (f64, f64)) -> RegionProperties {
    RegionProperties {
        gdl_code: feature.gdl_code.clone(),
        name: feature.gdl_code.clone(),
        country: String::new(),
        country_iso: feature.iso_code.clone(),
        level: level_from_code(&feature.gdl_code),
        year: 0,
        hdi: None,
        education_index: None,
        health_index: None,
        income_index: None,
        centroid,
    }
}

/// Join geometries against records by region code.
///
/// Every geometry produces exactly one joined region: matched ones carry
/// the record's descriptive fields, unmatched ones derive a synthetic
/// fallback identity. When `min_match_rate` is supplied and the computed
/// rate is strictly below it, the whole operation fails.
pub fn join_regions(
    features: &[GeoFeature],
    records: &[ShdiRecord],
    min_match_rate: Option<f64>,
) -> Result<JoinOutput, AtlasError> {
    let records_by_code: FxHashMap<&str, &ShdiRecord> = records
        .iter()
        .map(|r| (r.gdl_code.as_str(), r))
        .collect();

    let mut matched_codes: FxHashSet<&str> = FxHashSet::default();
    let mut geo_only: Vec<String> = Vec::new();
    let mut joined: Vec<JoinedRegion> = Vec::with_capacity(features.len());

    for feature in features {
        let centroid = compute_centroid(&feature.geometry);
        let properties = match records_by_code.get(feature.gdl_code.as_str()) {
            Some(record) => {
                matched_codes.insert(record.gdl_code.as_str());
                matched_properties(record, centroid)
            }
            None => {
                geo_only.push(feature.gdl_code.clone());
                unmatched_properties(feature, centroid)
            }
        };
        joined.push(JoinedRegion {
            properties,
            geometry: feature.geometry.clone(),
        });
    }

    let csv_only: Vec<String> = records
        .iter()
        .filter(|r| !matched_codes.contains(r.gdl_code.as_str()))
        .map(|r| r.gdl_code.clone())
        .collect();

    let match_rate = if features.is_empty() {
        0.0
    } else {
        matched_codes.len() as f64 / features.len() as f64
    };

    if let Some(min) = min_match_rate {
        if match_rate < min {
            return Err(AtlasError::JoinQuality {
                match_rate,
                min_match_rate: min,
            });
        }
    }

    Ok(JoinOutput {
        joined,
        report: JoinReport {
            matched: matched_codes.len(),
            csv_only,
            geo_only,
            match_rate,
        },
    })
}

fn property_string(properties: Option<&geojson::JsonObject>, keys: &[&str]) -> String {
    let Some(props) = properties else {
        return String::new();
    };
    keys.iter()
        .find_map(|k| props.get(*k).and_then(|v| v.as_str()))
        .unwrap_or("")
        .to_string()
}

/// Parse a GeoJSON FeatureCollection into raw geo features.
///
/// The collection is the single top-level object; each feature carries a
/// `gdlcode` (legacy exports use `GDLcode`), a continent and an
/// `iso_code` property. A feature without geometry is structurally
/// unusable and fails the whole document.
pub fn parse_geo_features(text: &str) -> Result<Vec<GeoFeature>, AtlasError> {
    let geojson: GeoJson = text.parse().map_err(|e| AtlasError::MalformedInput {
        what: "boundary geometry".to_string(),
        message: format!("not valid GeoJSON: {e}"),
    })?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(AtlasError::MalformedInput {
            what: "boundary geometry".to_string(),
            message: "expected a FeatureCollection at the top level".to_string(),
        });
    };

    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| {
            let geometry = feature.geometry.ok_or_else(|| AtlasError::MalformedInput {
                what: "boundary geometry".to_string(),
                message: format!("feature {i} has no geometry"),
            })?;
            let properties = feature.properties.as_ref();
            Ok(GeoFeature {
                gdl_code: property_string(properties, &["gdlcode", "GDLcode"]),
                continent: property_string(properties, &["continent"]),
                iso_code: property_string(properties, &["iso_code"]),
                geometry,
            })
        })
        .collect()
}
