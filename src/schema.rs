//! Value-store record shapes and their load-time contracts.
//!
//! The three indices evolved independently and keep independent record
//! shapes on purpose: HDI is region-keyed with a filter-out null policy,
//! WHR is country-keyed with pass-through nulls, and OECD BLI is
//! country-keyed with eleven independently-nullable dimension scores.
//! Modelling them as separate types keeps those null-handling rules from
//! bleeding into each other.
//!
//! `validate_*` enforce the range contracts at load time. An HDI outside
//! [0, 1] or a BLI score outside [0, 10] is a fatal `Validation` error,
//! never a silent clamp.

use crate::error::AtlasError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Region-keyed HDI values: gdl_code → record.
pub type HdiValues = FxHashMap<String, HdiRegionValue>;
/// Country-keyed happiness values: ISO-3 → record.
pub type WhrValues = FxHashMap<String, WhrRegionValue>;
/// Country-keyed well-being values: ISO-3 → record.
pub type OecdBliValues = FxHashMap<String, OecdBliRegionValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HdiRegionValue {
    pub hdi: Option<f64>,
    pub education_index: Option<f64>,
    pub health_index: Option<f64>,
    pub income_index: Option<f64>,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhrRegionValue {
    /// Life evaluation (3-year average), [0, 10] when present.
    pub score: Option<f64>,
    pub gdp_per_capita: Option<f64>,
    pub social_support: Option<f64>,
    pub life_expectancy: Option<f64>,
    pub freedom: Option<f64>,
    pub generosity: Option<f64>,
    pub corruption: Option<f64>,
    pub year: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OecdBliRegionValue {
    pub income: Option<f64>,
    pub jobs: Option<f64>,
    pub housing: Option<f64>,
    pub education: Option<f64>,
    pub health: Option<f64>,
    pub environment: Option<f64>,
    pub safety: Option<f64>,
    pub civic_engagement: Option<f64>,
    pub access_to_services: Option<f64>,
    pub community: Option<f64>,
    pub life_satisfaction: Option<f64>,
}

/// The eleven OECD Better Life dimensions, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Income,
    Jobs,
    Housing,
    Education,
    Health,
    Environment,
    Safety,
    CivicEngagement,
    AccessToServices,
    Community,
    LifeSatisfaction,
}

impl Dimension {
    pub const ALL: [Dimension; 11] = [
        Dimension::Income,
        Dimension::Jobs,
        Dimension::Housing,
        Dimension::Education,
        Dimension::Health,
        Dimension::Environment,
        Dimension::Safety,
        Dimension::CivicEngagement,
        Dimension::AccessToServices,
        Dimension::Community,
        Dimension::LifeSatisfaction,
    ];

    /// Stable kebab-case id used in URLs and the dimension picker.
    pub fn id(self) -> &'static str {
        match self {
            Dimension::Income => "income",
            Dimension::Jobs => "jobs",
            Dimension::Housing => "housing",
            Dimension::Education => "education",
            Dimension::Health => "health",
            Dimension::Environment => "environment",
            Dimension::Safety => "safety",
            Dimension::CivicEngagement => "civic-engagement",
            Dimension::AccessToServices => "accessibility-to-services",
            Dimension::Community => "community",
            Dimension::LifeSatisfaction => "life-satisfaction",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Income => "Income",
            Dimension::Jobs => "Jobs",
            Dimension::Housing => "Housing",
            Dimension::Education => "Education",
            Dimension::Health => "Health",
            Dimension::Environment => "Environment",
            Dimension::Safety => "Safety",
            Dimension::CivicEngagement => "Civic Engagement",
            Dimension::AccessToServices => "Accessibility to Services",
            Dimension::Community => "Community",
            Dimension::LifeSatisfaction => "Life Satisfaction",
        }
    }

    pub fn parse(id: &str) -> Result<Self, AtlasError> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.id() == id)
            .ok_or_else(|| AtlasError::validation("dimension id", format!("unknown id `{id}`")))
    }
}

impl OecdBliRegionValue {
    pub fn dimension(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::Income => self.income,
            Dimension::Jobs => self.jobs,
            Dimension::Housing => self.housing,
            Dimension::Education => self.education,
            Dimension::Health => self.health,
            Dimension::Environment => self.environment,
            Dimension::Safety => self.safety,
            Dimension::CivicEngagement => self.civic_engagement,
            Dimension::AccessToServices => self.access_to_services,
            Dimension::Community => self.community,
            Dimension::LifeSatisfaction => self.life_satisfaction,
        }
    }

    pub fn set_dimension(&mut self, dimension: Dimension, value: Option<f64>) {
        match dimension {
            Dimension::Income => self.income = value,
            Dimension::Jobs => self.jobs = value,
            Dimension::Housing => self.housing = value,
            Dimension::Education => self.education = value,
            Dimension::Health => self.health = value,
            Dimension::Environment => self.environment = value,
            Dimension::Safety => self.safety = value,
            Dimension::CivicEngagement => self.civic_engagement = value,
            Dimension::AccessToServices => self.access_to_services = value,
            Dimension::Community => self.community = value,
            Dimension::LifeSatisfaction => self.life_satisfaction = value,
        }
    }
}

fn check_range(
    what: &str,
    key: &str,
    field: &str,
    value: Option<f64>,
    min: f64,
    max: f64,
) -> Result<(), AtlasError> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(AtlasError::validation(
            what.to_string(),
            format!("{key}.{field} = {v} outside [{min}, {max}]"),
        )),
        _ => Ok(()),
    }
}

pub fn validate_hdi_values(values: &HdiValues) -> Result<(), AtlasError> {
    for (code, v) in values {
        check_range("hdi values", code, "hdi", v.hdi, 0.0, 1.0)?;
        check_range("hdi values", code, "educationIndex", v.education_index, 0.0, 1.0)?;
        check_range("hdi values", code, "healthIndex", v.health_index, 0.0, 1.0)?;
        check_range("hdi values", code, "incomeIndex", v.income_index, 0.0, 1.0)?;
    }
    Ok(())
}

pub fn validate_whr_values(values: &WhrValues) -> Result<(), AtlasError> {
    for (iso, v) in values {
        check_range("whr values", iso, "score", v.score, 0.0, 10.0)?;
    }
    Ok(())
}

pub fn validate_oecd_bli_values(values: &OecdBliValues) -> Result<(), AtlasError> {
    for (iso, v) in values {
        for dimension in Dimension::ALL {
            check_range(
                "oecd-bli values",
                iso,
                dimension.id(),
                v.dimension(dimension),
                0.0,
                10.0,
            )?;
        }
    }
    Ok(())
}

/// Test fixture with realistic HDI sub-component values.
pub fn mock_hdi_region_value() -> HdiRegionValue {
    HdiRegionValue {
        hdi: Some(0.729),
        education_index: Some(0.630),
        health_index: Some(0.837),
        income_index: Some(0.735),
        year: 2022,
    }
}

/// Test fixture with realistic happiness-report values.
pub fn mock_whr_region_value() -> WhrRegionValue {
    WhrRegionValue {
        score: Some(6.714),
        gdp_per_capita: Some(10.534),
        social_support: Some(0.812),
        life_expectancy: Some(65.1),
        freedom: Some(0.789),
        generosity: Some(0.112),
        corruption: Some(0.745),
        year: 2024,
    }
}

/// Test fixture with all eleven dimensions populated.
pub fn mock_oecd_bli_region_value() -> OecdBliRegionValue {
    OecdBliRegionValue {
        income: Some(8.5),
        jobs: Some(7.8),
        housing: Some(6.2),
        education: Some(7.9),
        health: Some(8.3),
        environment: Some(5.1),
        safety: Some(9.2),
        civic_engagement: Some(4.3),
        access_to_services: Some(6.8),
        community: Some(7.5),
        life_satisfaction: Some(7.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hdi_range_contract() {
        let mut values = HdiValues::default();
        values.insert("GBRr101".to_string(), mock_hdi_region_value());
        assert!(validate_hdi_values(&values).is_ok());

        values.get_mut("GBRr101").unwrap().hdi = Some(1.2);
        let err = validate_hdi_values(&values).unwrap_err();
        assert!(matches!(err, AtlasError::Validation { .. }));
    }

    #[test]
    fn test_null_values_pass_validation() {
        let mut values = HdiValues::default();
        values.insert(
            "AFGr101".to_string(),
            HdiRegionValue {
                hdi: None,
                education_index: None,
                health_index: None,
                income_index: None,
                year: 0,
            },
        );
        assert!(validate_hdi_values(&values).is_ok());
    }

    #[test]
    fn test_oecd_range_contract_checks_every_dimension() {
        let mut values = OecdBliValues::default();
        let mut record = mock_oecd_bli_region_value();
        record.community = Some(10.5);
        values.insert("AUS".to_string(), record);
        let err = validate_oecd_bli_values(&values).unwrap_err();
        assert!(err.to_string().contains("community"));
    }

    #[test]
    fn test_whr_score_range_contract() {
        let mut values = WhrValues::default();
        let mut record = mock_whr_region_value();
        record.score = Some(-0.1);
        values.insert("FIN".to_string(), record);
        assert!(validate_whr_values(&values).is_err());
    }

    #[test]
    fn test_dimension_id_round_trip() {
        for dimension in Dimension::ALL {
            assert_eq!(Dimension::parse(dimension.id()).unwrap(), dimension);
        }
        assert!(Dimension::parse("not-a-dimension").is_err());
    }

    #[test]
    fn test_value_record_serde_uses_camel_case() {
        let json = serde_json::to_string(&mock_oecd_bli_region_value()).unwrap();
        assert!(json.contains("\"civicEngagement\""));
        assert!(json.contains("\"accessToServices\""));
        assert!(json.contains("\"lifeSatisfaction\""));
    }
}
