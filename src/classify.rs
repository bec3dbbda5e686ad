//! Choropleth classification: continuous index → discrete colored bin.
//!
//! Bins are ordered, contiguous, half-open `[min, max)` intervals; the
//! final bin is closed on both ends so the domain maximum classifies
//! instead of falling through. Nulls and out-of-domain values map to a
//! fixed no-data color.

use crate::registry::BinDefinition;

/// Fill used for regions with no value and values outside every bin.
pub const NO_DATA_COLOR: &str = "#555";

/// One materialized legend bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub min: f64,
    pub max: f64,
    pub color: String,
    pub label: &'static str,
}

/// A binned color scale over one index's domain.
#[derive(Debug, Clone)]
pub struct ColorScale {
    pub bins: Vec<Bin>,
}

impl ColorScale {
    /// Build one bin per definition, sampling the interpolator at the
    /// definition's representative point.
    pub fn new(
        interpolator: impl Fn(f64) -> String,
        bin_definitions: &'static [BinDefinition],
    ) -> Self {
        let bins = bin_definitions
            .iter()
            .map(|def| Bin {
                min: def.min,
                max: def.max,
                color: interpolator(def.sample_point),
                label: def.label,
            })
            .collect();
        ColorScale { bins }
    }

    pub fn get_color(&self, value: Option<f64>) -> &str {
        let Some(value) = value else {
            return NO_DATA_COLOR;
        };

        let last = self.bins.len().saturating_sub(1);
        for (i, bin) in self.bins.iter().enumerate() {
            let hit = if i == last {
                value >= bin.min && value <= bin.max
            } else {
                value >= bin.min && value < bin.max
            };
            if hit {
                return &bin.color;
            }
        }
        NO_DATA_COLOR
    }
}

/// The UNDP development category for an HDI value. Thresholds are the
/// report's fixed cutoffs, half-open on the upper side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HdiCategory {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl HdiCategory {
    pub fn label(self) -> &'static str {
        match self {
            HdiCategory::Low => "Low",
            HdiCategory::Medium => "Medium",
            HdiCategory::High => "High",
            HdiCategory::VeryHigh => "Very High",
        }
    }
}

pub fn classify_hdi(hdi: Option<f64>) -> Option<HdiCategory> {
    let hdi = hdi?;
    Some(if hdi < 0.550 {
        HdiCategory::Low
    } else if hdi < 0.700 {
        HdiCategory::Medium
    } else if hdi < 0.800 {
        HdiCategory::High
    } else {
        HdiCategory::VeryHigh
    })
}
