//! Weighted-composite scoring over the eleven well-being dimensions.
//!
//! Two weight representations exist and are converted only at the
//! boundary: fractional (sum 1.0, used by the scoring engine) and
//! percentage (sum 100, used by interactive weight tuning). Conflating
//! the two is a real bug source, so the conversions carry names.
//!
//! Missing dimensions are skipped and the surviving weights renormalized
//! before summing. That renormalization is required correctness: a
//! country missing 6 of 11 dimensions must still produce a meaningful
//! 0-10 average over its present 5, not a value depressed by implicit
//! zero-weighting of the missing ones.

use crate::schema::{Dimension, OecdBliRegionValue};

/// Eleven named non-negative weights, indexed in `Dimension::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionWeights([f64; 11]);

const WEIGHT_PER_DIMENSION: f64 = 1.0 / 11.0;

/// Fractional equal weighting, the scoring default.
pub const EQUAL_WEIGHTS: DimensionWeights = DimensionWeights([WEIGHT_PER_DIMENSION; 11]);

impl DimensionWeights {
    pub fn new(weights: [f64; 11]) -> Self {
        DimensionWeights(weights)
    }

    /// Uniform weights in percentage form (100/11 each).
    pub fn equal_percentages() -> Self {
        DimensionWeights([100.0 / 11.0; 11])
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        self.0[Self::position(dimension)]
    }

    pub fn set(&mut self, dimension: Dimension, weight: f64) {
        self.0[Self::position(dimension)] = weight;
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    fn position(dimension: Dimension) -> usize {
        Dimension::ALL
            .iter()
            .position(|d| *d == dimension)
            .expect("dimension is always present in ALL")
    }
}

/// Rescale weights so they sum to 1.0, preserving proportions.
pub fn normalize_weights(weights: &DimensionWeights) -> DimensionWeights {
    let total = weights.total();
    DimensionWeights(weights.0.map(|w| w / total))
}

/// Fractional → percentage form (sum 100).
pub fn to_percentages(weights: &DimensionWeights) -> DimensionWeights {
    let total = weights.total();
    DimensionWeights(weights.0.map(|w| w / total * 100.0))
}

/// Percentage → fractional form (sum 1.0).
pub fn from_percentages(weights: &DimensionWeights) -> DimensionWeights {
    normalize_weights(weights)
}

/// Composite score under a weight vector, skipping null dimensions.
///
/// Returns `None` when every dimension is null. Otherwise the surviving
/// weights are renormalized to sum 1 and the weighted sum returned.
pub fn compute_weighted_average(
    values: &OecdBliRegionValue,
    weights: &DimensionWeights,
) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = Dimension::ALL
        .into_iter()
        .filter_map(|d| values.dimension(d).map(|v| (v, weights.get(d))))
        .collect();

    if pairs.is_empty() {
        return None;
    }

    let total_weight: f64 = pairs.iter().map(|(_, w)| w).sum();
    Some(
        pairs
            .iter()
            .map(|(v, w)| v * (w / total_weight))
            .sum(),
    )
}

/// Absorb an interactive change to one weight.
///
/// `current` may arrive in fractional or percentage form; it is brought
/// to percentages first, and the result is always percentage form.
/// Sets `changed` to `new_percentage` and scales every other weight by
/// `(100 - new) / (100 - old)` so the total stays at 100 while each
/// surviving weight keeps its relative proportion to the others. When
/// the others held no mass at all (prior state had everything on
/// `changed`), the remainder splits evenly among them instead of
/// staying stuck at zero.
pub fn redistribute_weights(
    current: &DimensionWeights,
    changed: Dimension,
    new_percentage: f64,
) -> DimensionWeights {
    let new_percentage = new_percentage.clamp(0.0, 100.0);
    let current = if current.total() > f64::EPSILON {
        to_percentages(current)
    } else {
        // No mass anywhere: no proportions to preserve.
        DimensionWeights::equal_percentages()
    };
    let old_percentage = current.get(changed);
    let remaining_new = 100.0 - new_percentage;
    let remaining_old = 100.0 - old_percentage;

    let mut result = current;
    result.set(changed, new_percentage);

    if remaining_old > f64::EPSILON {
        let factor = remaining_new / remaining_old;
        for dimension in Dimension::ALL {
            if dimension != changed {
                result.set(dimension, current.get(dimension) * factor);
            }
        }
    } else {
        // Degenerate prior state: all other weights were zero.
        let share = remaining_new / 10.0;
        for dimension in Dimension::ALL {
            if dimension != changed {
                result.set(dimension, share);
            }
        }
    }

    result
}
