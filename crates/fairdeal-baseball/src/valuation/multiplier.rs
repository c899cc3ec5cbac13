// Weighted performance multiplier and per-stat dollar impact decomposition.
//
// The multiplier is a weight-normalized mean of per-stat ratios, amplified
// around 1.0 and clamped. Impacts are rescaled so they sum to the realized
// AAV delta even when clamping or amplification changed it.

use serde::Serialize;

use crate::player::StatKey;
use crate::valuation::comparator::StatComparison;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Amplification applied to the raw multiplier's distance from 1.0.
pub const SENSITIVITY: f64 = 1.4;
pub const MULTIPLIER_MIN: f64 = 0.50;
pub const MULTIPLIER_MAX: f64 = 2.0;

/// Naive impact sums below this magnitude are treated as zero.
const NAIVE_SUM_EPSILON: f64 = 1e-12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Aggregate multiplier and its intermediate values.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MultiplierBreakdown {
    pub total_weight: f64,
    /// Weight-normalized mean ratio before amplification.
    pub raw: f64,
    /// `1 + (raw - 1) * SENSITIVITY`, before clamping.
    pub scaled: f64,
    /// Final multiplier applied to the baseline AAV.
    pub multiplier: f64,
}

/// One stat's share of the AAV delta.
#[derive(Debug, Clone, Serialize)]
pub struct StatImpact {
    pub key: StatKey,
    pub label: &'static str,
    pub ratio: f64,
    pub weight: f64,
    /// `weight / total_weight`.
    pub weight_share: f64,
    /// `ratio * weight / total_weight`; these sum to the raw multiplier.
    pub contribution: f64,
    /// Unscaled dollar impact `baseline * (ratio - 1) * weight / total_weight`.
    pub naive_impact: f64,
    /// Dollar impact after rescaling to the realized delta.
    pub aav_impact: f64,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Combine stat ratios into the aggregate multiplier.
///
/// With `adjust_aav` off the multiplier is exactly 1.0. A non-positive total
/// weight yields a raw multiplier of 1.0.
pub fn compute_multiplier(comparisons: &[StatComparison], adjust_aav: bool) -> MultiplierBreakdown {
    let total_weight: f64 = comparisons.iter().map(|c| c.weight).sum();
    let raw = if total_weight > 0.0 {
        comparisons.iter().map(|c| c.ratio * c.weight).sum::<f64>() / total_weight
    } else {
        1.0
    };
    let scaled = 1.0 + (raw - 1.0) * SENSITIVITY;
    let multiplier = if adjust_aav {
        scaled.clamp(MULTIPLIER_MIN, MULTIPLIER_MAX)
    } else {
        1.0
    };
    MultiplierBreakdown {
        total_weight,
        raw,
        scaled,
        multiplier,
    }
}

/// Decompose `fair_aav - baseline_aav` into per-stat dollar impacts.
///
/// Naive impacts are all scaled by one factor so that the returned
/// `aav_impact` values sum to the realized delta. When the naive impacts sum
/// to zero the factor is 1.
pub fn decompose_impacts(
    comparisons: &[StatComparison],
    baseline_aav: f64,
    fair_aav: f64,
) -> Vec<StatImpact> {
    let total_weight: f64 = comparisons.iter().map(|c| c.weight).sum();
    let share = |w: f64| if total_weight > 0.0 { w / total_weight } else { 0.0 };

    let naive: Vec<f64> = comparisons
        .iter()
        .map(|c| baseline_aav * (c.ratio - 1.0) * share(c.weight))
        .collect();
    let naive_sum: f64 = naive.iter().sum();
    let real_delta = fair_aav - baseline_aav;
    let scale = if naive_sum.abs() > NAIVE_SUM_EPSILON {
        real_delta / naive_sum
    } else {
        1.0
    };

    comparisons
        .iter()
        .zip(naive)
        .map(|(c, naive_impact)| StatImpact {
            key: c.key,
            label: c.label,
            ratio: c.ratio,
            weight: c.weight,
            weight_share: share(c.weight),
            contribution: c.ratio * share(c.weight),
            naive_impact,
            aav_impact: naive_impact * scale,
        })
        .collect()
}

/// Sort impacts by descending absolute dollar impact.
pub fn sort_by_magnitude(impacts: &mut [StatImpact]) {
    impacts.sort_by(|a, b| {
        b.aav_impact
            .abs()
            .partial_cmp(&a.aav_impact.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
