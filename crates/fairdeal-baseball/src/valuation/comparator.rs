// Per-stat comparison of a subject against the cohort profile: signed
// delta, bounded percentage differential and bounded ratio.

use serde::Serialize;

use crate::player::{Player, StatKey, StatWindow};
use crate::stats::{descriptors, StatDescriptor, StatWeights};
use crate::valuation::cohort::CohortSummary;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Cohort values with magnitude below this are treated as zero.
pub const ZERO_EPSILON: f64 = 0.001;
/// Percentage differential bound, in percent.
pub const PCT_DIFF_LIMIT: f64 = 500.0;
/// Ratio bounds for higher/lower-is-better stats.
pub const RATIO_MIN: f64 = 0.1;
pub const RATIO_MAX: f64 = 10.0;
/// Ratios used when the cohort value is zero.
pub const ZERO_COHORT_POSITIVE_RATIO: f64 = 1.1;
pub const ZERO_COHORT_NEGATIVE_RATIO: f64 = 0.9;
/// Typical spread of a signed run metric; one full range moves the ratio by
/// `SIGNED_RANGE_STEP`.
pub const SIGNED_TYPICAL_RANGE: f64 = 10.0;
pub const SIGNED_RANGE_STEP: f64 = 0.2;
pub const SIGNED_RATIO_MIN: f64 = 0.5;
pub const SIGNED_RATIO_MAX: f64 = 2.0;

// ---------------------------------------------------------------------------
// StatComparison
// ---------------------------------------------------------------------------

/// Subject vs. cohort for one statistic.
#[derive(Debug, Clone, Serialize)]
pub struct StatComparison {
    pub key: StatKey,
    pub label: &'static str,
    pub higher_is_better: bool,
    pub subject_value: f64,
    pub cohort_value: f64,
    pub delta: f64,
    pub pct_diff: f64,
    pub ratio: f64,
    pub weight: f64,
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// Percentage difference of `delta` relative to `cohort`, bounded to ±500%.
pub fn pct_diff(delta: f64, cohort: f64) -> f64 {
    if cohort.abs() < ZERO_EPSILON {
        let magnitude = (delta * 100.0).abs().min(PCT_DIFF_LIMIT);
        if delta > 0.0 {
            magnitude
        } else if delta < 0.0 {
            -magnitude
        } else {
            0.0
        }
    } else {
        (delta / cohort.abs() * 100.0).clamp(-PCT_DIFF_LIMIT, PCT_DIFF_LIMIT)
    }
}

/// Ratio of `numerator` over `denominator` with the zero-denominator guard.
fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() < ZERO_EPSILON {
        if numerator > 0.0 {
            ZERO_COHORT_POSITIVE_RATIO
        } else if numerator < 0.0 {
            ZERO_COHORT_NEGATIVE_RATIO
        } else {
            1.0
        }
    } else {
        (numerator / denominator).clamp(RATIO_MIN, RATIO_MAX)
    }
}

/// Performance ratio of subject over cohort for one descriptor.
///
/// Signed run metrics are scored additively on the delta; other stats use
/// subject/cohort (or cohort/subject when lower is better).
pub fn stat_ratio(descriptor: &StatDescriptor, subject: f64, cohort: f64) -> f64 {
    if descriptor.is_signed_runs() {
        let delta = subject - cohort;
        (1.0 + (delta / SIGNED_TYPICAL_RANGE) * SIGNED_RANGE_STEP)
            .clamp(SIGNED_RATIO_MIN, SIGNED_RATIO_MAX)
    } else if descriptor.higher_is_better {
        guarded_ratio(subject, cohort)
    } else {
        guarded_ratio(cohort, subject)
    }
}

/// Compare the subject against the cohort for every stat of its type.
pub fn compare(
    subject: &Player,
    window: StatWindow,
    cohort: &CohortSummary,
    weights: &StatWeights,
) -> Vec<StatComparison> {
    descriptors(subject.player_type())
        .iter()
        .map(|d| {
            let subject_value = subject.subject_value(d.key, window);
            let cohort_value = cohort.stat(d.key);
            let delta = subject_value - cohort_value;
            StatComparison {
                key: d.key,
                label: d.label,
                higher_is_better: d.higher_is_better,
                subject_value,
                cohort_value,
                delta,
                pct_diff: pct_diff(delta, cohort_value),
                ratio: stat_ratio(d, subject_value, cohort_value),
                weight: weights.get(d.key),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{HitterStat, PitcherStat};
    use crate::stats::descriptor;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn desc(key: StatKey) -> &'static StatDescriptor {
        descriptor(key).unwrap()
    }

    // ---- pct_diff ----

    #[test]
    fn pct_diff_relative_to_cohort_magnitude() {
        assert!(approx_eq(pct_diff(20.0, 100.0), 20.0, 1e-12));
        // Negative cohort uses the absolute value as the base.
        assert!(approx_eq(pct_diff(2.0, -4.0), 50.0, 1e-12));
    }

    #[test]
    fn pct_diff_clamped() {
        assert_eq!(pct_diff(100.0, 1.0), 500.0);
        assert_eq!(pct_diff(-100.0, 1.0), -500.0);
    }

    #[test]
    fn pct_diff_zero_cohort() {
        assert!(approx_eq(pct_diff(0.5, 0.0), 50.0, 1e-12));
        assert!(approx_eq(pct_diff(-0.5, 0.0005), -50.0, 1e-12));
        assert_eq!(pct_diff(12.0, 0.0), 500.0);
        assert_eq!(pct_diff(0.0, 0.0), 0.0);
    }

    // ---- ratios ----

    #[test]
    fn higher_is_better_ratio() {
        let war = desc(StatKey::Hitter(HitterStat::War));
        assert!(approx_eq(stat_ratio(war, 6.0, 4.0), 1.5, 1e-12));
        assert_eq!(stat_ratio(war, 100.0, 1.0), RATIO_MAX);
        assert_eq!(stat_ratio(war, 0.01, 1.0), RATIO_MIN);
    }

    #[test]
    fn lower_is_better_ratio_is_inverted() {
        let era = desc(StatKey::Pitcher(PitcherStat::Era));
        assert!(approx_eq(stat_ratio(era, 3.0, 4.5), 1.5, 1e-12));
        assert!(approx_eq(stat_ratio(era, 4.5, 3.0), 3.0 / 4.5, 1e-12));
    }

    #[test]
    fn lower_is_better_zero_subject_guarded() {
        let era = desc(StatKey::Pitcher(PitcherStat::Era));
        assert_eq!(stat_ratio(era, 0.0, 4.0), ZERO_COHORT_POSITIVE_RATIO);
        assert_eq!(stat_ratio(era, 0.0, 0.0), 1.0);
    }

    #[test]
    fn zero_cohort_ratios() {
        let war = desc(StatKey::Hitter(HitterStat::War));
        assert_eq!(stat_ratio(war, 2.0, 0.0), 1.1);
        assert_eq!(stat_ratio(war, -1.0, 0.0), 0.9);
        assert_eq!(stat_ratio(war, 0.0, 0.0), 1.0);
    }

    #[test]
    fn signed_runs_ratio_scaled_by_typical_range() {
        let def = desc(StatKey::Hitter(HitterStat::DefRuns));
        // +10 runs over the cohort is +20%.
        assert!(approx_eq(stat_ratio(def, 5.0, -5.0), 1.2, 1e-12));
        assert!(approx_eq(stat_ratio(def, -5.0, 0.0), 0.9, 1e-12));
        assert_eq!(stat_ratio(def, 100.0, 0.0), SIGNED_RATIO_MAX);
        assert_eq!(stat_ratio(def, -100.0, 0.0), SIGNED_RATIO_MIN);
    }

    #[test]
    fn signed_runs_ignore_zero_cohort_guard() {
        let bsr = desc(StatKey::Hitter(HitterStat::BsrRuns));
        assert!(approx_eq(stat_ratio(bsr, 2.5, 0.0), 1.05, 1e-12));
    }

    #[test]
    fn ratio_bounds_hold_over_a_grid() {
        let values = [-50.0, -3.0, -0.0005, 0.0, 0.0005, 0.2, 1.0, 4.0, 120.0, 1e6];
        for d in crate::stats::HITTER_STATS.iter().chain(crate::stats::PITCHER_STATS) {
            for &s in &values {
                for &c in &values {
                    let r = stat_ratio(d, s, c);
                    if d.is_signed_runs() {
                        assert!((SIGNED_RATIO_MIN..=SIGNED_RATIO_MAX).contains(&r));
                    } else {
                        assert!((RATIO_MIN..=RATIO_MAX).contains(&r), "{} {s} {c} -> {r}", d.label);
                    }
                    let p = pct_diff(s - c, c);
                    assert!((-PCT_DIFF_LIMIT..=PCT_DIFF_LIMIT).contains(&p));
                }
            }
        }
    }
}
