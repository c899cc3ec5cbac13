// Contract length adjustment from age relative to the cohort, an absolute
// age threshold, and performance.

use serde::Serialize;

use crate::player::PlayerType;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Quadratic age curve: penalty for being older than the cohort at signing,
/// benefit for being younger.
#[derive(Debug, Clone, Copy)]
pub struct AgeCurve {
    pub penalty_linear: f64,
    pub penalty_quadratic: f64,
    pub benefit_linear: f64,
    pub benefit_quadratic: f64,
}

impl AgeCurve {
    pub fn penalty(&self, older: f64) -> f64 {
        self.penalty_linear * older + self.penalty_quadratic * older * older
    }

    pub fn benefit(&self, younger: f64) -> f64 {
        self.benefit_linear * younger - self.benefit_quadratic * younger * younger
    }
}

pub const HITTER_AGE_CURVE: AgeCurve = AgeCurve {
    penalty_linear: 0.05,
    penalty_quadratic: 0.010,
    benefit_linear: 0.03,
    benefit_quadratic: 0.005,
};

pub const PITCHER_AGE_CURVE: AgeCurve = AgeCurve {
    penalty_linear: 0.03,
    penalty_quadratic: 0.005,
    benefit_linear: 0.05,
    benefit_quadratic: 0.002,
};

/// Years lost once a player passes an absolute age: `min(max, (age - base) * per_year)`
/// for `age >= base + 1`.
#[derive(Debug, Clone, Copy)]
pub struct AgeThreshold {
    pub base_age: f64,
    pub per_year: f64,
    pub max_penalty: f64,
}

impl AgeThreshold {
    pub fn penalty(&self, age: f64) -> f64 {
        if age >= self.base_age + 1.0 {
            ((age - self.base_age) * self.per_year).min(self.max_penalty)
        } else {
            0.0
        }
    }
}

pub const HITTER_AGE_THRESHOLD: AgeThreshold = AgeThreshold {
    base_age: 30.0,
    per_year: 0.25,
    max_penalty: 2.0,
};

pub const PITCHER_AGE_THRESHOLD: AgeThreshold = AgeThreshold {
    base_age: 32.0,
    per_year: 0.15,
    max_penalty: 1.5,
};

pub const YOUNG_ELITE_MAX_AGE: f64 = 25.0;
pub const YOUNG_ELITE_MIN_MULTIPLIER: f64 = 1.15;
pub const YOUNG_ELITE_BOOST: f64 = 1.15;

pub const AGE_MULTIPLIER_MIN: f64 = 0.6;
pub const AGE_MULTIPLIER_MAX: f64 = 1.5;
pub const YOUNG_ELITE_AGE_MULTIPLIER_MAX: f64 = 1.8;

/// Years added per unit of AAV multiplier above 1.0.
pub const PERFORMANCE_FACTOR: f64 = 1.8;
/// Performance factor for pitchers younger than the cohort.
pub const YOUNG_PITCHER_PERFORMANCE_FACTOR: f64 = 2.75;
pub const PERFORMANCE_ADJUSTMENT_LIMIT: f64 = 1.5;

/// Maximum years added over the baseline.
pub const SOFT_CAP_YEARS: f64 = 2.0;
pub const YOUNG_ELITE_SOFT_CAP_YEARS: f64 = 5.0;

pub const MIN_FAIR_YEARS: f64 = 1.0;

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Every term of the years adjustment, for the audit trail.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct YearsBreakdown {
    pub age_delta: f64,
    pub older_delta: f64,
    pub younger_delta: f64,
    pub age_penalty: f64,
    pub age_benefit: f64,
    pub raw_age_multiplier: f64,
    pub young_elite: bool,
    pub age_multiplier: f64,
    pub absolute_age_penalty: f64,
    pub performance_adjustment: f64,
    /// Zero when the years adjustment is disabled.
    pub total_adjustment: f64,
    pub proposed_years: f64,
    pub capped_years: f64,
    pub fair_years: f64,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Round to the nearest half year.
pub fn round_half_year(years: f64) -> f64 {
    (years * 2.0).round() / 2.0
}

/// Compute the fair contract length.
///
/// `aav_multiplier` is the final (clamped) performance multiplier. Sub-terms
/// are always computed; `enabled == false` only zeroes the total.
pub fn adjust_years(
    player_type: PlayerType,
    subject_age: f64,
    cohort_signing_age: f64,
    baseline_years: f64,
    aav_multiplier: f64,
    enabled: bool,
) -> YearsBreakdown {
    let (curve, threshold) = match player_type {
        PlayerType::Hitter => (HITTER_AGE_CURVE, HITTER_AGE_THRESHOLD),
        PlayerType::Pitcher => (PITCHER_AGE_CURVE, PITCHER_AGE_THRESHOLD),
    };

    let age_delta = subject_age - cohort_signing_age;
    let older_delta = age_delta.max(0.0);
    let younger_delta = (-age_delta).max(0.0);

    let age_penalty = curve.penalty(older_delta);
    let age_benefit = curve.benefit(younger_delta);
    let raw_age_multiplier = 1.0 - age_penalty + age_benefit;

    let young_elite =
        subject_age <= YOUNG_ELITE_MAX_AGE && aav_multiplier >= YOUNG_ELITE_MIN_MULTIPLIER;
    let age_multiplier = if young_elite {
        (raw_age_multiplier * YOUNG_ELITE_BOOST)
            .clamp(AGE_MULTIPLIER_MIN, YOUNG_ELITE_AGE_MULTIPLIER_MAX)
    } else {
        raw_age_multiplier.clamp(AGE_MULTIPLIER_MIN, AGE_MULTIPLIER_MAX)
    };

    let absolute_age_penalty = threshold.penalty(subject_age);

    let performance_factor = if player_type.is_pitcher() && younger_delta > 0.0 {
        YOUNG_PITCHER_PERFORMANCE_FACTOR
    } else {
        PERFORMANCE_FACTOR
    };
    let performance_adjustment = ((aav_multiplier - 1.0) * performance_factor)
        .clamp(-PERFORMANCE_ADJUSTMENT_LIMIT, PERFORMANCE_ADJUSTMENT_LIMIT);

    let total_adjustment = if enabled {
        baseline_years * (age_multiplier - 1.0) - absolute_age_penalty + performance_adjustment
    } else {
        0.0
    };

    let proposed_years = baseline_years + total_adjustment;
    let cap = if young_elite {
        YOUNG_ELITE_SOFT_CAP_YEARS
    } else {
        SOFT_CAP_YEARS
    };
    let capped_years = proposed_years.min(baseline_years + cap);
    let fair_years = round_half_year(capped_years).max(MIN_FAIR_YEARS);

    YearsBreakdown {
        age_delta,
        older_delta,
        younger_delta,
        age_penalty,
        age_benefit,
        raw_age_multiplier,
        young_elite,
        age_multiplier,
        absolute_age_penalty,
        performance_adjustment,
        total_adjustment,
        proposed_years,
        capped_years,
        fair_years,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
