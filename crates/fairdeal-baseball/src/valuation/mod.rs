// Valuation engine: cohort baseline, stat comparison, performance
// multiplier, years adjustment.

pub mod cohort;
pub mod comparator;
pub mod multiplier;
pub mod years;

use serde::Serialize;
use tracing::debug;

use crate::player::{Player, PlayerType, StatWindow};
use crate::stats::StatWeights;
use cohort::{CohortSelection, CohortSummary, DEFAULT_PRESENT_YEAR};
use comparator::StatComparison;
use multiplier::{MultiplierBreakdown, StatImpact};
use years::YearsBreakdown;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Caller-supplied knobs for a single valuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationSettings {
    /// Year comparable contracts are inflated forward to.
    pub present_year: i32,
    /// Which of the subject's snapshots is compared.
    pub subject_window: StatWindow,
    /// Apply the performance multiplier to AAV.
    pub adjust_aav: bool,
    /// Apply the age/performance years adjustment.
    pub adjust_years: bool,
}

impl Default for ValuationSettings {
    fn default() -> Self {
        ValuationSettings {
            present_year: DEFAULT_PRESENT_YEAR,
            subject_window: StatWindow::ThreeYear,
            adjust_aav: true,
            adjust_years: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Full valuation of one subject against one cohort.
#[derive(Debug, Clone, Serialize)]
pub struct ValuationResult {
    pub subject_id: String,
    pub subject_name: String,
    pub player_type: PlayerType,
    pub subject_age: f64,
    pub baseline_aav: f64,
    pub baseline_years: f64,
    pub fair_aav: f64,
    pub fair_years: f64,
    pub multiplier: MultiplierBreakdown,
    pub years: YearsBreakdown,
    pub comparisons: Vec<StatComparison>,
    /// Per-stat dollar impacts; `aav_impact` sums to `fair_aav - baseline_aav`.
    pub impacts: Vec<StatImpact>,
    pub cohort: CohortSummary,
}

impl ValuationResult {
    /// All-zero result for an empty cohort.
    fn empty(subject: &Player) -> Self {
        ValuationResult {
            subject_id: subject.id.clone(),
            subject_name: subject.name.clone(),
            player_type: subject.player_type(),
            subject_age: subject.current_age(),
            baseline_aav: 0.0,
            baseline_years: 0.0,
            fair_aav: 0.0,
            fair_years: 0.0,
            multiplier: MultiplierBreakdown {
                total_weight: 0.0,
                raw: 1.0,
                scaled: 1.0,
                multiplier: 1.0,
            },
            years: YearsBreakdown::default(),
            comparisons: Vec::new(),
            impacts: Vec::new(),
            cohort: CohortSummary::empty(subject.player_type()),
        }
    }

    pub fn aav_multiplier(&self) -> f64 {
        self.multiplier.multiplier
    }

    pub fn years_adjustment(&self) -> f64 {
        self.years.total_adjustment
    }

    /// `fair_aav - baseline_aav`.
    pub fn aav_delta(&self) -> f64 {
        self.fair_aav - self.baseline_aav
    }

    /// Total contract value at the fair terms.
    pub fn fair_total_value(&self) -> f64 {
        self.fair_aav * self.fair_years
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Value `subject` against `cohort`.
///
/// Pure: the result depends only on the arguments. An empty cohort yields an
/// all-zero result instead of an error.
pub fn value_player(
    subject: &Player,
    cohort: &CohortSelection<'_>,
    weights: &StatWeights,
    settings: &ValuationSettings,
) -> ValuationResult {
    if cohort.comps.is_empty() {
        debug!("empty cohort for '{}', returning zero valuation", subject.name);
        return ValuationResult::empty(subject);
    }

    let player_type = subject.player_type();
    let subject_age = subject.current_age();

    let summary = cohort::summarize(cohort, player_type, subject_age, settings.present_year);
    let comparisons =
        comparator::compare(subject, settings.subject_window, &summary, weights);

    let multiplier = multiplier::compute_multiplier(&comparisons, settings.adjust_aav);
    let fair_aav = summary.baseline_aav * multiplier.multiplier;
    let impacts = multiplier::decompose_impacts(&comparisons, summary.baseline_aav, fair_aav);

    let years = years::adjust_years(
        player_type,
        subject_age,
        summary.signing_age,
        summary.baseline_years,
        multiplier.multiplier,
        settings.adjust_years,
    );

    debug!(
        "valued '{}' vs {} comps: baseline {:.3}/{:.2}y, multiplier {:.4}, fair {:.3}/{:.1}y",
        subject.name,
        cohort.comps.len(),
        summary.baseline_aav,
        summary.baseline_years,
        multiplier.multiplier,
        fair_aav,
        years.fair_years
    );

    ValuationResult {
        subject_id: subject.id.clone(),
        subject_name: subject.name.clone(),
        player_type,
        subject_age,
        baseline_aav: summary.baseline_aav,
        baseline_years: summary.baseline_years,
        fair_aav,
        fair_years: years.fair_years,
        multiplier,
        years,
        comparisons,
        impacts,
        cohort: summary,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn snap(war: f64, wrc_plus: f64, def_runs: f64, age: f64) -> HitterSnapshot {
        HitterSnapshot {
            war,
            wrc_plus,
            xwoba: 0.340,
            xslg: 0.480,
            hr_per_pa: 25.0,
            barrel_pct: 10.0,
            exit_velocity: 90.0,
            bb_pct: 9.0,
            k_pct: 22.0,
            pa: 600.0,
            def_runs,
            bsr_runs: 1.0,
            age,
        }
    }

    fn subject(s: HitterSnapshot) -> Player {
        Player {
            id: "subj".into(),
            name: "Subject".into(),
            team: "TST".into(),
            position: "SS".into(),
            stats: PlayerStats::Hitter {
                current: s.clone(),
                three_year: s,
                pre_signing: None,
            },
            contract: None,
        }
    }

    fn comp(id: &str, s: HitterSnapshot, aav: f64, years: f64, signed: i32) -> Player {
        Player {
            id: id.into(),
            name: format!("Comp {id}"),
            team: "TST".into(),
            position: "SS".into(),
            stats: PlayerStats::Hitter {
                current: HitterSnapshot::default(),
                three_year: HitterSnapshot::default(),
                pre_signing: Some(s),
            },
            contract: Some(ContractTerms {
                aav,
                years,
                signed_year: Some(signed),
            }),
        }
    }

    #[test]
    fn identical_profile_keeps_baseline_aav() {
        let subj = subject(snap(5.0, 130.0, 3.0, 29.0));
        let c = comp("a", snap(5.0, 130.0, 3.0, 29.0), 20.0, 6.0, 2025);
        let cohort = CohortSelection {
            comps: vec![&c],
            position: "SS".into(),
            inflation_pct: 4.0,
        };
        let weights = StatWeights::for_position(PlayerType::Hitter, "SS");
        let r = value_player(&subj, &cohort, &weights, &ValuationSettings::default());
        assert!(approx_eq(r.aav_multiplier(), 1.0, 1e-12));
        assert!(approx_eq(r.fair_aav, 20.0, 1e-12));
        assert!(approx_eq(r.fair_years, 6.0, 1e-12));
        assert!(r.impacts.iter().all(|i| i.aav_impact.abs() < 1e-12));
    }

    #[test]
    fn better_subject_gets_premium_and_exact_impacts() {
        let subj = subject(snap(7.0, 150.0, 8.0, 27.0));
        let a = comp("a", snap(5.0, 125.0, 2.0, 29.0), 22.0, 7.0, 2023);
        let b = comp("b", snap(4.5, 120.0, -1.0, 30.0), 18.0, 5.0, 2022);
        let cohort = CohortSelection {
            comps: vec![&a, &b],
            position: "SS".into(),
            inflation_pct: 3.0,
        };
        let weights = StatWeights::for_position(PlayerType::Hitter, "SS");
        let r = value_player(&subj, &cohort, &weights, &ValuationSettings::default());
        assert!(r.aav_multiplier() > 1.0);
        assert!(r.fair_aav > r.baseline_aav);
        let sum: f64 = r.impacts.iter().map(|i| i.aav_impact).sum();
        assert!(approx_eq(sum, r.aav_delta(), 1e-9));
        assert!(r.fair_years >= 1.0);
    }

    #[test]
    fn aav_toggle_off_forces_unit_multiplier() {
        let subj = subject(snap(9.0, 170.0, 10.0, 27.0));
        let a = comp("a", snap(3.0, 105.0, 0.0, 29.0), 15.0, 4.0, 2025);
        let cohort = CohortSelection {
            comps: vec![&a],
            position: "SS".into(),
            inflation_pct: 0.0,
        };
        let weights = StatWeights::defaults(PlayerType::Hitter);
        let settings = ValuationSettings {
            adjust_aav: false,
            ..Default::default()
        };
        let r = value_player(&subj, &cohort, &weights, &settings);
        assert_eq!(r.aav_multiplier(), 1.0);
        assert!(approx_eq(r.fair_aav, 15.0, 1e-12));
    }

    #[test]
    fn years_toggle_off_rounds_baseline() {
        let subj = subject(snap(9.0, 170.0, 10.0, 34.0));
        let a = comp("a", snap(3.0, 105.0, 0.0, 29.0), 15.0, 4.0, 2025);
        let b = comp("b", snap(3.0, 105.0, 0.0, 29.0), 15.0, 5.0, 2025);
        let cohort = CohortSelection {
            comps: vec![&a, &b],
            position: "SS".into(),
            inflation_pct: 0.0,
        };
        let weights = StatWeights::defaults(PlayerType::Hitter);
        let settings = ValuationSettings {
            adjust_years: false,
            ..Default::default()
        };
        let r = value_player(&subj, &cohort, &weights, &settings);
        assert_eq!(r.years_adjustment(), 0.0);
        assert!(approx_eq(r.fair_years, 4.5, 1e-12));
    }

    #[test]
    fn empty_cohort_is_all_zero() {
        let subj = subject(snap(5.0, 130.0, 3.0, 29.0));
        let cohort = CohortSelection {
            comps: vec![],
            position: "SS".into(),
            inflation_pct: 4.0,
        };
        let weights = StatWeights::defaults(PlayerType::Hitter);
        let r = value_player(&subj, &cohort, &weights, &ValuationSettings::default());
        assert_eq!(r.baseline_aav, 0.0);
        assert_eq!(r.fair_aav, 0.0);
        assert_eq!(r.fair_years, 0.0);
        assert_eq!(r.aav_multiplier(), 1.0);
        assert!(r.impacts.is_empty());
    }

    #[test]
    fn valuation_is_idempotent() {
        let subj = subject(snap(6.1, 141.0, 4.0, 26.0));
        let a = comp("a", snap(5.0, 125.0, 2.0, 29.0), 22.0, 7.0, 2021);
        let cohort = CohortSelection {
            comps: vec![&a],
            position: "SS".into(),
            inflation_pct: 4.5,
        };
        let weights = StatWeights::for_position(PlayerType::Hitter, "SS");
        let settings = ValuationSettings::default();
        let r1 = value_player(&subj, &cohort, &weights, &settings);
        let r2 = value_player(&subj, &cohort, &weights, &settings);
        assert_eq!(r1.fair_aav.to_bits(), r2.fair_aav.to_bits());
        assert_eq!(r1.fair_years.to_bits(), r2.fair_years.to_bits());
        let bits = |r: &ValuationResult| -> Vec<u64> {
            r.impacts.iter().map(|i| i.aav_impact.to_bits()).collect()
        };
        assert_eq!(bits(&r1), bits(&r2));
    }
}
