// Cohort aggregation: inflation-adjusted baseline contract and the cohort's
// averaged stat profile.

use serde::Serialize;

use crate::player::{Player, PlayerType, StatKey};
use crate::stats::descriptors;

/// Reference season that comparable contracts are inflated forward to.
pub const DEFAULT_PRESENT_YEAR: i32 = 2025;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A selected cohort: the comparables plus the position label used to pick
/// weight presets and the annual inflation rate in percent.
///
/// All members are expected to share the subject's player type; the caller
/// checks this before building the selection.
#[derive(Debug, Clone)]
pub struct CohortSelection<'a> {
    pub comps: Vec<&'a Player>,
    pub position: String,
    pub inflation_pct: f64,
}

/// One comparable's contribution to the baseline.
#[derive(Debug, Clone, Serialize)]
pub struct CohortMember {
    pub id: String,
    pub name: String,
    pub aav: f64,
    pub adjusted_aav: f64,
    pub years: f64,
    pub signed_year: Option<i32>,
    pub signing_age: f64,
}

/// Averaged cohort profile.
#[derive(Debug, Clone, Serialize)]
pub struct CohortSummary {
    pub baseline_aav: f64,
    pub baseline_years: f64,
    pub signing_age: f64,
    /// Mean comparable value per tracked stat, in descriptor order.
    pub stats: Vec<(StatKey, f64)>,
    pub members: Vec<CohortMember>,
}

impl CohortSummary {
    /// Neutral summary used for an empty cohort.
    pub fn empty(player_type: PlayerType) -> Self {
        CohortSummary {
            baseline_aav: 0.0,
            baseline_years: 0.0,
            signing_age: 0.0,
            stats: descriptors(player_type).iter().map(|d| (d.key, 0.0)).collect(),
            members: Vec::new(),
        }
    }

    /// Cohort mean for a stat; 0.0 if the key is not tracked.
    pub fn stat(&self, key: StatKey) -> f64 {
        self.stats
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(0.0, |(_, v)| *v)
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        return f64::NAN;
    }
    sum / n as f64
}

/// Inflate an AAV from its signing year to `present_year`.
///
/// `inflation_pct` is clamped to >= 0. Contracts with no signing year, or
/// signed in or after the present year, are not adjusted.
pub fn inflation_adjusted_aav(
    aav: f64,
    signed_year: Option<i32>,
    inflation_pct: f64,
    present_year: i32,
) -> f64 {
    let rate = inflation_pct.max(0.0) / 100.0;
    let elapsed = signed_year.map_or(0, |y| present_year.saturating_sub(y).max(0));
    aav * (1.0 + rate).powi(elapsed)
}

/// Aggregate a cohort into its baseline contract and stat profile.
///
/// `subject_age` is the fallback signing age when the cohort mean is not
/// finite. An empty cohort yields [`CohortSummary::empty`].
pub fn summarize(
    cohort: &CohortSelection<'_>,
    player_type: PlayerType,
    subject_age: f64,
    present_year: i32,
) -> CohortSummary {
    if cohort.comps.is_empty() {
        return CohortSummary::empty(player_type);
    }

    let members: Vec<CohortMember> = cohort
        .comps
        .iter()
        .map(|p| {
            let (aav, years, signed_year) = p
                .contract
                .as_ref()
                .map_or((0.0, 0.0, None), |c| (c.aav, c.years, c.signed_year));
            CohortMember {
                id: p.id.clone(),
                name: p.name.clone(),
                aav,
                adjusted_aav: inflation_adjusted_aav(
                    aav,
                    signed_year,
                    cohort.inflation_pct,
                    present_year,
                ),
                years,
                signed_year,
                signing_age: p.signing_age(),
            }
        })
        .collect();

    let baseline_aav = mean(members.iter().map(|m| m.adjusted_aav));
    let baseline_years = mean(members.iter().map(|m| m.years));
    let age = mean(members.iter().map(|m| m.signing_age));
    let signing_age = if age.is_finite() { age } else { subject_age };

    let stats = descriptors(player_type)
        .iter()
        .map(|d| {
            let avg = mean(cohort.comps.iter().map(|p| p.comparable_value(d.key)));
            (d.key, if avg.is_finite() { avg } else { 0.0 })
        })
        .collect();

    CohortSummary {
        baseline_aav,
        baseline_years,
        signing_age,
        stats,
        members,
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

    fn comp(
        id: &str,
        aav: f64,
        years: f64,
        signed_year: Option<i32>,
        pre: Option<HitterSnapshot>,
        three_year: HitterSnapshot,
    ) -> Player {
        Player {
            id: id.into(),
            name: format!("Comp {id}"),
            team: "TST".into(),
            position: "SS".into(),
            stats: PlayerStats::Hitter {
                current: HitterSnapshot::default(),
                three_year,
                pre_signing: pre,
            },
            contract: Some(ContractTerms {
                aav,
                years,
                signed_year,
            }),
        }
    }

    fn selection<'a>(comps: Vec<&'a Player>, inflation_pct: f64) -> CohortSelection<'a> {
        CohortSelection {
            comps,
            position: "SS".into(),
            inflation_pct,
        }
    }

    #[test]
    fn single_comp_inflated_two_years() {
        let c = comp("a", 20.0, 6.0, Some(2023), None, HitterSnapshot::default());
        let summary = summarize(&selection(vec![&c], 4.0), PlayerType::Hitter, 27.0, 2025);
        assert!(approx_eq(summary.members[0].adjusted_aav, 21.632, 1e-9));
        assert!(approx_eq(summary.baseline_aav, 21.632, 1e-9));
        assert!(approx_eq(summary.baseline_years, 6.0, 1e-12));
    }

    #[test]
    fn missing_signed_year_is_not_inflated() {
        assert!(approx_eq(inflation_adjusted_aav(20.0, None, 4.0, 2025), 20.0, 1e-12));
    }

    #[test]
    fn future_signing_year_is_not_deflated() {
        assert!(approx_eq(inflation_adjusted_aav(20.0, Some(2027), 4.0, 2025), 20.0, 1e-12));
    }

    #[test]
    fn negative_inflation_clamped_to_zero() {
        assert!(approx_eq(inflation_adjusted_aav(20.0, Some(2020), -5.0, 2025), 20.0, 1e-12));
    }

    #[test]
    fn baseline_is_arithmetic_mean() {
        let a = comp("a", 10.0, 4.0, None, None, HitterSnapshot::default());
        let b = comp("b", 30.0, 8.0, None, None, HitterSnapshot::default());
        let summary = summarize(&selection(vec![&a, &b], 0.0), PlayerType::Hitter, 27.0, 2025);
        assert!(approx_eq(summary.baseline_aav, 20.0, 1e-12));
        assert!(approx_eq(summary.baseline_years, 6.0, 1e-12));
    }

    #[test]
    fn stats_prefer_pre_signing_window() {
        let a = comp(
            "a",
            10.0,
            4.0,
            None,
            Some(HitterSnapshot { war: 6.0, age: 28.0, ..Default::default() }),
            HitterSnapshot { war: 2.0, age: 31.0, ..Default::default() },
        );
        let b = comp(
            "b",
            10.0,
            4.0,
            None,
            None,
            HitterSnapshot { war: 4.0, age: 30.0, ..Default::default() },
        );
        let summary = summarize(&selection(vec![&a, &b], 0.0), PlayerType::Hitter, 27.0, 2025);
        assert!(approx_eq(summary.stat(StatKey::Hitter(HitterStat::War)), 5.0, 1e-12));
        assert!(approx_eq(summary.signing_age, 29.0, 1e-12));
    }

    #[test]
    fn home_runs_averaged_from_rounded_counts() {
        let a = comp(
            "a",
            10.0,
            4.0,
            None,
            None,
            HitterSnapshot { hr_per_pa: 30.4, ..Default::default() },
        );
        let b = comp(
            "b",
            10.0,
            4.0,
            None,
            None,
            HitterSnapshot { hr_per_pa: 20.6, ..Default::default() },
        );
        let summary = summarize(&selection(vec![&a, &b], 0.0), PlayerType::Hitter, 27.0, 2025);
        // round(30.4) = 30, round(20.6) = 21
        assert!(approx_eq(summary.stat(StatKey::Hitter(HitterStat::HomeRuns)), 25.5, 1e-12));
    }

    #[test]
    fn non_finite_signing_age_falls_back_to_subject() {
        let a = comp(
            "a",
            10.0,
            4.0,
            None,
            None,
            HitterSnapshot { age: f64::NAN, ..Default::default() },
        );
        let summary = summarize(&selection(vec![&a], 0.0), PlayerType::Hitter, 26.0, 2025);
        assert!(approx_eq(summary.signing_age, 26.0, 1e-12));
    }

    #[test]
    fn pre_signing_window_without_age_uses_three_year_age() {
        let a = comp(
            "a",
            20.0,
            6.0,
            None,
            Some(HitterSnapshot { war: 5.0, wrc_plus: 140.0, ..Default::default() }),
            HitterSnapshot { war: 4.0, age: 29.0, ..Default::default() },
        );
        let summary = summarize(&selection(vec![&a], 0.0), PlayerType::Hitter, 29.0, 2025);
        assert!(approx_eq(summary.members[0].signing_age, 29.0, 1e-12));
        assert!(approx_eq(summary.signing_age, 29.0, 1e-12));
        // the pre-signing stats still drive the profile
        assert!(approx_eq(summary.stat(StatKey::Hitter(HitterStat::War)), 5.0, 1e-12));
    }

    #[test]
    fn extreme_signing_year_does_not_overflow() {
        assert!(approx_eq(inflation_adjusted_aav(20.0, Some(i32::MAX), 4.0, 2025), 20.0, 1e-12));
        let far_past = inflation_adjusted_aav(20.0, Some(i32::MIN), 4.0, 2025);
        assert!(far_past.is_infinite() || far_past > 20.0);
    }

    #[test]
    fn empty_cohort_is_neutral() {
        let summary = summarize(&selection(vec![], 4.0), PlayerType::Pitcher, 27.0, 2025);
        assert_eq!(summary.baseline_aav, 0.0);
        assert_eq!(summary.baseline_years, 0.0);
        assert!(summary.members.is_empty());
        assert_eq!(summary.stats.len(), crate::stats::PITCHER_STATS.len());
        assert!(summary.stats.iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn comp_without_contract_counts_as_zero() {
        let mut a = comp("a", 10.0, 4.0, None, None, HitterSnapshot::default());
        a.contract = None;
        let b = comp("b", 30.0, 8.0, None, None, HitterSnapshot::default());
        let summary = summarize(&selection(vec![&a, &b], 0.0), PlayerType::Hitter, 27.0, 2025);
        assert!(approx_eq(summary.baseline_aav, 15.0, 1e-12));
        assert!(approx_eq(summary.baseline_years, 4.0, 1e-12));
    }
}
