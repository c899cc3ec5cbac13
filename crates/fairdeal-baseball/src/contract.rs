// Contract structure simulation.
//
// Lays a contract out year by year: salary curve, signing bonus, deferred
// money and a simplified competitive balance tax figure. Amounts are in
// millions of dollars.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of seasons at the loaded end of a front/back-loaded contract.
pub const LOADED_YEARS: u32 = 3;
/// Share of total value treated as guaranteed when a team option exists.
pub const TEAM_OPTION_GUARANTEE: f64 = 0.85;
/// Flat per-season incentive pools added to the potential value.
pub const PERFORMANCE_BONUS_POOL: f64 = 1.0;
pub const AWARD_BONUS_POOL: f64 = 0.5;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Shape of the base salary across the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryCurve {
    #[default]
    Even,
    FrontLoaded,
    BackLoaded,
}

/// Everything needed to lay out a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractTermsInput {
    pub total_years: u32,
    pub aav: f64,
    #[serde(default)]
    pub signing_bonus: f64,
    #[serde(default)]
    pub curve: SalaryCurve,
    /// Percent by which loaded seasons exceed the AAV.
    #[serde(default)]
    pub load_pct: f64,
    /// Percent of each season's pay that is deferred.
    #[serde(default)]
    pub deferral_pct: f64,
    /// Seasons over which deferred money is paid out after the contract.
    #[serde(default)]
    pub deferral_years: u32,
    /// Annual interest on deferred money, in percent.
    #[serde(default)]
    pub deferral_interest_pct: f64,
    /// 1-based season that is a team option.
    #[serde(default)]
    pub team_option_year: Option<u32>,
    /// Player may opt out after this 1-based season.
    #[serde(default)]
    pub opt_out_after_year: Option<u32>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ContractYear {
    /// 1-based season number.
    pub year: u32,
    pub base_salary: f64,
    pub signing_bonus: f64,
    pub deferred: f64,
    pub net_cash: f64,
    /// Simplified luxury tax hit; not a faithful CBT calculation.
    pub cbt_estimate: f64,
    pub team_option: bool,
    /// True for seasons after an opt-out point.
    pub after_opt_out: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeferredPayout {
    /// Seasons after the final contract year (1 = first year after).
    pub years_after: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContractStructure {
    pub years: Vec<ContractYear>,
    pub total_value: f64,
    pub guaranteed_value: f64,
    pub potential_value: f64,
    pub total_deferred: f64,
    pub deferred_payouts: Vec<DeferredPayout>,
    pub total_deferred_payout: f64,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Base salary for 0-based season `index`.
pub fn base_salary(input: &ContractTermsInput, index: u32) -> f64 {
    let high = input.aav * (1.0 + input.load_pct / 100.0);
    let low = input.aav * (1.0 - input.load_pct / 200.0);
    match input.curve {
        SalaryCurve::Even => input.aav,
        SalaryCurve::FrontLoaded => {
            if index < LOADED_YEARS {
                high
            } else {
                low
            }
        }
        SalaryCurve::BackLoaded => {
            if index + LOADED_YEARS >= input.total_years {
                high
            } else {
                low
            }
        }
    }
}

/// Spread deferred money evenly over the deferral term, compounding each
/// payment annually from the end of the contract.
fn schedule_deferrals(total_deferred: f64, years: u32, interest_pct: f64) -> Vec<DeferredPayout> {
    if total_deferred <= 0.0 || years == 0 {
        return Vec::new();
    }
    let principal = total_deferred / years as f64;
    let growth = 1.0 + interest_pct.max(0.0) / 100.0;
    (1..=years)
        .map(|k| DeferredPayout {
            years_after: k,
            amount: principal * growth.powi(k as i32),
        })
        .collect()
}

/// Lay out a contract season by season.
pub fn simulate(input: &ContractTermsInput) -> ContractStructure {
    let deferral_share = input.deferral_pct.clamp(0.0, 100.0) / 100.0;
    let total_years = input.total_years.max(1) as f64;

    let years: Vec<ContractYear> = (0..input.total_years)
        .map(|i| {
            let base = base_salary(input, i);
            let bonus = if i == 0 { input.signing_bonus } else { 0.0 };
            let deferred = (base + bonus) * deferral_share;
            let season = i + 1;
            ContractYear {
                year: season,
                base_salary: base,
                signing_bonus: bonus,
                deferred,
                net_cash: base + bonus - deferred,
                cbt_estimate: input.aav - deferred / total_years,
                team_option: input.team_option_year == Some(season),
                after_opt_out: input.opt_out_after_year.is_some_and(|y| season > y),
            }
        })
        .collect();

    let total_value: f64 = years.iter().map(|y| y.base_salary + y.signing_bonus).sum();
    let total_deferred: f64 = years.iter().map(|y| y.deferred).sum();
    let guaranteed_value = if input.team_option_year.is_some() {
        total_value * TEAM_OPTION_GUARANTEE
    } else {
        total_value
    };
    let potential_value = total_value
        + input.total_years as f64 * (PERFORMANCE_BONUS_POOL + AWARD_BONUS_POOL);

    let deferred_payouts = schedule_deferrals(
        total_deferred,
        input.deferral_years,
        input.deferral_interest_pct,
    );
    let total_deferred_payout = deferred_payouts.iter().map(|p| p.amount).sum();

    ContractStructure {
        years,
        total_value,
        guaranteed_value,
        potential_value,
        total_deferred,
        deferred_payouts,
        total_deferred_payout,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
