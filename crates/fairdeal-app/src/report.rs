// Report rendering: plain-text tables and JSON documents.

use chrono::{DateTime, Utc};
use fairdeal_baseball::contract::{ContractStructure, ContractTermsInput};
use fairdeal_baseball::player::{Player, PlayerType, StatKey};
use fairdeal_baseball::stats::{descriptor, descriptors, StatWeights};
use fairdeal_baseball::valuation::multiplier::{sort_by_magnitude, StatImpact};
use fairdeal_baseball::valuation::{ValuationResult, ValuationSettings};
use serde::Serialize;

// ---------------------------------------------------------------------------
// JSON documents
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ValuationReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub position: &'a str,
    pub inflation_pct: f64,
    pub present_year: i32,
    pub adjust_aav: bool,
    pub adjust_years: bool,
    pub valuation: &'a ValuationResult,
}

impl<'a> ValuationReport<'a> {
    pub fn new(
        valuation: &'a ValuationResult,
        settings: &ValuationSettings,
        position: &'a str,
        inflation_pct: f64,
    ) -> Self {
        ValuationReport {
            generated_at: Utc::now(),
            position,
            inflation_pct,
            present_year: settings.present_year,
            adjust_aav: settings.adjust_aav,
            adjust_years: settings.adjust_years,
            valuation,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StructureReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub terms: &'a ContractTermsInput,
    pub structure: &'a ContractStructure,
}

impl<'a> StructureReport<'a> {
    pub fn new(terms: &'a ContractTermsInput, structure: &'a ContractStructure) -> Self {
        StructureReport {
            generated_at: Utc::now(),
            terms,
            structure,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatRow {
    key: StatKey,
    label: &'static str,
    higher_is_better: bool,
    default_weight: f64,
    weight: f64,
}

#[derive(Debug, Serialize)]
struct CompRow<'a> {
    id: &'a str,
    name: &'a str,
    team: &'a str,
    position: &'a str,
    aav: f64,
    years: f64,
    signed_year: Option<i32>,
    signing_age: f64,
}

impl<'a> CompRow<'a> {
    fn new(p: &'a Player) -> Self {
        let (aav, years, signed_year) = p
            .contract
            .as_ref()
            .map_or((0.0, 0.0, None), |c| (c.aav, c.years, c.signed_year));
        CompRow {
            id: &p.id,
            name: &p.name,
            team: &p.team,
            position: &p.position,
            aav,
            years,
            signed_year,
            signing_age: p.signing_age(),
        }
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Millions of dollars, e.g. `$21.63M`.
pub fn money(millions: f64) -> String {
    format!("${millions:.2}M")
}

/// Signed millions, e.g. `+$1.20M` / `-$0.45M`.
pub fn signed_money(millions: f64) -> String {
    let sign = if millions < 0.0 { '-' } else { '+' };
    format!("{sign}${:.2}M", millions.abs())
}

fn stat_value(key: StatKey, value: f64) -> String {
    descriptor(key).map_or_else(|| format!("{value:.2}"), |d| d.format(value))
}

// ---------------------------------------------------------------------------
// Valuation table
// ---------------------------------------------------------------------------

pub fn render_valuation(report: &ValuationReport<'_>) -> String {
    let v = report.valuation;
    let mut out = String::new();

    out.push_str(&format!(
        "{} ({}, age {:.0}) vs {} comps, {} preset\n",
        v.subject_name,
        v.player_type,
        v.subject_age,
        v.cohort.members.len(),
        report.position
    ));
    out.push('\n');

    out.push_str(&format!(
        "Cohort (inflated {:.1}%/yr to {})\n",
        report.inflation_pct, report.present_year
    ));
    out.push_str(&format!(
        "  {:<24} {:>9} {:>10} {:>6} {:>7} {:>5}\n",
        "Player", "AAV", "Adj AAV", "Years", "Signed", "Age"
    ));
    for m in &v.cohort.members {
        let signed = m.signed_year.map_or_else(|| "-".to_string(), |y| y.to_string());
        out.push_str(&format!(
            "  {:<24} {:>9} {:>10} {:>6.1} {:>7} {:>5.0}\n",
            m.name,
            money(m.aav),
            money(m.adjusted_aav),
            m.years,
            signed,
            m.signing_age
        ));
    }
    out.push('\n');

    out.push_str(&format!(
        "  {:<12} {:>9} {:>9} {:>9} {:>6} {:>6} {:>10}\n",
        "Stat", "Subject", "Cohort", "Diff", "Ratio", "Weight", "Impact"
    ));
    for (c, i) in v.comparisons.iter().zip(&v.impacts) {
        out.push_str(&format!(
            "  {:<12} {:>9} {:>9} {:>8.1}% {:>6.3} {:>6.2} {:>10}\n",
            c.label,
            stat_value(c.key, c.subject_value),
            stat_value(c.key, c.cohort_value),
            c.pct_diff,
            c.ratio,
            c.weight,
            signed_money(i.aav_impact)
        ));
    }
    out.push('\n');

    out.push_str(&format!(
        "Baseline      {} x {:.2} yrs\n",
        money(v.baseline_aav),
        v.baseline_years
    ));
    let m = &v.multiplier;
    out.push_str(&format!(
        "Multiplier    {:.4} (raw {:.4}, scaled {:.4}){}\n",
        m.multiplier,
        m.raw,
        m.scaled,
        if report.adjust_aav { "" } else { " [AAV adjustment off]" }
    ));
    let y = &v.years;
    out.push_str(&format!(
        "Years adj     {:+.2} (age x{:.3}{}, age penalty {:.2}, performance {:+.2}){}\n",
        v.years_adjustment(),
        y.age_multiplier,
        if y.young_elite { ", young elite" } else { "" },
        y.absolute_age_penalty,
        y.performance_adjustment,
        if report.adjust_years { "" } else { " [years adjustment off]" }
    ));
    out.push_str(&format!(
        "Fair contract {} x {:.1} yrs = {} ({})\n",
        money(v.fair_aav),
        v.fair_years,
        money(v.fair_total_value()),
        signed_money(v.aav_delta())
    ));

    let top = top_drivers(&v.impacts, 3);
    if !top.is_empty() {
        out.push('\n');
        out.push_str("Largest drivers\n");
        for i in top {
            out.push_str(&format!("  {:<12} {:>10}\n", i.label, signed_money(i.aav_impact)));
        }
    }

    out
}

/// The `n` impacts with the largest absolute dollar effect, ignoring zeros.
pub fn top_drivers(impacts: &[StatImpact], n: usize) -> Vec<StatImpact> {
    let mut sorted: Vec<StatImpact> = impacts
        .iter()
        .filter(|i| i.aav_impact.abs() >= 0.005)
        .cloned()
        .collect();
    sort_by_magnitude(&mut sorted);
    sorted.truncate(n);
    sorted
}

// ---------------------------------------------------------------------------
// Structure table
// ---------------------------------------------------------------------------

pub fn render_structure(report: &StructureReport<'_>) -> String {
    let s = report.structure;
    let mut out = String::new();

    out.push_str(&format!(
        "  {:>4} {:>10} {:>9} {:>9} {:>10} {:>10}  Notes\n",
        "Year", "Salary", "Bonus", "Deferred", "Cash", "CBT"
    ));
    for y in &s.years {
        let mut notes = Vec::new();
        if y.team_option {
            notes.push("team option");
        }
        if y.after_opt_out {
            notes.push("after opt-out");
        }
        out.push_str(&format!(
            "  {:>4} {:>10} {:>9} {:>9} {:>10} {:>10}  {}\n",
            y.year,
            money(y.base_salary),
            money(y.signing_bonus),
            money(y.deferred),
            money(y.net_cash),
            money(y.cbt_estimate),
            notes.join(", ")
        ));
    }
    out.push('\n');
    out.push_str(&format!("Total value      {}\n", money(s.total_value)));
    out.push_str(&format!("Guaranteed       {}\n", money(s.guaranteed_value)));
    out.push_str(&format!("Potential        {}\n", money(s.potential_value)));

    if !s.deferred_payouts.is_empty() {
        out.push('\n');
        out.push_str(&format!(
            "Deferred {} paid out as {}\n",
            money(s.total_deferred),
            money(s.total_deferred_payout)
        ));
        for p in &s.deferred_payouts {
            out.push_str(&format!("  +{:<3} {:>10}\n", p.years_after, money(p.amount)));
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Comparable listing
// ---------------------------------------------------------------------------

pub fn render_comps(comps: &[&Player]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  {:<8} {:<24} {:<5} {:<4} {:>9} {:>6} {:>7} {:>5}\n",
        "Id", "Player", "Team", "Pos", "AAV", "Years", "Signed", "Age"
    ));
    for row in comps.iter().map(|p| CompRow::new(p)) {
        let signed = row.signed_year.map_or_else(|| "-".to_string(), |y| y.to_string());
        out.push_str(&format!(
            "  {:<8} {:<24} {:<5} {:<4} {:>9} {:>6.1} {:>7} {:>5.0}\n",
            row.id,
            row.name,
            row.team,
            row.position,
            money(row.aav),
            row.years,
            signed,
            row.signing_age
        ));
    }
    out.push_str(&format!("  {} comparables\n", comps.len()));
    out
}

pub fn comps_json(comps: &[&Player]) -> Result<String, serde_json::Error> {
    let rows: Vec<CompRow<'_>> = comps.iter().map(|p| CompRow::new(p)).collect();
    to_json(&rows)
}

// ---------------------------------------------------------------------------
// Stat listing
// ---------------------------------------------------------------------------

pub fn render_stats(player_type: PlayerType, weights: &StatWeights) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  {:<10} {:<12} {:<10} {:>7} {:>7}\n",
        "Key", "Stat", "Better", "Default", "Weight"
    ));
    for d in descriptors(player_type) {
        out.push_str(&format!(
            "  {:<10} {:<12} {:<10} {:>7.2} {:>7.2}\n",
            d.key.key(),
            d.label,
            if d.higher_is_better { "higher" } else { "lower" },
            d.default_weight,
            weights.get(d.key)
        ));
    }
    out.push_str(&format!("  total weight {:.2}\n", weights.total()));
    out
}

pub fn stats_json(player_type: PlayerType, weights: &StatWeights) -> Result<String, serde_json::Error> {
    let rows: Vec<StatRow> = descriptors(player_type)
        .iter()
        .map(|d| StatRow {
            key: d.key,
            label: d.label,
            higher_is_better: d.higher_is_better,
            default_weight: d.default_weight,
            weight: weights.get(d.key),
        })
        .collect();
    to_json(&rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
