// Integration tests for the valuation pipeline.
//
// Loads the fixture rosters from disk and runs full valuations through the
// public API: roster loading, cohort aggregation, comparison, multiplier,
// years adjustment and contract structure.

use std::path::{Path, PathBuf};

use fairdeal_baseball::contract::{simulate, ContractTermsInput, SalaryCurve};
use fairdeal_baseball::player::{Player, PlayerType, StatWindow};
use fairdeal_baseball::roster::{load_players, load_roster, Roster, RosterError};
use fairdeal_baseball::stats::StatWeights;
use fairdeal_baseball::valuation::cohort::CohortSelection;
use fairdeal_baseball::valuation::multiplier::{MULTIPLIER_MAX, MULTIPLIER_MIN};
use fairdeal_baseball::valuation::{value_player, ValuationResult, ValuationSettings};

// ===========================================================================
// Test helpers
// ===========================================================================

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn roster() -> Roster {
    let dir = fixtures();
    load_roster(
        &dir.join("sample_hitters.csv"),
        &dir.join("sample_pitchers.csv"),
    )
    .expect("fixture roster should load")
}

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn cohort<'a>(roster: &'a Roster, ids: &[&str], position: &str, inflation_pct: f64) -> CohortSelection<'a> {
    CohortSelection {
        comps: ids
            .iter()
            .map(|id| roster.get(id).expect("fixture id"))
            .collect(),
        position: position.into(),
        inflation_pct,
    }
}

fn value(roster: &Roster, subject: &str, comps: &[&str], settings: &ValuationSettings) -> ValuationResult {
    let subject: &Player = roster.get(subject).expect("fixture subject");
    let selection = cohort(roster, comps, &subject.position, 4.0);
    let weights = StatWeights::for_position(subject.player_type(), &selection.position);
    value_player(subject, &selection, &weights, settings)
}

fn assert_invariants(r: &ValuationResult) {
    let impact_sum: f64 = r.impacts.iter().map(|i| i.aav_impact).sum();
    assert!(
        approx_eq(impact_sum, r.fair_aav - r.baseline_aav, 1e-9),
        "impacts sum {impact_sum} != delta {}",
        r.fair_aav - r.baseline_aav
    );
    assert!((MULTIPLIER_MIN..=MULTIPLIER_MAX).contains(&r.aav_multiplier()));
    assert!(r.fair_years >= 1.0);
    assert_eq!((r.fair_years * 2.0).fract(), 0.0);
    for c in &r.comparisons {
        assert!((-500.0..=500.0).contains(&c.pct_diff), "{} pct {}", c.key, c.pct_diff);
        assert!((0.1..=10.0).contains(&c.ratio), "{} ratio {}", c.key, c.ratio);
    }
}

// ===========================================================================
// Roster loading
// ===========================================================================

#[test]
fn fixture_roster_loads_and_skips_nameless_rows() {
    let r = roster();
    assert_eq!(r.players().iter().filter(|p| !p.is_pitcher()).count(), 5);
    assert_eq!(r.players().iter().filter(|p| p.is_pitcher()).count(), 5);
    assert!(r.get("h205").is_none());

    let subject = r.get("h100").unwrap();
    assert!(!subject.is_comparable());
    assert!(approx_eq(subject.current_age(), 25.0, 1e-12));

    let comps: Vec<_> = r.comparables(PlayerType::Pitcher).collect();
    assert_eq!(comps.len(), 4);
}

#[test]
fn missing_roster_file_is_io_error() {
    let err = load_players(&fixtures().join("nope.csv"), PlayerType::Hitter).unwrap_err();
    match err {
        RosterError::Io { path, .. } => assert!(path.ends_with("nope.csv")),
        other => panic!("expected Io error, got: {other}"),
    }
}

#[test]
fn empty_roster_file_is_validation_error() {
    let tmp = std::env::temp_dir().join("fairdeal_empty_roster");
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(&tmp).unwrap();
    let empty = tmp.join("hitters.csv");
    std::fs::write(&empty, "id,name,position\n").unwrap();

    let err = load_roster(&empty, &fixtures().join("sample_pitchers.csv")).unwrap_err();
    assert!(matches!(err, RosterError::Validation(_)));

    let _ = std::fs::remove_dir_all(&tmp);
}

// ===========================================================================
// Valuation
// ===========================================================================

#[test]
fn baseline_is_inflation_adjusted_mean() {
    let r = roster();
    let result = value(&r, "h100", &["h201", "h202"], &ValuationSettings::default());
    // 27 * 1.04^2 = 29.2032; 24 * 1.04^3 = 26.996736
    assert!(approx_eq(result.baseline_aav, (29.2032 + 26.996736) / 2.0, 1e-9));
    assert!(approx_eq(result.baseline_years, 9.0, 1e-12));
    // Signing ages come from the pre-signing snapshots: (28 + 29) / 2
    assert!(approx_eq(result.cohort.signing_age, 28.5, 1e-12));
    assert_eq!(result.cohort.members.len(), 2);
}

#[test]
fn young_star_shortstop_earns_premium() {
    let r = roster();
    let result = value(
        &r,
        "h100",
        &["h201", "h202", "h203"],
        &ValuationSettings::default(),
    );
    assert_invariants(&result);
    assert!(result.aav_multiplier() > 1.0);
    assert!(result.fair_aav > result.baseline_aav);
    assert!(result.fair_years > result.baseline_years);
    assert_eq!(result.comparisons.len(), 11);
}

#[test]
fn pitcher_valuation_holds_invariants() {
    let r = roster();
    let result = value(
        &r,
        "p100",
        &["p201", "p202", "p203"],
        &ValuationSettings::default(),
    );
    assert_invariants(&result);
    assert_eq!(result.player_type, PlayerType::Pitcher);
    assert_eq!(result.comparisons.len(), 8);
    assert!(result.aav_multiplier() > 1.0);
}

#[test]
fn subject_window_changes_compared_values() {
    let r = roster();
    let three_year = value(&r, "h100", &["h201", "h204"], &ValuationSettings::default());
    let current = value(
        &r,
        "h100",
        &["h201", "h204"],
        &ValuationSettings {
            subject_window: StatWindow::Current,
            ..Default::default()
        },
    );
    assert!(approx_eq(three_year.baseline_aav, current.baseline_aav, 1e-12));
    assert!(current.comparisons[0].subject_value > three_year.comparisons[0].subject_value);
    assert_invariants(&current);
}

#[test]
fn toggles_off_return_baseline_terms() {
    let r = roster();
    let settings = ValuationSettings {
        adjust_aav: false,
        adjust_years: false,
        ..Default::default()
    };
    let result = value(&r, "h100", &["h201", "h202", "h204"], &settings);
    assert_eq!(result.aav_multiplier(), 1.0);
    assert!(approx_eq(result.fair_aav, result.baseline_aav, 1e-12));
    // (10 + 8 + 5) / 3 = 7.667 -> 7.5
    assert!(approx_eq(result.fair_years, 7.5, 1e-12));
    assert!(result.impacts.iter().all(|i| i.aav_impact.abs() < 1e-12));
}

#[test]
fn results_serialize_to_json() {
    let r = roster();
    let result = value(&r, "p100", &["p202"], &ValuationSettings::default());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["player_type"], "pitcher");
    assert_eq!(json["comparisons"][0]["key"], "war");
    assert!(json["years"]["fair_years"].is_number());
}

// ===========================================================================
// Contract structure
// ===========================================================================

#[test]
fn valuation_feeds_contract_structure() {
    let r = roster();
    let result = value(&r, "h100", &["h201", "h203"], &ValuationSettings::default());
    let input = ContractTermsInput {
        total_years: result.fair_years as u32,
        aav: result.fair_aav,
        signing_bonus: 5.0,
        curve: SalaryCurve::FrontLoaded,
        load_pct: 10.0,
        deferral_pct: 10.0,
        deferral_years: 5,
        deferral_interest_pct: 0.0,
        team_option_year: None,
        opt_out_after_year: Some(5),
    };
    let s = simulate(&input);
    assert_eq!(s.years.len(), input.total_years as usize);
    assert!(approx_eq(s.total_deferred_payout, s.total_deferred, 1e-9));
    assert!(s.years[5].after_opt_out);
    assert!(!s.years[4].after_opt_out);
}
