// Subject and cohort selection.
//
// Turns user input (ids, position, weight overrides) into the inputs of a
// valuation. This is the only layer that rejects a selection; the engine
// itself degrades silently.

use std::collections::{HashMap, HashSet};

use fairdeal_baseball::player::{Player, PlayerType, StatKey};
use fairdeal_baseball::roster::Roster;
use fairdeal_baseball::stats::StatWeights;
use fairdeal_baseball::valuation::cohort::CohortSelection;
use thiserror::Error;
use tracing::warn;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("no player selected")]
    NoPlayerSelected,

    #[error("no comparable players selected")]
    NoCohortSelected,

    #[error("unknown player id `{id}`")]
    UnknownPlayer { id: String },

    #[error("cohort member `{id}` is a {found}, but the subject is a {expected}")]
    MixedPlayerTypes {
        id: String,
        expected: PlayerType,
        found: PlayerType,
    },

    #[error("subject `{id}` cannot be part of its own cohort")]
    CohortIncludesSubject { id: String },

    #[error("invalid weight override `{input}`: {message}")]
    InvalidWeight { input: String, message: String },
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What the user asked to value.
#[derive(Debug, Clone, Default)]
pub struct SelectionRequest {
    pub subject_id: Option<String>,
    pub comp_ids: Vec<String>,
    /// Weight preset; the subject's own position when `None`.
    pub position: Option<String>,
    pub inflation_pct: f64,
    /// `key=value` overrides from the command line, applied last.
    pub weight_overrides: Vec<String>,
}

/// A validated selection, ready for `value_player`.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub subject: &'a Player,
    pub cohort: CohortSelection<'a>,
    pub weights: StatWeights,
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Resolve a request against the roster.
///
/// Duplicate comp ids are collapsed. Comps without a contract are kept but
/// logged, since they contribute a zero AAV to the baseline.
pub fn select<'a>(
    roster: &'a Roster,
    request: &SelectionRequest,
    config_weights: &HashMap<String, f64>,
) -> Result<Selection<'a>, SelectionError> {
    let subject_id = request
        .subject_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(SelectionError::NoPlayerSelected)?;
    let subject = lookup(roster, subject_id)?;
    let player_type = subject.player_type();

    let mut seen = HashSet::new();
    let mut comps = Vec::new();
    for id in request.comp_ids.iter().map(|id| id.trim()) {
        if id.is_empty() || !seen.insert(id) {
            continue;
        }
        let comp = lookup(roster, id)?;
        if comp.id == subject.id {
            return Err(SelectionError::CohortIncludesSubject {
                id: subject.id.clone(),
            });
        }
        if comp.player_type() != player_type {
            return Err(SelectionError::MixedPlayerTypes {
                id: comp.id.clone(),
                expected: player_type,
                found: comp.player_type(),
            });
        }
        if !comp.is_comparable() {
            warn!("cohort member '{}' has no signed contract", comp.id);
        }
        comps.push(comp);
    }
    if comps.is_empty() {
        return Err(SelectionError::NoCohortSelected);
    }

    let position = request
        .position
        .as_deref()
        .map(|p| p.trim().to_uppercase())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| subject.position.clone());

    let weights = build_weights(
        player_type,
        &position,
        config_weights,
        &request.weight_overrides,
    )?;

    Ok(Selection {
        subject,
        cohort: CohortSelection {
            comps,
            position,
            inflation_pct: request.inflation_pct,
        },
        weights,
    })
}

/// Signed players of one type that could join a cohort, optionally limited
/// to one position.
pub fn candidate_comps<'a>(
    roster: &'a Roster,
    player_type: PlayerType,
    position: Option<&str>,
) -> Vec<&'a Player> {
    let position = position.map(str::trim).filter(|p| !p.is_empty());
    roster
        .comparables(player_type)
        .filter(|p| position.map_or(true, |pos| p.position.eq_ignore_ascii_case(pos)))
        .collect()
}

fn lookup<'a>(roster: &'a Roster, id: &str) -> Result<&'a Player, SelectionError> {
    roster.get(id).ok_or_else(|| SelectionError::UnknownPlayer { id: id.to_string() })
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Position preset, then config overrides, then command-line overrides.
/// Config keys are assumed valid (checked when the config was loaded).
pub fn build_weights(
    player_type: PlayerType,
    position: &str,
    config_weights: &HashMap<String, f64>,
    overrides: &[String],
) -> Result<StatWeights, SelectionError> {
    let mut weights = StatWeights::for_position(player_type, position);

    let mut from_config: Vec<_> = config_weights.iter().collect();
    from_config.sort_by(|a, b| a.0.cmp(b.0));
    for (key, weight) in from_config {
        if let Some(k) = StatKey::parse(player_type, key) {
            weights.set(k, *weight);
        }
    }

    for input in overrides {
        let (key, weight) = parse_weight_override(player_type, input)?;
        weights.set(key, weight);
    }

    Ok(weights)
}

/// Parse `key=value` into a stat key of the given type and a weight.
pub fn parse_weight_override(
    player_type: PlayerType,
    input: &str,
) -> Result<(StatKey, f64), SelectionError> {
    let invalid = |message: String| SelectionError::InvalidWeight {
        input: input.to_string(),
        message,
    };

    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| invalid("expected key=value".into()))?;
    let stat = StatKey::parse(player_type, key)
        .ok_or_else(|| invalid(format!("unknown {player_type} stat `{}`", key.trim())))?;
    let weight: f64 = value
        .trim()
        .parse()
        .map_err(|_| invalid(format!("`{}` is not a number", value.trim())))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(invalid("weight must be a finite number >= 0".into()));
    }
    Ok((stat, weight))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
