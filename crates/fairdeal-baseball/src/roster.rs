// Roster loading from CSV.
//
// One file per player type. Identity and contract columns are unprefixed;
// stat columns carry a window prefix: `cur_` (current season), `t3_`
// (trailing three years) and `pre_` (three years before signing).

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::player::{
    ContractTerms, HitterSnapshot, PitcherSnapshot, Player, PlayerStats, PlayerType,
};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// All loaded players, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Player>,
    by_id: HashMap<String, usize>,
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Self {
        let mut roster = Roster::default();
        for p in players {
            roster.insert(p);
        }
        roster
    }

    /// Insert a player; a later row with the same id replaces the earlier one.
    fn insert(&mut self, player: Player) {
        match self.by_id.get(&player.id) {
            Some(&idx) => {
                warn!("duplicate player id '{}', using latest row", player.id);
                self.players[idx] = player;
            }
            None => {
                self.by_id.insert(player.id.clone(), self.players.len());
                self.players.push(player);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.by_id.get(id.trim()).map(|&i| &self.players[i])
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Signed comparables of the given type.
    pub fn comparables(&self, player_type: PlayerType) -> impl Iterator<Item = &Player> {
        self.players
            .iter()
            .filter(move |p| p.player_type() == player_type && p.is_comparable())
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Cell helpers
// ---------------------------------------------------------------------------

/// Raw cells keyed by header. Cells stay text until a numeric column is read.
type Row = HashMap<String, String>;

const WINDOW_CURRENT: &str = "cur";
const WINDOW_THREE_YEAR: &str = "t3";
const WINDOW_PRE_SIGNING: &str = "pre";

/// Text cell, trimmed and kept verbatim.
fn text(row: &Row, column: &str) -> String {
    row.get(column).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Numeric cell. `None` when absent, empty, unparsable or non-finite.
fn number(row: &Row, column: &str) -> Option<f64> {
    let v = row.get(column)?.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

/// Stat cell for a window; missing values read as 0.
fn stat(row: &Row, window: &str, name: &str) -> f64 {
    number(row, &format!("{window}_{name}")).unwrap_or(0.0)
}

/// Whether any cell with the window prefix holds a number.
fn has_window(row: &Row, window: &str) -> bool {
    let prefix = format!("{window}_");
    row.iter()
        .any(|(k, _)| k.starts_with(&prefix) && number(row, k).is_some())
}

fn hitter_snapshot(row: &Row, w: &str) -> HitterSnapshot {
    HitterSnapshot {
        war: stat(row, w, "war"),
        wrc_plus: stat(row, w, "wrc_plus"),
        xwoba: stat(row, w, "xwoba"),
        xslg: stat(row, w, "xslg"),
        hr_per_pa: stat(row, w, "hr_per_pa"),
        barrel_pct: stat(row, w, "barrel_pct"),
        exit_velocity: stat(row, w, "ev"),
        bb_pct: stat(row, w, "bb_pct"),
        k_pct: stat(row, w, "k_pct"),
        pa: stat(row, w, "pa"),
        def_runs: stat(row, w, "def"),
        bsr_runs: stat(row, w, "bsr"),
        age: stat(row, w, "age"),
    }
}

fn pitcher_snapshot(row: &Row, w: &str) -> PitcherSnapshot {
    PitcherSnapshot {
        war: stat(row, w, "war"),
        era: stat(row, w, "era"),
        fip: stat(row, w, "fip"),
        xfip: stat(row, w, "xfip"),
        k_per_9: stat(row, w, "k9"),
        bb_per_9: stat(row, w, "bb9"),
        whip: stat(row, w, "whip"),
        ip: stat(row, w, "ip"),
        age: stat(row, w, "age"),
    }
}

fn contract(row: &Row) -> Option<ContractTerms> {
    let aav = number(row, "aav")?;
    Some(ContractTerms {
        aav,
        years: number(row, "years").unwrap_or(0.0),
        signed_year: number(row, "signed_year").map(|y| y.round() as i32),
    })
}

/// Build a player from one row, or `None` if identity columns are missing.
fn player_from_row(row: &Row, player_type: PlayerType) -> Option<Player> {
    let id = text(row, "id");
    let name = text(row, "name");
    if id.is_empty() || name.is_empty() {
        return None;
    }
    let stats = match player_type {
        PlayerType::Hitter => PlayerStats::Hitter {
            current: hitter_snapshot(row, WINDOW_CURRENT),
            three_year: hitter_snapshot(row, WINDOW_THREE_YEAR),
            pre_signing: has_window(row, WINDOW_PRE_SIGNING)
                .then(|| hitter_snapshot(row, WINDOW_PRE_SIGNING)),
        },
        PlayerType::Pitcher => PlayerStats::Pitcher {
            current: pitcher_snapshot(row, WINDOW_CURRENT),
            three_year: pitcher_snapshot(row, WINDOW_THREE_YEAR),
            pre_signing: has_window(row, WINDOW_PRE_SIGNING)
                .then(|| pitcher_snapshot(row, WINDOW_PRE_SIGNING)),
        },
    };
    Some(Player {
        id,
        name,
        team: text(row, "team"),
        position: text(row, "position").to_uppercase(),
        stats,
        contract: contract(row),
    })
}

// ---------------------------------------------------------------------------
// Reader-based loader (enables testing without temp files)
// ---------------------------------------------------------------------------

pub(crate) fn load_players_from_reader<R: Read>(
    rdr: R,
    player_type: PlayerType,
) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<Row>() {
        match result {
            Ok(row) => match player_from_row(&row, player_type) {
                Some(p) => players.push(p),
                None => warn!("skipping {} row without id/name", player_type),
            },
            Err(e) => {
                warn!("skipping malformed {} row: {}", player_type, e);
            }
        }
    }
    Ok(players)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load players of one type from a CSV file.
pub fn load_players(path: &Path, player_type: PlayerType) -> Result<Vec<Player>, RosterError> {
    let file = std::fs::File::open(path).map_err(|e| RosterError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_players_from_reader(file, player_type).map_err(|e| RosterError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load both roster files into one `Roster`.
pub fn load_roster(hitters: &Path, pitchers: &Path) -> Result<Roster, RosterError> {
    let hitter_rows = load_players(hitters, PlayerType::Hitter)?;
    let pitcher_rows = load_players(pitchers, PlayerType::Pitcher)?;

    if hitter_rows.is_empty() {
        return Err(RosterError::Validation(
            "hitter CSV produced zero valid rows".into(),
        ));
    }
    if pitcher_rows.is_empty() {
        return Err(RosterError::Validation(
            "pitcher CSV produced zero valid rows".into(),
        ));
    }

    info!(
        "loaded {} hitters and {} pitchers",
        hitter_rows.len(),
        pitcher_rows.len()
    );
    Ok(Roster::new(hitter_rows.into_iter().chain(pitcher_rows).collect()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
