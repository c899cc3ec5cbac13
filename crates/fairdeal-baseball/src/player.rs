// Player records: identity, tagged hitter/pitcher stat snapshots, and the
// contract facts carried by signed comparables.

use serde::{Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Player type
// ---------------------------------------------------------------------------

/// Hitter or pitcher. Selects the descriptor table, the age curves and the
/// weight presets used for a valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerType {
    Hitter,
    Pitcher,
}

impl PlayerType {
    pub fn is_pitcher(&self) -> bool {
        matches!(self, PlayerType::Pitcher)
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerType::Hitter => write!(f, "hitter"),
            PlayerType::Pitcher => write!(f, "pitcher"),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// One statistical window for a hitter. Missing source values load as 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitterSnapshot {
    pub war: f64,
    pub wrc_plus: f64,
    pub xwoba: f64,
    pub xslg: f64,
    /// Holds an absolute home-run count despite the column name. Consumers
    /// round it rather than multiplying by `pa`.
    pub hr_per_pa: f64,
    pub barrel_pct: f64,
    pub exit_velocity: f64,
    pub bb_pct: f64,
    pub k_pct: f64,
    pub pa: f64,
    pub def_runs: f64,
    pub bsr_runs: f64,
    pub age: f64,
}

/// One statistical window for a pitcher.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PitcherSnapshot {
    pub war: f64,
    pub era: f64,
    pub fip: f64,
    pub xfip: f64,
    pub k_per_9: f64,
    pub bb_per_9: f64,
    pub whip: f64,
    pub ip: f64,
    pub age: f64,
}

/// Which window of the subject's stats to compare against the cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatWindow {
    Current,
    #[default]
    ThreeYear,
}

/// The three snapshots of a player, tagged by player type.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerStats {
    Hitter {
        current: HitterSnapshot,
        three_year: HitterSnapshot,
        pre_signing: Option<HitterSnapshot>,
    },
    Pitcher {
        current: PitcherSnapshot,
        three_year: PitcherSnapshot,
        pre_signing: Option<PitcherSnapshot>,
    },
}

// ---------------------------------------------------------------------------
// Stat keys
// ---------------------------------------------------------------------------

/// Statistics tracked for hitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitterStat {
    War,
    WrcPlus,
    Xwoba,
    Xslg,
    HomeRuns,
    BarrelPct,
    ExitVelocity,
    BbPct,
    KPct,
    DefRuns,
    BsrRuns,
}

impl HitterStat {
    pub const ALL: [HitterStat; 11] = [
        HitterStat::War,
        HitterStat::WrcPlus,
        HitterStat::Xwoba,
        HitterStat::Xslg,
        HitterStat::HomeRuns,
        HitterStat::BarrelPct,
        HitterStat::ExitVelocity,
        HitterStat::BbPct,
        HitterStat::KPct,
        HitterStat::DefRuns,
        HitterStat::BsrRuns,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            HitterStat::War => "war",
            HitterStat::WrcPlus => "wrc_plus",
            HitterStat::Xwoba => "xwoba",
            HitterStat::Xslg => "xslg",
            HitterStat::HomeRuns => "hr",
            HitterStat::BarrelPct => "barrel_pct",
            HitterStat::ExitVelocity => "ev",
            HitterStat::BbPct => "bb_pct",
            HitterStat::KPct => "k_pct",
            HitterStat::DefRuns => "def",
            HitterStat::BsrRuns => "bsr",
        }
    }

    /// Read this stat from a snapshot. Home runs are the rounded stored count.
    pub fn value(&self, s: &HitterSnapshot) -> f64 {
        match self {
            HitterStat::War => s.war,
            HitterStat::WrcPlus => s.wrc_plus,
            HitterStat::Xwoba => s.xwoba,
            HitterStat::Xslg => s.xslg,
            HitterStat::HomeRuns => s.hr_per_pa.round(),
            HitterStat::BarrelPct => s.barrel_pct,
            HitterStat::ExitVelocity => s.exit_velocity,
            HitterStat::BbPct => s.bb_pct,
            HitterStat::KPct => s.k_pct,
            HitterStat::DefRuns => s.def_runs,
            HitterStat::BsrRuns => s.bsr_runs,
        }
    }
}

/// Statistics tracked for pitchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitcherStat {
    War,
    Era,
    Fip,
    Xfip,
    KPer9,
    BbPer9,
    Whip,
    Ip,
}

impl PitcherStat {
    pub const ALL: [PitcherStat; 8] = [
        PitcherStat::War,
        PitcherStat::Era,
        PitcherStat::Fip,
        PitcherStat::Xfip,
        PitcherStat::KPer9,
        PitcherStat::BbPer9,
        PitcherStat::Whip,
        PitcherStat::Ip,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PitcherStat::War => "war",
            PitcherStat::Era => "era",
            PitcherStat::Fip => "fip",
            PitcherStat::Xfip => "xfip",
            PitcherStat::KPer9 => "k9",
            PitcherStat::BbPer9 => "bb9",
            PitcherStat::Whip => "whip",
            PitcherStat::Ip => "ip",
        }
    }

    pub fn value(&self, s: &PitcherSnapshot) -> f64 {
        match self {
            PitcherStat::War => s.war,
            PitcherStat::Era => s.era,
            PitcherStat::Fip => s.fip,
            PitcherStat::Xfip => s.xfip,
            PitcherStat::KPer9 => s.k_per_9,
            PitcherStat::BbPer9 => s.bb_per_9,
            PitcherStat::Whip => s.whip,
            PitcherStat::Ip => s.ip,
        }
    }
}

/// A statistic key for either player type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKey {
    Hitter(HitterStat),
    Pitcher(PitcherStat),
}

impl StatKey {
    pub fn key(&self) -> &'static str {
        match self {
            StatKey::Hitter(s) => s.key(),
            StatKey::Pitcher(s) => s.key(),
        }
    }

    pub fn player_type(&self) -> PlayerType {
        match self {
            StatKey::Hitter(_) => PlayerType::Hitter,
            StatKey::Pitcher(_) => PlayerType::Pitcher,
        }
    }

    /// Resolve a key string (as used in config files and CSV headers) for the
    /// given player type.
    pub fn parse(player_type: PlayerType, key: &str) -> Option<StatKey> {
        let key = key.trim().to_lowercase();
        match player_type {
            PlayerType::Hitter => HitterStat::ALL
                .iter()
                .find(|s| s.key() == key)
                .map(|s| StatKey::Hitter(*s)),
            PlayerType::Pitcher => PitcherStat::ALL
                .iter()
                .find(|s| s.key() == key)
                .map(|s| StatKey::Pitcher(*s)),
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for StatKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Contract facts
// ---------------------------------------------------------------------------

/// Contract terms of a signed comparable. AAV is in millions of dollars.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractTerms {
    pub aav: f64,
    pub years: f64,
    pub signed_year: Option<i32>,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub team: String,
    pub position: String,
    pub stats: PlayerStats,
    pub contract: Option<ContractTerms>,
}

impl Player {
    pub fn player_type(&self) -> PlayerType {
        match self.stats {
            PlayerStats::Hitter { .. } => PlayerType::Hitter,
            PlayerStats::Pitcher { .. } => PlayerType::Pitcher,
        }
    }

    pub fn is_pitcher(&self) -> bool {
        self.player_type().is_pitcher()
    }

    /// Whether this player can serve as a comparable (has a signed contract).
    pub fn is_comparable(&self) -> bool {
        self.contract.as_ref().is_some_and(|c| c.aav > 0.0)
    }

    /// Stat value for a subject being valued, read from the chosen window.
    ///
    /// Returns 0.0 when the key belongs to the other player type.
    pub fn subject_value(&self, key: StatKey, window: StatWindow) -> f64 {
        match (&self.stats, key) {
            (PlayerStats::Hitter { current, three_year, .. }, StatKey::Hitter(stat)) => {
                match window {
                    StatWindow::Current => stat.value(current),
                    StatWindow::ThreeYear => stat.value(three_year),
                }
            }
            (PlayerStats::Pitcher { current, three_year, .. }, StatKey::Pitcher(stat)) => {
                match window {
                    StatWindow::Current => stat.value(current),
                    StatWindow::ThreeYear => stat.value(three_year),
                }
            }
            _ => 0.0,
        }
    }

    /// Stat value for a comparable: the pre-signing window when present,
    /// otherwise the trailing three years.
    pub fn comparable_value(&self, key: StatKey) -> f64 {
        match (&self.stats, key) {
            (PlayerStats::Hitter { three_year, pre_signing, .. }, StatKey::Hitter(stat)) => {
                stat.value(pre_signing.as_ref().unwrap_or(three_year))
            }
            (PlayerStats::Pitcher { three_year, pre_signing, .. }, StatKey::Pitcher(stat)) => {
                stat.value(pre_signing.as_ref().unwrap_or(three_year))
            }
            _ => 0.0,
        }
    }

    /// Age used for the subject: the current season's age, falling back to
    /// the three-year window when the current value is missing.
    pub fn current_age(&self) -> f64 {
        let (current, three_year) = match &self.stats {
            PlayerStats::Hitter { current, three_year, .. } => (current.age, three_year.age),
            PlayerStats::Pitcher { current, three_year, .. } => (current.age, three_year.age),
        };
        if current > 0.0 {
            current
        } else {
            three_year
        }
    }

    /// Age at signing for a comparable: pre-signing window, else three-year.
    /// A pre-signing window without a usable age also falls back.
    pub fn signing_age(&self) -> f64 {
        let (pre, three_year) = match &self.stats {
            PlayerStats::Hitter { three_year, pre_signing, .. } => {
                (pre_signing.as_ref().map(|s| s.age), three_year.age)
            }
            PlayerStats::Pitcher { three_year, pre_signing, .. } => {
                (pre_signing.as_ref().map(|s| s.age), three_year.age)
            }
        };
        match pre {
            Some(age) if age.is_finite() && age > 0.0 => age,
            _ => three_year,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
