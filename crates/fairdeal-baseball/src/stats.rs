// Static stat descriptor tables and position-keyed weight presets.

use crate::player::{HitterStat, PitcherStat, PlayerType, StatKey};

// ---------------------------------------------------------------------------
// Descriptor types
// ---------------------------------------------------------------------------

/// How a stat value is rendered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatScale {
    /// Plain number at the descriptor's precision.
    Raw,
    /// Stored in percentage points; rendered with a `%` suffix.
    Percentage,
    /// Plain decimal at the descriptor's precision.
    Decimal,
    /// Baseball-style rate with the leading zero dropped (`.345`).
    Rate,
    /// Signed run value (`+4.2`). Runs-scaled stats can be negative and are
    /// compared on an additive scale rather than as a ratio.
    Runs,
}

/// Metadata for a single tracked statistic.
#[derive(Debug, Clone, Copy)]
pub struct StatDescriptor {
    pub key: StatKey,
    pub label: &'static str,
    pub higher_is_better: bool,
    pub default_weight: f64,
    pub decimals: usize,
    pub scale: StatScale,
}

impl StatDescriptor {
    /// Whether the stat is a signed defensive/baserunning metric.
    pub fn is_signed_runs(&self) -> bool {
        self.scale == StatScale::Runs
    }

    /// Format a value for display according to scale and precision.
    pub fn format(&self, value: f64) -> String {
        let prec = self.decimals;
        match self.scale {
            StatScale::Raw | StatScale::Decimal => format!("{value:.prec$}"),
            StatScale::Percentage => format!("{value:.prec$}%"),
            StatScale::Rate => {
                let s = format!("{value:.prec$}");
                if let Some(rest) = s.strip_prefix("0.") {
                    format!(".{rest}")
                } else if let Some(rest) = s.strip_prefix("-0.") {
                    format!("-.{rest}")
                } else {
                    s
                }
            }
            StatScale::Runs => format!("{value:+.prec$}"),
        }
    }
}

const fn hitter(
    stat: HitterStat,
    label: &'static str,
    higher_is_better: bool,
    default_weight: f64,
    decimals: usize,
    scale: StatScale,
) -> StatDescriptor {
    StatDescriptor {
        key: StatKey::Hitter(stat),
        label,
        higher_is_better,
        default_weight,
        decimals,
        scale,
    }
}

const fn pitcher(
    stat: PitcherStat,
    label: &'static str,
    higher_is_better: bool,
    default_weight: f64,
    decimals: usize,
    scale: StatScale,
) -> StatDescriptor {
    StatDescriptor {
        key: StatKey::Pitcher(stat),
        label,
        higher_is_better,
        default_weight,
        decimals,
        scale,
    }
}

// ---------------------------------------------------------------------------
// Descriptor tables
// ---------------------------------------------------------------------------

pub const HITTER_STATS: &[StatDescriptor] = &[
    hitter(HitterStat::War, "WAR", true, 1.5, 1, StatScale::Decimal),
    hitter(HitterStat::WrcPlus, "wRC+", true, 1.5, 0, StatScale::Raw),
    hitter(HitterStat::Xwoba, "xwOBA", true, 1.0, 3, StatScale::Rate),
    hitter(HitterStat::Xslg, "xSLG", true, 1.0, 3, StatScale::Rate),
    hitter(HitterStat::HomeRuns, "HR", true, 0.8, 0, StatScale::Raw),
    hitter(HitterStat::BarrelPct, "Barrel%", true, 0.8, 1, StatScale::Percentage),
    hitter(HitterStat::ExitVelocity, "Exit Velo", true, 0.6, 1, StatScale::Decimal),
    hitter(HitterStat::BbPct, "BB%", true, 0.5, 1, StatScale::Percentage),
    hitter(HitterStat::KPct, "K%", false, 0.5, 1, StatScale::Percentage),
    hitter(HitterStat::DefRuns, "Defense", true, 1.0, 1, StatScale::Runs),
    hitter(HitterStat::BsrRuns, "Baserunning", true, 0.4, 1, StatScale::Runs),
];

pub const PITCHER_STATS: &[StatDescriptor] = &[
    pitcher(PitcherStat::War, "WAR", true, 1.5, 1, StatScale::Decimal),
    pitcher(PitcherStat::Era, "ERA", false, 1.2, 2, StatScale::Decimal),
    pitcher(PitcherStat::Fip, "FIP", false, 1.2, 2, StatScale::Decimal),
    pitcher(PitcherStat::Xfip, "xFIP", false, 1.0, 2, StatScale::Decimal),
    pitcher(PitcherStat::KPer9, "K/9", true, 1.0, 1, StatScale::Decimal),
    pitcher(PitcherStat::BbPer9, "BB/9", false, 0.6, 1, StatScale::Decimal),
    pitcher(PitcherStat::Whip, "WHIP", false, 1.0, 2, StatScale::Decimal),
    pitcher(PitcherStat::Ip, "IP", true, 0.8, 1, StatScale::Raw),
];

/// The active descriptor set for a player type.
pub fn descriptors(player_type: PlayerType) -> &'static [StatDescriptor] {
    match player_type {
        PlayerType::Hitter => HITTER_STATS,
        PlayerType::Pitcher => PITCHER_STATS,
    }
}

/// Look up the descriptor for a key.
pub fn descriptor(key: StatKey) -> Option<&'static StatDescriptor> {
    descriptors(key.player_type()).iter().find(|d| d.key == key)
}

// ---------------------------------------------------------------------------
// Position presets
// ---------------------------------------------------------------------------

/// Per-position weight overrides applied on top of descriptor defaults.
/// Stats not listed keep their default weight.
fn position_preset(position: &str) -> &'static [(StatKey, f64)] {
    use HitterStat as H;
    use PitcherStat as P;
    match position.trim().to_uppercase().as_str() {
        "C" => &[
            (StatKey::Hitter(H::DefRuns), 2.0),
            (StatKey::Hitter(H::BsrRuns), 0.2),
            (StatKey::Hitter(H::HomeRuns), 0.6),
        ],
        "SS" => &[
            (StatKey::Hitter(H::DefRuns), 1.8),
            (StatKey::Hitter(H::BsrRuns), 0.6),
        ],
        "2B" => &[
            (StatKey::Hitter(H::DefRuns), 1.4),
            (StatKey::Hitter(H::BsrRuns), 0.6),
        ],
        "CF" | "OF" => &[
            (StatKey::Hitter(H::DefRuns), 1.6),
            (StatKey::Hitter(H::BsrRuns), 0.8),
            (StatKey::Hitter(H::ExitVelocity), 0.5),
        ],
        "3B" => &[(StatKey::Hitter(H::DefRuns), 1.2)],
        "1B" => &[
            (StatKey::Hitter(H::DefRuns), 0.4),
            (StatKey::Hitter(H::HomeRuns), 1.2),
            (StatKey::Hitter(H::Xslg), 1.3),
            (StatKey::Hitter(H::BarrelPct), 1.0),
        ],
        "LF" | "RF" => &[
            (StatKey::Hitter(H::DefRuns), 0.8),
            (StatKey::Hitter(H::HomeRuns), 1.0),
        ],
        "DH" => &[
            (StatKey::Hitter(H::DefRuns), 0.0),
            (StatKey::Hitter(H::BsrRuns), 0.2),
            (StatKey::Hitter(H::WrcPlus), 2.0),
            (StatKey::Hitter(H::Xwoba), 1.3),
        ],
        "SP" => &[
            (StatKey::Pitcher(P::War), 1.8),
            (StatKey::Pitcher(P::Ip), 1.2),
            (StatKey::Pitcher(P::KPer9), 1.1),
        ],
        "RP" | "CL" => &[
            (StatKey::Pitcher(P::War), 1.0),
            (StatKey::Pitcher(P::Ip), 0.3),
            (StatKey::Pitcher(P::KPer9), 1.4),
            (StatKey::Pitcher(P::Whip), 1.2),
        ],
        _ => &[],
    }
}

// ---------------------------------------------------------------------------
// StatWeights
// ---------------------------------------------------------------------------

/// Effective per-stat weights for one valuation, in descriptor order.
///
/// Weights are independent; the multiplier engine normalizes by their total.
#[derive(Debug, Clone, PartialEq)]
pub struct StatWeights {
    entries: Vec<(StatKey, f64)>,
}

impl StatWeights {
    /// Descriptor default weights for a player type.
    pub fn defaults(player_type: PlayerType) -> Self {
        StatWeights {
            entries: descriptors(player_type)
                .iter()
                .map(|d| (d.key, d.default_weight))
                .collect(),
        }
    }

    /// Defaults with the position preset applied. Presets for the other
    /// player type (e.g. "SP" for a hitter) are ignored.
    pub fn for_position(player_type: PlayerType, position: &str) -> Self {
        let mut weights = Self::defaults(player_type);
        for (key, weight) in position_preset(position) {
            weights.set(*key, *weight);
        }
        weights
    }

    /// Set a weight. Returns false if the key is not in this set.
    pub fn set(&mut self, key: StatKey, weight: f64) -> bool {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => {
                entry.1 = weight;
                true
            }
            None => false,
        }
    }

    /// Weight for a key; 0.0 for keys outside this set.
    pub fn get(&self, key: StatKey) -> f64 {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(0.0, |(_, w)| *w)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKey, f64)> + '_ {
        self.entries.iter().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_stat_has_exactly_one_descriptor() {
        for stat in HitterStat::ALL {
            let n = HITTER_STATS
                .iter()
                .filter(|d| d.key == StatKey::Hitter(stat))
                .count();
            assert_eq!(n, 1, "hitter stat {:?}", stat);
        }
        for stat in PitcherStat::ALL {
            let n = PITCHER_STATS
                .iter()
                .filter(|d| d.key == StatKey::Pitcher(stat))
                .count();
            assert_eq!(n, 1, "pitcher stat {:?}", stat);
        }
    }

    #[test]
    fn descriptor_keys_are_unique_per_table() {
        let keys: HashSet<&str> = HITTER_STATS.iter().map(|d| d.key.key()).collect();
        assert_eq!(keys.len(), HITTER_STATS.len());
        let keys: HashSet<&str> = PITCHER_STATS.iter().map(|d| d.key.key()).collect();
        assert_eq!(keys.len(), PITCHER_STATS.len());
    }

    #[test]
    fn only_defense_and_baserunning_are_signed() {
        let signed: Vec<&str> = HITTER_STATS
            .iter()
            .filter(|d| d.is_signed_runs())
            .map(|d| d.key.key())
            .collect();
        assert_eq!(signed, vec!["def", "bsr"]);
        assert!(PITCHER_STATS.iter().all(|d| !d.is_signed_runs()));
    }

    #[test]
    fn formatting_by_scale() {
        let xwoba = descriptor(StatKey::Hitter(HitterStat::Xwoba)).unwrap();
        assert_eq!(xwoba.format(0.3456), ".346");
        let k_pct = descriptor(StatKey::Hitter(HitterStat::KPct)).unwrap();
        assert_eq!(k_pct.format(22.35), "22.4%");
        let def = descriptor(StatKey::Hitter(HitterStat::DefRuns)).unwrap();
        assert_eq!(def.format(4.2), "+4.2");
        assert_eq!(def.format(-3.0), "-3.0");
        let era = descriptor(StatKey::Pitcher(PitcherStat::Era)).unwrap();
        assert_eq!(era.format(3.1), "3.10");
    }

    #[test]
    fn position_preset_overrides_defaults() {
        let ss = StatWeights::for_position(PlayerType::Hitter, "ss");
        assert!((ss.get(StatKey::Hitter(HitterStat::DefRuns)) - 1.8).abs() < f64::EPSILON);
        // Untouched stats keep their default.
        assert!((ss.get(StatKey::Hitter(HitterStat::War)) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_position_uses_defaults() {
        let w = StatWeights::for_position(PlayerType::Pitcher, "XX");
        assert_eq!(w, StatWeights::defaults(PlayerType::Pitcher));
    }

    #[test]
    fn cross_type_preset_is_ignored() {
        let w = StatWeights::for_position(PlayerType::Hitter, "SP");
        assert_eq!(w, StatWeights::defaults(PlayerType::Hitter));
    }

    #[test]
    fn set_rejects_foreign_key() {
        let mut w = StatWeights::defaults(PlayerType::Hitter);
        assert!(!w.set(StatKey::Pitcher(PitcherStat::Era), 2.0));
        assert!(w.set(StatKey::Hitter(HitterStat::War), 3.0));
        assert!((w.get(StatKey::Hitter(HitterStat::War)) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_sums_all_weights() {
        let w = StatWeights::defaults(PlayerType::Pitcher);
        let expected: f64 = PITCHER_STATS.iter().map(|d| d.default_weight).sum();
        assert!((w.total() - expected).abs() < 1e-12);
    }
}
