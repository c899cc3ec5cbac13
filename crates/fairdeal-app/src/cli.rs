// Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fairdeal_baseball::contract::{ContractTermsInput, SalaryCurve};
use fairdeal_baseball::player::{PlayerType, StatWindow};
use fairdeal_baseball::valuation::ValuationSettings;

use crate::config::{self, ConfigError, EngineConfig};
use crate::selection::SelectionRequest;

/// Fair contract estimates from comparable signings
#[derive(Debug, Parser)]
#[command(name = "fairdeal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding config/ and defaults/
    #[arg(long, global = true, default_value = ".")]
    pub config_dir: PathBuf,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Value a player against a cohort of signed comparables
    Value(ValueArgs),

    /// Lay out a contract season by season
    Structure(StructureArgs),

    /// List signed comparables on the roster
    Comps {
        /// Player type to list
        #[arg(value_enum)]
        player_type: PlayerTypeArg,

        /// Only comparables at this position
        #[arg(short, long)]
        position: Option<String>,
    },

    /// List tracked stats and effective weights
    Stats {
        /// Player type to list
        #[arg(value_enum)]
        player_type: PlayerTypeArg,

        /// Position weight preset
        #[arg(short, long)]
        position: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// value
// ---------------------------------------------------------------------------

#[derive(Debug, Args)]
pub struct ValueArgs {
    /// Subject player id
    #[arg(short, long)]
    pub player: Option<String>,

    /// Comparable player ids (comma separated or repeated)
    #[arg(short, long, value_delimiter = ',')]
    pub comps: Vec<String>,

    /// Weight preset position (defaults to the subject's position)
    #[arg(long)]
    pub position: Option<String>,

    /// Annual AAV inflation in percent
    #[arg(long)]
    pub inflation: Option<f64>,

    /// Year comparable contracts are inflated to
    #[arg(long)]
    pub present_year: Option<i32>,

    /// Keep the baseline AAV (multiplier fixed at 1.0)
    #[arg(long)]
    pub no_aav_adjust: bool,

    /// Keep the baseline term (no age/performance adjustment)
    #[arg(long)]
    pub no_years_adjust: bool,

    /// Subject stat window
    #[arg(long, value_enum)]
    pub window: Option<WindowArg>,

    /// Weight override as key=value (repeatable)
    #[arg(short = 'w', long = "weight")]
    pub weights: Vec<String>,

    /// Hitter roster CSV (overrides config)
    #[arg(long)]
    pub hitters: Option<PathBuf>,

    /// Pitcher roster CSV (overrides config)
    #[arg(long)]
    pub pitchers: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WindowArg {
    ThreeYear,
    Current,
}

impl From<WindowArg> for StatWindow {
    fn from(w: WindowArg) -> Self {
        match w {
            WindowArg::ThreeYear => StatWindow::ThreeYear,
            WindowArg::Current => StatWindow::Current,
        }
    }
}

impl ValueArgs {
    /// Layer command-line flags over the configured engine settings.
    pub fn engine(&self, base: &EngineConfig) -> EngineConfig {
        EngineConfig {
            present_year: self.present_year.unwrap_or(base.present_year),
            inflation_pct: self.inflation.unwrap_or(base.inflation_pct),
            adjust_aav: base.adjust_aav && !self.no_aav_adjust,
            adjust_years: base.adjust_years && !self.no_years_adjust,
            subject_window: self.window.map_or(base.subject_window, StatWindow::from),
        }
    }

    pub fn request(&self, engine: &EngineConfig) -> SelectionRequest {
        SelectionRequest {
            subject_id: self.player.clone(),
            comp_ids: self.comps.clone(),
            position: self.position.clone(),
            inflation_pct: engine.inflation_pct,
            weight_overrides: self.weights.clone(),
        }
    }
}

pub fn valuation_settings(engine: &EngineConfig) -> ValuationSettings {
    ValuationSettings {
        present_year: engine.present_year,
        subject_window: engine.subject_window,
        adjust_aav: engine.adjust_aav,
        adjust_years: engine.adjust_years,
    }
}

// ---------------------------------------------------------------------------
// structure
// ---------------------------------------------------------------------------

#[derive(Debug, Args)]
pub struct StructureArgs {
    /// TOML file with the contract terms (replaces the term flags)
    #[arg(
        long,
        conflicts_with_all = [
            "years",
            "aav",
            "signing_bonus",
            "curve",
            "load_pct",
            "deferral_pct",
            "deferral_years",
            "deferral_interest_pct",
            "team_option_year",
            "opt_out_after",
        ]
    )]
    pub from_file: Option<PathBuf>,

    /// Contract length in seasons
    #[arg(long, required_unless_present = "from_file")]
    pub years: Option<u32>,

    /// Average annual value, in millions
    #[arg(long, required_unless_present = "from_file")]
    pub aav: Option<f64>,

    /// Signing bonus paid in season one, in millions
    #[arg(long, default_value_t = 0.0)]
    pub signing_bonus: f64,

    /// Salary curve
    #[arg(long, value_enum, default_value_t = CurveArg::Even)]
    pub curve: CurveArg,

    /// Percent by which loaded seasons exceed the AAV
    #[arg(long, default_value_t = 0.0)]
    pub load_pct: f64,

    /// Percent of each season's pay deferred
    #[arg(long, default_value_t = 0.0)]
    pub deferral_pct: f64,

    /// Seasons over which deferred money is paid out
    #[arg(long, default_value_t = 0)]
    pub deferral_years: u32,

    /// Annual interest on deferred money, in percent
    #[arg(long, default_value_t = 0.0)]
    pub deferral_interest_pct: f64,

    /// Season (1-based) that is a team option
    #[arg(long)]
    pub team_option_year: Option<u32>,

    /// Player may opt out after this season (1-based)
    #[arg(long)]
    pub opt_out_after: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CurveArg {
    Even,
    FrontLoaded,
    BackLoaded,
}

impl From<CurveArg> for SalaryCurve {
    fn from(c: CurveArg) -> Self {
        match c {
            CurveArg::Even => SalaryCurve::Even,
            CurveArg::FrontLoaded => SalaryCurve::FrontLoaded,
            CurveArg::BackLoaded => SalaryCurve::BackLoaded,
        }
    }
}

impl StructureArgs {
    /// Terms from `--from-file` when given, otherwise from the flags.
    pub fn terms(&self) -> Result<ContractTermsInput, ConfigError> {
        if let Some(path) = &self.from_file {
            return config::load_terms(path);
        }
        Ok(ContractTermsInput {
            total_years: self.years.unwrap_or_default(),
            aav: self.aav.unwrap_or_default(),
            signing_bonus: self.signing_bonus,
            curve: self.curve.into(),
            load_pct: self.load_pct,
            deferral_pct: self.deferral_pct,
            deferral_years: self.deferral_years,
            deferral_interest_pct: self.deferral_interest_pct,
            team_option_year: self.team_option_year,
            opt_out_after_year: self.opt_out_after,
        })
    }
}

// ---------------------------------------------------------------------------
// stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerTypeArg {
    Hitter,
    Pitcher,
}

impl From<PlayerTypeArg> for PlayerType {
    fn from(t: PlayerTypeArg) -> Self {
        match t {
            PlayerTypeArg::Hitter => PlayerType::Hitter,
            PlayerTypeArg::Pitcher => PlayerType::Pitcher,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
