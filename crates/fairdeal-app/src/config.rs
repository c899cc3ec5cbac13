// Configuration loading and parsing (fairdeal.toml).

use fairdeal_baseball::contract::ContractTermsInput;
use fairdeal_baseball::player::{PlayerType, StatKey, StatWindow};
use fairdeal_baseball::valuation::cohort::DEFAULT_PRESENT_YEAR;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the single configuration file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "fairdeal.toml";

const PRESENT_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2200;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// fairdeal.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    #[serde(default)]
    pub weights: WeightOverrides,
    pub data_paths: DataPaths,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_present_year")]
    pub present_year: i32,
    #[serde(default)]
    pub inflation_pct: f64,
    #[serde(default = "default_true")]
    pub adjust_aav: bool,
    #[serde(default = "default_true")]
    pub adjust_years: bool,
    #[serde(default)]
    pub subject_window: StatWindow,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            present_year: DEFAULT_PRESENT_YEAR,
            inflation_pct: 0.0,
            adjust_aav: true,
            adjust_years: true,
            subject_window: StatWindow::default(),
        }
    }
}

fn default_present_year() -> i32 {
    DEFAULT_PRESENT_YEAR
}

fn default_true() -> bool {
    true
}

/// Per-stat weight overrides, keyed by stat key (`war`, `wrc_plus`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeightOverrides {
    #[serde(default)]
    pub hitter: HashMap<String, f64>,
    #[serde(default)]
    pub pitcher: HashMap<String, f64>,
}

impl WeightOverrides {
    pub fn for_type(&self, player_type: PlayerType) -> &HashMap<String, f64> {
        match player_type {
            PlayerType::Hitter => &self.hitter,
            PlayerType::Pitcher => &self.pitcher,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub hitters: String,
    pub pitchers: String,
}

impl DataPaths {
    /// Resolve both paths against `base_dir` unless already absolute.
    pub fn resolve(&self, base_dir: &Path) -> (PathBuf, PathBuf) {
        (base_dir.join(&self.hitters), base_dir.join(&self.pitchers))
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/fairdeal.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or pass --config-dir",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);
        if copy_default(&path, &target)? {
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Copy one default file unless `target` already exists. Returns whether a
/// copy was made. A failed copy never leaves a partial target behind.
fn copy_default(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let content = std::fs::read(source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read {}: {e}", source.display()),
    })?;

    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(dest) => dest,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            // user's copy wins
            return Ok(false);
        }
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            });
        }
    };

    if let Err(e) = std::io::Write::write_all(&mut dest, &content) {
        drop(dest);
        let _ = std::fs::remove_file(target);
        return Err(ConfigError::DefaultsCopyError {
            message: format!("failed to write {}: {e}", target.display()),
        });
    }
    Ok(true)
}

/// Copy missing defaults into `base_dir/config`, then load.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

/// Load contract terms from a TOML file.
///
/// Keys match `ContractTermsInput`; only `total_years` and `aav` are required.
pub fn load_terms(path: &Path) -> Result<ContractTermsInput, ConfigError> {
    let text = read_file(path)?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_engine(&config.engine)?;

    for player_type in [PlayerType::Hitter, PlayerType::Pitcher] {
        let mut keys: Vec<_> = config.weights.for_type(player_type).iter().collect();
        keys.sort_by(|a, b| a.0.cmp(b.0));
        for (key, weight) in keys {
            let field = format!("weights.{player_type}.{key}");
            if StatKey::parse(player_type, key).is_none() {
                return Err(ConfigError::ValidationError {
                    field,
                    message: format!("unknown {player_type} stat"),
                });
            }
            validate_weight(&field, *weight)?;
        }
    }

    if config.data_paths.hitters.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data_paths.hitters".into(),
            message: "must not be empty".into(),
        });
    }
    if config.data_paths.pitchers.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data_paths.pitchers".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

/// Engine settings checks, shared with command-line overrides.
pub fn validate_engine(engine: &EngineConfig) -> Result<(), ConfigError> {
    if !PRESENT_YEAR_RANGE.contains(&engine.present_year) {
        return Err(ConfigError::ValidationError {
            field: "engine.present_year".into(),
            message: format!(
                "must be between {} and {}, got {}",
                PRESENT_YEAR_RANGE.start(),
                PRESENT_YEAR_RANGE.end(),
                engine.present_year
            ),
        });
    }

    let rate = engine.inflation_pct;
    if !rate.is_finite() || rate < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "engine.inflation_pct".into(),
            message: format!("must be >= 0, got {rate}"),
        });
    }

    Ok(())
}

/// Contract terms checks, applied to flags and terms files alike.
pub fn validate_terms(terms: &ContractTermsInput) -> Result<(), ConfigError> {
    if terms.total_years == 0 {
        return Err(ConfigError::ValidationError {
            field: "total_years".into(),
            message: "contract length must be at least one season".into(),
        });
    }
    let money = [
        ("aav", terms.aav),
        ("signing_bonus", terms.signing_bonus),
        ("load_pct", terms.load_pct),
        ("deferral_pct", terms.deferral_pct),
        ("deferral_interest_pct", terms.deferral_interest_pct),
    ];
    for (field, value) in money {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::ValidationError {
                field: field.into(),
                message: format!("must be a finite number >= 0, got {value}"),
            });
        }
    }
    Ok(())
}

/// Weights may be zero (stat ignored) but not negative or non-finite.
fn validate_weight(field: &str, weight: f64) -> Result<(), ConfigError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(ConfigError::ValidationError {
            field: field.to_string(),
            message: format!("must be a finite number >= 0, got {weight}"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
