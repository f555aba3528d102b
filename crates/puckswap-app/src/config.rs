// Configuration loading and parsing (league.toml, strategy.toml).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use puckswap_core::baseline::BaselineMethod;
use puckswap_core::category::{Category, CategorySet};
use puckswap_core::classify::Thresholds;
use puckswap_core::matcher::MatchConfig;
use puckswap_core::pipeline::AnalysisConfig;
use serde::Deserialize;
use thiserror::Error;

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
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub strategy: StrategyConfig,
    pub data_paths: DataPaths,
    pub output: OutputConfig,
}

impl Config {
    /// The scoring categories in league order.
    pub fn category_set(&self) -> CategorySet {
        CategorySet::new(
            self.league
                .categories
                .iter()
                .map(|c| {
                    let category = if c.higher_is_better {
                        Category::higher(&c.name)
                    } else {
                        Category::lower(&c.name)
                    };
                    Category {
                        stat_id: c.stat_id.clone(),
                        ..category
                    }
                })
                .collect(),
        )
    }

    /// Upstream stat ids the roster decoder drops.
    pub fn ignored_stat_ids(&self) -> HashSet<String> {
        self.league.ignored_stats.stat_ids.iter().cloned().collect()
    }

    pub fn analysis(&self) -> AnalysisConfig {
        self.strategy.analysis
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    #[serde(default = "default_game_code")]
    pub game_code: String,
    /// Upstream league key (e.g. `465.l.33140`). Informational; the snapshot
    /// carries its own.
    #[serde(default)]
    pub league_key: Option<String>,
    /// The team recommendations are generated for.
    pub my_team: String,
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub ignored_stats: IgnoredStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default = "default_true")]
    pub higher_is_better: bool,
    #[serde(default)]
    pub stat_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IgnoredStats {
    #[serde(default)]
    pub stat_ids: Vec<String>,
}

fn default_game_code() -> String {
    "nhl".into()
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    thresholds: Thresholds,
    #[serde(default)]
    baseline: BaselineSection,
    trades: TradesSection,
    data_paths: DataPaths,
    output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct BaselineSection {
    #[serde(default)]
    method: BaselineMethod,
}

#[derive(Debug, Clone, Deserialize)]
struct TradesSection {
    max_give: usize,
    give_pool_size: usize,
    min_net_gain: f64,
    max_recommendations: usize,
}

/// The public strategy config assembled from the strategy.toml sections.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub analysis: AnalysisConfig,
}

/// Format of the roster snapshot on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub snapshot: String,
    #[serde(default)]
    pub format: SnapshotFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub report: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml`, both relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    // --- strategy.toml (required) ---
    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    let trades = strategy_file.trades;
    let strategy = StrategyConfig {
        analysis: AnalysisConfig {
            thresholds: strategy_file.thresholds,
            baseline: strategy_file.baseline.method,
            matching: MatchConfig {
                max_give: trades.max_give,
                give_pool_size: trades.give_pool_size,
                min_net_gain: trades.min_net_gain,
            },
            max_recommendations: trades.max_recommendations,
        },
    };

    let config = Config {
        league: league_file.league,
        strategy,
        data_paths: strategy_file.data_paths,
        output: strategy_file.output,
    };

    validate(&config)?;

    Ok(config)
}

/// The files `load_config_from` reads from `config/`.
pub const CONFIG_FILES: [&str; 2] = ["league.toml", "strategy.toml"];

/// Copy each of `CONFIG_FILES` missing from `config/` out of `defaults/`.
/// Existing files are never overwritten. Returns the paths that were written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the crate root or ensure defaults/ is present",
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
    for file in CONFIG_FILES {
        let source = defaults_dir.join(file);
        let target = config_dir.join(file);
        if target.exists() || !source.is_file() {
            continue;
        }
        std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {}: {e}", source.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    // League validations
    if config.league.my_team.trim().is_empty() {
        return Err(invalid("league.my_team", "must not be empty".into()));
    }

    if config.league.categories.is_empty() {
        return Err(invalid(
            "league.categories",
            "at least one category is required".into(),
        ));
    }

    let mut seen = HashSet::new();
    for category in &config.league.categories {
        if !seen.insert(category.name.as_str()) {
            return Err(invalid(
                "league.categories",
                format!("duplicate category `{}`", category.name),
            ));
        }
    }

    // Strategy validations
    let analysis = &config.strategy.analysis;
    let weak = analysis.thresholds.weak_threshold;
    if !(weak > 0.0 && weak <= 1.0) {
        return Err(invalid(
            "thresholds.weak_threshold",
            format!("must be in (0.0, 1.0], got {weak}"),
        ));
    }

    let strong = analysis.thresholds.strong_threshold;
    if !(strong >= 1.0 && strong.is_finite()) {
        return Err(invalid(
            "thresholds.strong_threshold",
            format!("must be >= 1.0, got {strong}"),
        ));
    }

    let matching = &analysis.matching;
    if !(1..=2).contains(&matching.max_give) {
        return Err(invalid(
            "trades.max_give",
            format!("must be 1 or 2, got {}", matching.max_give),
        ));
    }

    if !(matching.min_net_gain > 0.0) {
        return Err(invalid(
            "trades.min_net_gain",
            format!("must be > 0, got {}", matching.min_net_gain),
        ));
    }

    let size_fields: &[(&str, usize)] = &[
        ("trades.give_pool_size", matching.give_pool_size),
        ("trades.max_recommendations", analysis.max_recommendations),
    ];
    for (name, val) in size_fields {
        if *val == 0 {
            return Err(invalid(name, "must be > 0".into()));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
