// Roster data providers: turn an on-disk snapshot into clean stat lines.
//
// Upstream payload shapes stop here. Everything past this module only sees
// `PlayerStatLine` records.

pub mod roster_json;
pub mod stat_csv;

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use puckswap_core::stats::PlayerStatLine;
use puckswap_core::TeamId;

use crate::config::{Config, SnapshotFormat};

pub use roster_json::JsonRosterProvider;
pub use stat_csv::CsvStatProvider;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One league-wide snapshot of player stats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterSnapshot {
    pub league: Option<String>,
    pub last_updated: Option<String>,
    /// Team display names, including teams whose roster came back empty.
    pub team_names: BTreeMap<TeamId, String>,
    pub lines: Vec<PlayerStatLine>,
}

impl RosterSnapshot {
    pub fn team_name<'a>(&'a self, team_id: &'a str) -> &'a str {
        self.team_names
            .get(team_id)
            .map(String::as_str)
            .unwrap_or(team_id)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("player `{player_id}` has unreadable value {value:?} for stat `{stat_id}`")]
    BadStatValue {
        player_id: String,
        stat_id: String,
        value: String,
    },

    #[error("snapshot {path} contains no player stat lines")]
    Empty { path: String },
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Source of a roster snapshot. Implementations do all the I/O; the analysis
/// pipeline runs after `load` returns.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    async fn load(&self) -> Result<RosterSnapshot, ProviderError>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// Pick the provider matching the configured snapshot format.
pub fn from_config(config: &Config) -> Box<dyn RosterProvider> {
    let path = Path::new(&config.data_paths.snapshot);
    match config.data_paths.format {
        SnapshotFormat::Json => Box::new(JsonRosterProvider::new(
            path,
            config.category_set(),
            config.ignored_stat_ids(),
        )),
        SnapshotFormat::Csv => Box::new(CsvStatProvider::new(path)),
    }
}

pub(crate) async fn read_snapshot_file(path: &Path) -> Result<Vec<u8>, ProviderError> {
    tokio::fs::read(path).await.map_err(|e| ProviderError::Io {
        path: path.display().to_string(),
        source: e,
    })
}
