// Roster dump decoding.
//
// The dump is a JSON object keyed by team:
//   {league, lastUpdated, teams: {team_key: {team_key, team_name,
//     players: [{player_key, player_id, name, ..., stats: {stat_id: value}}]}}}
// Stat values arrive as numbers, numeric strings, "-" or null depending on
// how the upstream API felt that day; everything is normalised here.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use puckswap_core::category::CategorySet;
use puckswap_core::stats::PlayerStatLine;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{read_snapshot_file, ProviderError, RosterProvider, RosterSnapshot};

// ---------------------------------------------------------------------------
// Raw serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawRosterDump {
    #[serde(default)]
    league: Option<String>,
    #[serde(default, rename = "lastUpdated")]
    last_updated: Option<String>,
    #[serde(default)]
    teams: BTreeMap<String, RawTeam>,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    #[serde(default)]
    team_key: Option<String>,
    #[serde(default)]
    team_name: Option<String>,
    #[serde(default)]
    players: Vec<RawPlayer>,
}

#[derive(Debug, Deserialize)]
struct RawPlayer {
    #[serde(default)]
    player_key: Option<String>,
    #[serde(default)]
    player_id: Option<RawId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    stats: Option<RawStats>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Stats either as the flattened `{stat_id: value}` map or as the upstream
/// list of `{stat_id, value}` entries.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawStats {
    Map(BTreeMap<String, Option<RawStatValue>>),
    List(Vec<RawStatEntry>),
}

#[derive(Debug, Deserialize)]
struct RawStatEntry {
    stat_id: RawId,
    #[serde(default)]
    value: Option<RawStatValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawStatValue {
    Number(f64),
    Text(String),
}

impl RawStats {
    fn into_pairs(self) -> Vec<(String, Option<RawStatValue>)> {
        match self {
            RawStats::Map(map) => map.into_iter().collect(),
            RawStats::List(entries) => entries
                .into_iter()
                .map(|e| (e.stat_id.into_string(), e.value))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Normalise one stat value. Numbers and numeric strings are values;
/// `null`, `""` and `"-"` mean "no data". Anything else is an error.
fn decode_stat_value(raw: Option<&RawStatValue>) -> Result<Option<f64>, String> {
    match raw {
        None => Ok(None),
        Some(RawStatValue::Number(n)) if n.is_finite() => Ok(Some(*n)),
        Some(RawStatValue::Number(n)) => Err(n.to_string()),
        Some(RawStatValue::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed == "-" {
                return Ok(None);
            }
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Some(n)),
                _ => Err(text.clone()),
            }
        }
    }
}

/// Decode a roster dump into a snapshot.
///
/// Stat ids are renamed to category names through `categories`; ids listed in
/// `ignored` are dropped. Ids that are neither pass through under their raw
/// id so the aggregator can report them as unknown categories.
fn decode(
    dump: RawRosterDump,
    categories: &CategorySet,
    ignored: &HashSet<String>,
) -> Result<RosterSnapshot, ProviderError> {
    let mut team_names = BTreeMap::new();
    let mut lines = Vec::new();

    for (key, team) in dump.teams {
        let team_id = team.team_key.unwrap_or(key);
        let team_name = team.team_name.unwrap_or_else(|| team_id.clone());
        team_names.insert(team_id.clone(), team_name);

        if team.players.is_empty() {
            debug!("team {} has an empty roster", team_id);
        }

        for player in team.players {
            let player_id = match (player.player_key, player.player_id) {
                (Some(key), _) if !key.trim().is_empty() => key,
                (_, Some(id)) => id.into_string(),
                _ => {
                    warn!(
                        "skipping player '{}' on team {}: no player key",
                        player.name.as_deref().unwrap_or("?"),
                        team_id
                    );
                    continue;
                }
            };

            let mut line = PlayerStatLine::new(&player_id, &team_id);
            line.name = player.name.map(|n| n.trim().to_string());

            for (stat_id, raw) in player.stats.map(RawStats::into_pairs).unwrap_or_default() {
                if ignored.contains(&stat_id) {
                    continue;
                }
                let value = decode_stat_value(raw.as_ref()).map_err(|value| {
                    ProviderError::BadStatValue {
                        player_id: player_id.clone(),
                        stat_id: stat_id.clone(),
                        value,
                    }
                })?;
                let category = categories
                    .by_stat_id(&stat_id)
                    .map(|c| c.name.clone())
                    .unwrap_or(stat_id);
                line.values.insert(category, value);
            }

            lines.push(line);
        }
    }

    Ok(RosterSnapshot {
        league: dump.league,
        last_updated: dump.last_updated,
        team_names,
        lines,
    })
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Reads the roster dump written by the league fetch job.
#[derive(Debug, Clone)]
pub struct JsonRosterProvider {
    path: PathBuf,
    categories: CategorySet,
    ignored: HashSet<String>,
}

impl JsonRosterProvider {
    pub fn new(path: &Path, categories: CategorySet, ignored: HashSet<String>) -> Self {
        JsonRosterProvider {
            path: path.to_path_buf(),
            categories,
            ignored,
        }
    }
}

#[async_trait]
impl RosterProvider for JsonRosterProvider {
    async fn load(&self) -> Result<RosterSnapshot, ProviderError> {
        let path = self.path.display().to_string();
        let bytes = read_snapshot_file(&self.path).await?;
        let dump: RawRosterDump =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::Json {
                path: path.clone(),
                source: e,
            })?;

        let snapshot = decode(dump, &self.categories, &self.ignored)?;
        if snapshot.lines.is_empty() {
            return Err(ProviderError::Empty { path });
        }
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        format!("roster dump {}", self.path.display())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
