// Flat CSV stat export: one row per player, one column per category.
//
// Required columns: team_id, player_id. Optional: name, team_name. Every other
// column is read as a category keyed by its header.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use puckswap_core::stats::PlayerStatLine;
use tracing::warn;

use super::{read_snapshot_file, ProviderError, RosterProvider, RosterSnapshot};

const TEAM_COLUMN: &str = "team_id";
const PLAYER_COLUMN: &str = "player_id";
const NAME_COLUMN: &str = "name";
const TEAM_NAME_COLUMN: &str = "team_name";

fn is_reserved(column: &str) -> bool {
    matches!(
        column,
        TEAM_COLUMN | PLAYER_COLUMN | NAME_COLUMN | TEAM_NAME_COLUMN
    )
}

fn non_empty(row: &BTreeMap<String, String>, column: &str) -> Option<String> {
    row.get(column)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Build the stat line for one row. A cell that is neither blank, `-` nor a
/// finite number fails the whole load.
fn parse_row(
    row: &BTreeMap<String, String>,
    team_id: &str,
    player_id: &str,
) -> Result<PlayerStatLine, ProviderError> {
    let mut line = PlayerStatLine::new(player_id, team_id);
    line.name = non_empty(row, NAME_COLUMN);

    for (column, cell) in row.iter().filter(|(c, _)| !is_reserved(c)) {
        let cell = cell.trim();
        let value = if cell.is_empty() || cell == "-" {
            None
        } else {
            match cell.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => {
                    return Err(ProviderError::BadStatValue {
                        player_id: player_id.to_string(),
                        stat_id: column.clone(),
                        value: cell.to_string(),
                    })
                }
            }
        };
        line.values.insert(column.clone(), value);
    }

    Ok(line)
}

/// Read every row of a stat export. `source` names the input in errors.
///
/// Rows missing a team or player id are skipped with a warning. A row of the
/// wrong width or with an unreadable value is an error.
pub fn load_stats_from_reader<R: Read>(
    rdr: R,
    source: &str,
) -> Result<RosterSnapshot, ProviderError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(rdr);
    let mut snapshot = RosterSnapshot::default();

    for (index, result) in reader.deserialize::<BTreeMap<String, String>>().enumerate() {
        let row = result.map_err(|e| ProviderError::Csv {
            path: source.to_string(),
            source: e,
        })?;
        let (Some(team_id), Some(player_id)) =
            (non_empty(&row, TEAM_COLUMN), non_empty(&row, PLAYER_COLUMN))
        else {
            warn!("skipping stat row {} in {}: missing team_id or player_id", index + 1, source);
            continue;
        };

        let line = parse_row(&row, &team_id, &player_id)?;
        if let Some(team_name) = non_empty(&row, TEAM_NAME_COLUMN) {
            snapshot.team_names.insert(team_id, team_name);
        }
        snapshot.lines.push(line);
    }

    Ok(snapshot)
}

/// Reads a flat per-player CSV export.
#[derive(Debug, Clone)]
pub struct CsvStatProvider {
    path: PathBuf,
}

impl CsvStatProvider {
    pub fn new(path: &Path) -> Self {
        CsvStatProvider {
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl RosterProvider for CsvStatProvider {
    async fn load(&self) -> Result<RosterSnapshot, ProviderError> {
        let path = self.path.display().to_string();
        let bytes = read_snapshot_file(&self.path).await?;
        let snapshot = load_stats_from_reader(bytes.as_slice(), &path)?;
        if snapshot.lines.is_empty() {
            return Err(ProviderError::Empty { path });
        }
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        format!("stat export {}", self.path.display())
    }
}
