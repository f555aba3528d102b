// Player stat lines and team-level aggregation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::CategorySet;
use crate::error::AnalysisError;
use crate::{PlayerId, TeamId};

// ---------------------------------------------------------------------------
// Player stat line
// ---------------------------------------------------------------------------

/// One player's category values for a snapshot.
///
/// A `None` value means the player has no recorded stat for that category
/// (usually no games played). It counts as zero everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub values: BTreeMap<String, Option<f64>>,
}

impl PlayerStatLine {
    pub fn new(player_id: &str, team_id: &str) -> Self {
        PlayerStatLine {
            player_id: player_id.to_string(),
            team_id: team_id.to_string(),
            name: None,
            values: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_value(mut self, category: &str, value: f64) -> Self {
        self.values.insert(category.to_string(), Some(value));
        self
    }

    pub fn with_missing(mut self, category: &str) -> Self {
        self.values.insert(category.to_string(), None);
        self
    }

    /// Value for a category, with missing data read as zero.
    pub fn value(&self, category: &str) -> f64 {
        self.values.get(category).copied().flatten().unwrap_or(0.0)
    }

    /// Display name, falling back to the player id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.player_id)
    }
}

// ---------------------------------------------------------------------------
// Team totals
// ---------------------------------------------------------------------------

/// A team's summed category values. Always rebuilt from stat lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTotals {
    pub team_id: TeamId,
    /// Number of stat lines that were rolled into these totals.
    pub lines: usize,
    pub values: BTreeMap<String, f64>,
}

impl TeamTotals {
    fn empty(team_id: &str, categories: &CategorySet) -> Self {
        TeamTotals {
            team_id: team_id.to_string(),
            lines: 0,
            values: categories.iter().map(|c| (c.name.clone(), 0.0)).collect(),
        }
    }

    pub fn value(&self, category: &str) -> f64 {
        self.values.get(category).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Roll player stat lines up into per-team totals.
///
/// Every known category is present in every team's totals. Several lines for
/// the same player (e.g. one per week) simply add up. A line naming a
/// category outside `categories` aborts with `MalformedStatLine`.
pub fn aggregate(
    lines: &[PlayerStatLine],
    categories: &CategorySet,
) -> Result<BTreeMap<TeamId, TeamTotals>, AnalysisError> {
    let mut teams: BTreeMap<TeamId, TeamTotals> = BTreeMap::new();

    for line in lines {
        if let Some(unknown) = line.values.keys().find(|k| !categories.contains(k)) {
            return Err(AnalysisError::MalformedStatLine {
                player_id: line.player_id.clone(),
                category: unknown.clone(),
            });
        }

        let totals = teams
            .entry(line.team_id.clone())
            .or_insert_with(|| TeamTotals::empty(&line.team_id, categories));
        totals.lines += 1;

        for category in categories {
            if let Some(sum) = totals.values.get_mut(&category.name) {
                *sum += line.value(&category.name);
            }
        }
    }

    debug!(
        "aggregated {} stat lines into {} team totals",
        lines.len(),
        teams.len()
    );
    Ok(teams)
}

/// Merge repeated lines for the same (team, player) into one line.
///
/// Values add up; a category stays `None` only if every merged line lacked
/// it. Output is ordered by team id, then player id.
pub fn combine_player_lines(lines: &[PlayerStatLine]) -> Vec<PlayerStatLine> {
    let mut merged: BTreeMap<(TeamId, PlayerId), PlayerStatLine> = BTreeMap::new();

    for line in lines {
        let key = (line.team_id.clone(), line.player_id.clone());
        match merged.get_mut(&key) {
            Some(existing) => {
                if existing.name.is_none() {
                    existing.name = line.name.clone();
                }
                for (category, value) in &line.values {
                    let slot = existing.values.entry(category.clone()).or_insert(None);
                    *slot = match (*slot, *value) {
                        (Some(a), Some(b)) => Some(a + b),
                        (a, b) => a.or(b),
                    };
                }
            }
            None => {
                merged.insert(key, line.clone());
            }
        }
    }

    merged.into_values().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn categories() -> CategorySet {
        CategorySet::new(vec![
            Category::higher("G"),
            Category::higher("HIT"),
            Category::lower("GAA"),
        ])
    }

    #[test]
    fn sums_by_team() {
        let lines = vec![
            PlayerStatLine::new("p1", "t1").with_value("G", 10.0).with_value("HIT", 40.0),
            PlayerStatLine::new("p2", "t1").with_value("G", 5.0).with_value("HIT", 60.0),
            PlayerStatLine::new("p3", "t2").with_value("G", 7.0),
        ];

        let totals = aggregate(&lines, &categories()).unwrap();
        assert_eq!(totals.len(), 2);

        let t1 = &totals["t1"];
        assert_eq!(t1.lines, 2);
        assert!(approx_eq(t1.value("G"), 15.0, 1e-9));
        assert!(approx_eq(t1.value("HIT"), 100.0, 1e-9));

        let t2 = &totals["t2"];
        assert!(approx_eq(t2.value("G"), 7.0, 1e-9));
        assert!(approx_eq(t2.value("HIT"), 0.0, 1e-9));
    }

    #[test]
    fn missing_values_contribute_zero_for_every_category() {
        let lines = vec![
            PlayerStatLine::new("p1", "t1")
                .with_missing("G")
                .with_missing("HIT")
                .with_missing("GAA"),
            PlayerStatLine::new("p2", "t1"),
        ];

        let totals = aggregate(&lines, &categories()).unwrap();
        let t1 = &totals["t1"];
        for category in categories().iter() {
            assert_eq!(t1.value(&category.name), 0.0, "category {}", category.name);
        }
        // Every known category is present even though nobody recorded data.
        assert_eq!(t1.values.len(), 3);
    }

    #[test]
    fn repeated_player_lines_accumulate() {
        let lines = vec![
            PlayerStatLine::new("p1", "t1").with_value("G", 2.0),
            PlayerStatLine::new("p1", "t1").with_value("G", 3.0),
        ];
        let totals = aggregate(&lines, &categories()).unwrap();
        assert!(approx_eq(totals["t1"].value("G"), 5.0, 1e-9));
    }

    #[test]
    fn unknown_category_is_reported() {
        let lines = vec![
            PlayerStatLine::new("p1", "t1").with_value("G", 1.0),
            PlayerStatLine::new("p2", "t1").with_value("FOW", 12.0),
        ];

        let err = aggregate(&lines, &categories()).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MalformedStatLine {
                player_id: "p2".into(),
                category: "FOW".into(),
            }
        );
    }

    #[test]
    fn empty_input_yields_no_teams() {
        let totals = aggregate(&[], &categories()).unwrap();
        assert!(totals.is_empty());
    }

    #[test]
    fn combine_merges_weekly_lines() {
        let lines = vec![
            PlayerStatLine::new("p1", "t1").with_value("G", 2.0).with_missing("HIT"),
            PlayerStatLine::new("p2", "t1").with_value("G", 1.0),
            PlayerStatLine::new("p1", "t1")
                .with_name("Sidney Crosby")
                .with_value("G", 3.0)
                .with_missing("HIT"),
        ];

        let combined = combine_player_lines(&lines);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].player_id, "p1");
        assert_eq!(combined[0].name.as_deref(), Some("Sidney Crosby"));
        assert_eq!(combined[0].values["G"], Some(5.0));
        assert_eq!(combined[0].values["HIT"], None);
        assert_eq!(combined[1].player_id, "p2");
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let line = PlayerStatLine::new("p1", "t1");
        assert_eq!(line.display_name(), "p1");
        assert_eq!(line.with_name("Cale Makar").display_name(), "Cale Makar");
    }
}
