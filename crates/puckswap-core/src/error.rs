// Error taxonomy for the analysis pipeline.

use thiserror::Error;

/// Failures that abort an analysis run.
///
/// Degenerate-but-valid inputs (zero baselines, no eligible partners, empty
/// candidate lists) are not represented here; they yield neutral or empty
/// results instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A stat line referenced a category outside the known set. Usually means
    /// the upstream schema changed.
    #[error("stat line for player `{player_id}` references unknown category `{category}`")]
    MalformedStatLine { player_id: String, category: String },

    #[error("league baseline needs at least 2 teams, got {found}")]
    InsufficientTeams { found: usize },

    #[error("team `{team_id}` has no stat lines in this snapshot")]
    UnknownTeam { team_id: String },
}
