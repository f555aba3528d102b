// End-to-end analysis of one snapshot: aggregate, baseline, classify, match,
// rank.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::baseline::{compute_baseline, BaselineMethod, LeagueBaseline};
use crate::category::CategorySet;
use crate::classify::{classify, CategoryProfile, Thresholds};
use crate::error::AnalysisError;
use crate::matcher::{find_candidates, MatchConfig, MatchRequest, TradeCandidate};
use crate::recommend::{rank, DEFAULT_RECOMMENDATION_LIMIT};
use crate::stats::{aggregate, PlayerStatLine, TeamTotals};
use crate::TeamId;

/// Tunables for a single analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub thresholds: Thresholds,
    pub baseline: BaselineMethod,
    pub matching: MatchConfig,
    pub max_recommendations: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            thresholds: Thresholds::default(),
            baseline: BaselineMethod::default(),
            matching: MatchConfig::default(),
            max_recommendations: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

/// Every stage's output for one run, ready to be serialized by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub my_team: TeamId,
    pub totals: BTreeMap<TeamId, TeamTotals>,
    pub baseline: LeagueBaseline,
    pub profiles: BTreeMap<TeamId, CategoryProfile>,
    pub recommendations: Vec<TradeCandidate>,
}

/// Classify every team against the baseline.
pub fn classify_all(
    totals: &BTreeMap<TeamId, TeamTotals>,
    baseline: &LeagueBaseline,
    categories: &CategorySet,
    thresholds: &Thresholds,
) -> BTreeMap<TeamId, CategoryProfile> {
    totals
        .iter()
        .map(|(team_id, team)| {
            (
                team_id.clone(),
                classify(team, baseline, categories, thresholds),
            )
        })
        .collect()
}

/// Run the full pipeline for `my_team`.
pub fn analyze(
    lines: &[PlayerStatLine],
    categories: &CategorySet,
    my_team: &str,
    config: &AnalysisConfig,
) -> Result<Analysis, AnalysisError> {
    let totals = aggregate(lines, categories)?;
    let baseline = compute_baseline(&totals, categories, config.baseline)?;
    let profiles = classify_all(&totals, &baseline, categories, &config.thresholds);

    let (Some(my_totals), Some(my_profile)) = (totals.get(my_team), profiles.get(my_team)) else {
        return Err(AnalysisError::UnknownTeam {
            team_id: my_team.to_string(),
        });
    };

    info!(
        "team {}: weak in {:?}, strong in {:?}",
        my_team,
        my_profile.weak(),
        my_profile.strong()
    );

    let request = MatchRequest {
        my_team,
        my_profile,
        all_profiles: &profiles,
        player_stats: lines,
        my_totals,
        baseline: &baseline,
        categories,
        thresholds: &config.thresholds,
    };
    let candidates = find_candidates(&request, &config.matching);
    let recommendations = rank(candidates, config.max_recommendations);

    Ok(Analysis {
        my_team: my_team.to_string(),
        totals,
        baseline,
        profiles,
        recommendations,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
