// Trade report: the JSON document written after each analysis run.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use puckswap_core::baseline::BaselineMethod;
use puckswap_core::classify::{Classification, Thresholds};
use puckswap_core::matcher::TradeCandidate;
use puckswap_core::pipeline::Analysis;
use puckswap_core::TeamId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::provider::RosterSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeReport {
    pub league: String,
    pub league_key: Option<String>,
    pub my_team: TeamId,
    pub my_team_name: String,
    /// When the report was generated (RFC 3339, UTC).
    pub last_updated: String,
    /// Timestamp carried by the input snapshot, if any.
    pub snapshot_updated: Option<String>,
    pub thresholds: Thresholds,
    pub baseline: BaselineSummary,
    pub teams: Vec<TeamSummary>,
    pub recommendations: Vec<RecommendationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineSummary {
    pub method: BaselineMethod,
    pub teams: usize,
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team_id: TeamId,
    pub team_name: String,
    pub players: usize,
    pub totals: BTreeMap<String, f64>,
    pub profile: BTreeMap<String, Classification>,
    pub weak: Vec<String>,
    pub strong: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub rank: usize,
    pub shape: String,
    pub partner_name: String,
    #[serde(flatten)]
    pub trade: TradeCandidate,
}

impl TradeReport {
    pub fn build(
        analysis: &Analysis,
        snapshot: &RosterSnapshot,
        config: &Config,
        now: DateTime<Utc>,
    ) -> Self {
        let teams = analysis
            .totals
            .iter()
            .map(|(team_id, totals)| {
                let profile = analysis.profiles.get(team_id);
                TeamSummary {
                    team_id: team_id.clone(),
                    team_name: snapshot.team_name(team_id).to_string(),
                    players: totals.lines,
                    totals: totals.values.clone(),
                    profile: profile.map(|p| p.categories.clone()).unwrap_or_default(),
                    weak: profile
                        .map(|p| p.weak().into_iter().map(String::from).collect())
                        .unwrap_or_default(),
                    strong: profile
                        .map(|p| p.strong().into_iter().map(String::from).collect())
                        .unwrap_or_default(),
                }
            })
            .collect();

        let recommendations = analysis
            .recommendations
            .iter()
            .enumerate()
            .map(|(i, trade)| RecommendationEntry {
                rank: i + 1,
                shape: trade.shape(),
                partner_name: snapshot.team_name(&trade.partner).to_string(),
                trade: trade.clone(),
            })
            .collect();

        TradeReport {
            league: config.league.name.clone(),
            league_key: snapshot
                .league
                .clone()
                .or_else(|| config.league.league_key.clone()),
            my_team: analysis.my_team.clone(),
            my_team_name: snapshot.team_name(&analysis.my_team).to_string(),
            last_updated: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            snapshot_updated: snapshot.last_updated.clone(),
            thresholds: config.strategy.analysis.thresholds,
            baseline: BaselineSummary {
                method: analysis.baseline.method,
                teams: analysis.baseline.teams,
                values: analysis.baseline.values.clone(),
            },
            teams,
            recommendations,
        }
    }
}

/// Write the report as pretty JSON, creating parent directories as needed.
pub async fn write_report(path: &Path, report: &TradeReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(
        "wrote {} recommendations to {}",
        report.recommendations.len(),
        path.display()
    );
    Ok(())
}
