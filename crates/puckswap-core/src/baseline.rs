// League-wide per-category baseline computed from team totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::CategorySet;
use crate::error::AnalysisError;
use crate::stats::TeamTotals;
use crate::TeamId;

/// Fewest teams a baseline can be computed over.
pub const MIN_BASELINE_TEAMS: usize = 2;

/// How team totals are combined into the league baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineMethod {
    #[default]
    Mean,
    Median,
}

impl BaselineMethod {
    pub fn label(&self) -> &'static str {
        match self {
            BaselineMethod::Mean => "mean",
            BaselineMethod::Median => "median",
        }
    }
}

/// League-wide reference value per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueBaseline {
    pub method: BaselineMethod,
    /// Number of teams the baseline was computed over.
    pub teams: usize,
    pub values: BTreeMap<String, f64>,
}

impl LeagueBaseline {
    pub fn value(&self, category: &str) -> f64 {
        self.values.get(category).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Compute the baseline for every category over exactly the given teams.
///
/// Fails with `InsufficientTeams` for fewer than two teams: a baseline over a
/// single team is just that team.
pub fn compute_baseline(
    totals: &BTreeMap<TeamId, TeamTotals>,
    categories: &CategorySet,
    method: BaselineMethod,
) -> Result<LeagueBaseline, AnalysisError> {
    if totals.len() < MIN_BASELINE_TEAMS {
        return Err(AnalysisError::InsufficientTeams {
            found: totals.len(),
        });
    }

    let values = categories
        .iter()
        .map(|category| {
            let column: Vec<f64> = totals.values().map(|t| t.value(&category.name)).collect();
            let value = match method {
                BaselineMethod::Mean => mean(&column),
                BaselineMethod::Median => median(column),
            };
            (category.name.clone(), value)
        })
        .collect();

    debug!(
        "computed {} baseline over {} teams",
        method.label(),
        totals.len()
    );

    Ok(LeagueBaseline {
        method,
        teams: totals.len(),
        values,
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
