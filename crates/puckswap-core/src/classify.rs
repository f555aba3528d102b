// Strength classification of a team's categories against the league baseline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::baseline::LeagueBaseline;
use crate::category::{Category, CategorySet};
use crate::stats::TeamTotals;
use crate::TeamId;

/// Fraction of the baseline at or below which a category counts as weak.
pub const DEFAULT_WEAK_THRESHOLD: f64 = 0.90;

/// Fraction of the baseline above which a category counts as strong.
pub const DEFAULT_STRONG_THRESHOLD: f64 = 1.10;

/// Baselines with a magnitude below this are treated as zero.
pub(crate) const BASELINE_EPSILON: f64 = 1e-12;

/// Relative tolerance applied at band boundaries, so that `100.0 * 0.9`
/// still lands on the weak side of 90.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub weak_threshold: f64,
    pub strong_threshold: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            weak_threshold: DEFAULT_WEAK_THRESHOLD,
            strong_threshold: DEFAULT_STRONG_THRESHOLD,
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Weak,
    Neutral,
    Strong,
}

/// Per-category classification for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub team_id: TeamId,
    pub categories: BTreeMap<String, Classification>,
}

impl CategoryProfile {
    pub fn get(&self, category: &str) -> Classification {
        self.categories
            .get(category)
            .copied()
            .unwrap_or(Classification::Neutral)
    }

    pub fn is_weak(&self, category: &str) -> bool {
        self.get(category) == Classification::Weak
    }

    pub fn is_strong(&self, category: &str) -> bool {
        self.get(category) == Classification::Strong
    }

    pub fn weak(&self) -> Vec<&str> {
        self.with(Classification::Weak)
    }

    pub fn strong(&self) -> Vec<&str> {
        self.with(Classification::Strong)
    }

    fn with(&self, class: Classification) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|(_, c)| **c == class)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Classify every category of `totals` against `baseline`.
pub fn classify(
    totals: &TeamTotals,
    baseline: &LeagueBaseline,
    categories: &CategorySet,
    thresholds: &Thresholds,
) -> CategoryProfile {
    let classes = categories
        .iter()
        .map(|category| {
            let class = classify_value(
                category,
                totals.value(&category.name),
                baseline.value(&category.name),
                thresholds,
            );
            (category.name.clone(), class)
        })
        .collect();

    CategoryProfile {
        team_id: totals.team_id.clone(),
        categories: classes,
    }
}

/// Classify a single value against a baseline, honoring the category's
/// direction.
///
/// Bands are offsets of `|baseline|` from the baseline, which for a positive
/// baseline is exactly `baseline * weak` / `baseline * strong` (or the
/// divided forms for lower-is-better categories). A zero baseline is always
/// neutral.
pub fn classify_value(
    category: &Category,
    value: f64,
    baseline: f64,
    thresholds: &Thresholds,
) -> Classification {
    if baseline.abs() < BASELINE_EPSILON {
        return Classification::Neutral;
    }
    let magnitude = baseline.abs();

    if category.higher_is_better {
        let weak_limit = baseline - magnitude * (1.0 - thresholds.weak_threshold);
        let strong_limit = baseline + magnitude * (thresholds.strong_threshold - 1.0);
        if value <= weak_limit + tolerance(weak_limit) {
            Classification::Weak
        } else if value > strong_limit + tolerance(strong_limit) {
            Classification::Strong
        } else {
            Classification::Neutral
        }
    } else {
        let weak_limit = baseline + magnitude * (1.0 / thresholds.weak_threshold - 1.0);
        let strong_limit = baseline - magnitude * (1.0 - 1.0 / thresholds.strong_threshold);
        if value >= weak_limit - tolerance(weak_limit) {
            Classification::Weak
        } else if value < strong_limit - tolerance(strong_limit) {
            Classification::Strong
        } else {
            Classification::Neutral
        }
    }
}

fn tolerance(limit: f64) -> f64 {
    limit.abs() * BOUNDARY_TOLERANCE
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
