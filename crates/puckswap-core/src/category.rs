// Scoring categories and their direction.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A single scored statistic used for head-to-head category standings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Display name, also the key used in stat lines (e.g. "G", "GAA").
    pub name: String,
    /// False for goals-against style stats where a lower total wins.
    pub higher_is_better: bool,
    /// Upstream stat id this category is reported under, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_id: Option<String>,
}

impl Category {
    pub fn higher(name: &str) -> Self {
        Category {
            name: name.to_string(),
            higher_is_better: true,
            stat_id: None,
        }
    }

    pub fn lower(name: &str) -> Self {
        Category {
            name: name.to_string(),
            higher_is_better: false,
            stat_id: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Category set
// ---------------------------------------------------------------------------

/// The ordered list of categories known to a run.
///
/// Order is preserved from construction and drives iteration order in every
/// downstream stage, so reports list categories the way the league does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet {
    categories: Vec<Category>,
}

impl CategorySet {
    /// Build a set, dropping later duplicates of an earlier name.
    pub fn new(categories: Vec<Category>) -> Self {
        let mut seen = HashSet::new();
        let categories = categories
            .into_iter()
            .filter(|c| seen.insert(c.name.clone()))
            .collect();
        CategorySet { categories }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up the category reported under an upstream stat id.
    pub fn by_stat_id(&self, stat_id: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.stat_id.as_deref() == Some(stat_id))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<'a> IntoIterator for &'a CategorySet {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
