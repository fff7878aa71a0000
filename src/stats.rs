//! Journal statistics
//!
//! Aggregate counts over the current decision set, grouped by category,
//! impact, and tag. Every enum member appears in its map even at zero, so
//! the per-map counts always sum to the total.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::store::DecisionStore;
use crate::types::{DecisionCategory, DecisionImpact};

/// Aggregate statistics for one journal.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    /// Name of the project
    pub project_name: String,
    /// Count of all records
    pub total_decisions: usize,
    /// Count per category; every category present, zero or not
    pub by_category: BTreeMap<DecisionCategory, usize>,
    /// Count per impact level; all three levels present
    pub by_impact: BTreeMap<DecisionImpact, usize>,
    /// Tag usage, sorted by count descending then tag ascending
    pub by_tag: Vec<(String, usize)>,
}

/// Computes [`Statistics`] from a store snapshot.
pub struct StatisticsAggregator<'a> {
    store: &'a DecisionStore,
}

impl<'a> StatisticsAggregator<'a> {
    pub fn new(store: &'a DecisionStore) -> Self {
        Self { store }
    }

    pub fn statistics(&self) -> Statistics {
        let mut by_category: BTreeMap<DecisionCategory, usize> =
            DecisionCategory::ALL.iter().map(|c| (*c, 0)).collect();
        let mut by_impact: BTreeMap<DecisionImpact, usize> =
            DecisionImpact::ALL.iter().map(|i| (*i, 0)).collect();
        let mut tag_counts: BTreeMap<String, usize> = BTreeMap::new();

        for decision in self.store.all() {
            *by_category.entry(decision.category).or_insert(0) += 1;
            *by_impact.entry(decision.impact).or_insert(0) += 1;
            for tag in &decision.tags {
                *tag_counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }

        let mut by_tag: Vec<(String, usize)> = tag_counts.into_iter().collect();
        by_tag.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Statistics {
            project_name: self.store.project_name().to_string(),
            total_decisions: self.store.len(),
            by_category,
            by_impact,
            by_tag,
        }
    }
}
