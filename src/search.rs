//! Substring and tag search over the journal
//!
//! [`SearchIndex`] borrows the store, so every query runs against the
//! store's current contents; nothing is cached across appends.

use crate::store::DecisionStore;
use crate::types::{Decision, DecisionCategory};

/// Optional structural filters applied on top of the substring query.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Only decisions in this category
    pub category: Option<DecisionCategory>,
    /// Only decisions carrying *all* of these tags (exact, case-sensitive)
    pub tags: Vec<String>,
}

/// Read-only substring/tag query view over a store.
pub struct SearchIndex<'a> {
    store: &'a DecisionStore,
}

impl<'a> SearchIndex<'a> {
    pub fn new(store: &'a DecisionStore) -> Self {
        Self { store }
    }

    /// Case-insensitive substring search over `decision`, `rationale`, and
    /// `tags`.
    ///
    /// Results are most-recent-first; records sharing a timestamp (the
    /// store clamps them equal when the wall clock steps backwards) stay
    /// in insertion order. An empty query matches every decision; no match
    /// is an empty vec, not an error.
    pub fn search(&self, query: &str) -> Vec<&'a Decision> {
        self.search_filtered(query, &SearchFilter::default())
    }

    /// [`search`](Self::search) narrowed by a [`SearchFilter`].
    pub fn search_filtered(&self, query: &str, filter: &SearchFilter) -> Vec<&'a Decision> {
        let needle = query.to_lowercase();

        let mut hits: Vec<&'a Decision> = self
            .store
            .all()
            .iter()
            .filter(|d| needle.is_empty() || matches_query(d, &needle))
            .filter(|d| filter.category.map_or(true, |c| c == d.category))
            .filter(|d| filter.tags.iter().all(|t| d.tags.contains(t)))
            .collect();

        // Stable sort keeps ties in insertion order
        hits.sort_by_key(|d| std::cmp::Reverse(d.timestamp));
        hits
    }
}

fn matches_query(decision: &Decision, needle: &str) -> bool {
    decision.decision.to_lowercase().contains(needle)
        || decision.rationale.to_lowercase().contains(needle)
        || decision
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(needle))
}
