//! Chronological timeline and milestone extraction
//!
//! The timeline merges event sources into one sequence sorted by timestamp.
//! Decisions are currently the only source; [`EventKind`] leaves room for
//! others (external milestones, releases) without changing the event shape.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::DecisionStore;
use crate::types::Decision;

/// Kind of timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Decision,
}

/// One entry in the project timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent<'a> {
    /// What kind of event this is
    pub kind: EventKind,
    /// When it happened
    pub timestamp: DateTime<Utc>,
    /// The underlying decision record
    pub decision: &'a Decision,
}

/// Builds the chronological event sequence for a store.
pub struct TimelineBuilder<'a> {
    store: &'a DecisionStore,
}

impl<'a> TimelineBuilder<'a> {
    pub fn new(store: &'a DecisionStore) -> Self {
        Self { store }
    }

    /// All events sorted ascending by timestamp.
    ///
    /// The sort is stable, so same-instant events keep their source
    /// insertion order; calling this twice with no intervening append
    /// yields an identical sequence.
    pub fn build(&self) -> Vec<TimelineEvent<'a>> {
        let mut events: Vec<TimelineEvent<'a>> = self
            .store
            .all()
            .iter()
            .map(|decision| TimelineEvent {
                kind: EventKind::Decision,
                timestamp: decision.timestamp,
                decision,
            })
            .collect();

        events.sort_by_key(|e| e.timestamp);
        events
    }
}

/// Filters the timeline down to the project's narrative checkpoints.
///
/// The threshold is a fixed policy: exactly the high-impact decisions, in
/// chronological order.
pub struct MilestoneDetector<'a> {
    store: &'a DecisionStore,
}

impl<'a> MilestoneDetector<'a> {
    pub fn new(store: &'a DecisionStore) -> Self {
        Self { store }
    }

    /// High-impact decisions in chronological order; always a subsequence
    /// of [`DecisionStore::all`].
    pub fn milestones(&self) -> Vec<&'a Decision> {
        self.store
            .all()
            .iter()
            .filter(|d| d.is_milestone())
            .collect()
    }
}
