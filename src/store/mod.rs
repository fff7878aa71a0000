//! Decision record store
//!
//! [`DecisionStore`] is the single writer for one project's journal. It
//! validates drafts, assigns ids and monotonic timestamps, and persists
//! each record through a [`StorageBackend`] before returning it. All other
//! components (search, timeline, statistics, analysis, export) are
//! read-only views that borrow the store.
//!
//! The parse boundary for loosely-typed input sits in front of the store:
//! callers resolve category/impact strings through the enums' `FromStr`
//! impls (or [`crate::types::DecisionCategory::parse_lenient`]) and feed the
//! store a typed [`DecisionDraft`]. A draft with no category fails
//! validation here.

pub mod backend;
pub mod sqlite;

pub use backend::{JsonlBackend, MemoryBackend, StorageBackend};
pub use sqlite::SqliteBackend;

use crate::config::{Project, StorageKind};
use crate::error::{Error, Result};
use crate::types::{Decision, DecisionDraft};
use chrono::Utc;
use uuid::Uuid;

/// Append-only store of one project's decisions.
pub struct DecisionStore {
    project_name: String,
    backend: Box<dyn StorageBackend>,
    decisions: Vec<Decision>,
}

impl DecisionStore {
    /// Open the store for a project, using the backend its config names.
    ///
    /// Loads the full record set eagerly; an initialized journal with zero
    /// decisions opens as an empty store.
    pub fn open(project: &Project) -> Result<Self> {
        let backend: Box<dyn StorageBackend> = match project.config().storage {
            StorageKind::Jsonl => Box::new(JsonlBackend::new(project.data_path())),
            StorageKind::Sqlite => Box::new(SqliteBackend::open(&project.data_path())?),
        };
        Self::with_backend(project.name(), backend)
    }

    /// Open the store over an explicit backend (tests, ephemeral journals).
    pub fn with_backend(
        project_name: impl Into<String>,
        backend: Box<dyn StorageBackend>,
    ) -> Result<Self> {
        let decisions = backend.load()?;
        Ok(Self {
            project_name: project_name.into(),
            backend,
            decisions,
        })
    }

    /// Validate a draft, assign id + timestamp, persist, and return the
    /// created record.
    ///
    /// The record is durable before this returns: a crash between two
    /// appends never loses a decision the caller already holds.
    pub fn append(&mut self, draft: DecisionDraft) -> Result<Decision> {
        let category = draft
            .category
            .ok_or_else(|| Error::Validation("decision category is required".to_string()))?;

        let text = draft.decision.trim();
        if text.is_empty() {
            return Err(Error::Validation(
                "decision text must not be empty".to_string(),
            ));
        }

        // Monotonic per store: a wall clock stepping backwards must not
        // reorder the journal.
        let mut timestamp = Utc::now();
        if let Some(last) = self.decisions.last() {
            if timestamp < last.timestamp {
                timestamp = last.timestamp;
            }
        }

        let decision = Decision {
            id: Uuid::new_v4().to_string(),
            timestamp,
            category,
            decision: text.to_string(),
            rationale: draft.rationale,
            alternatives: draft.alternatives,
            impact: draft.impact.unwrap_or_default(),
            tags: dedup_tags(draft.tags),
            context: draft.context,
        };

        self.backend.append(&decision)?;
        self.decisions.push(decision.clone());

        tracing::debug!(
            id = %decision.id,
            category = %decision.category,
            impact = %decision.impact,
            "decision appended"
        );

        Ok(decision)
    }

    /// All records in insertion order (equivalently timestamp order).
    pub fn all(&self) -> &[Decision] {
        &self.decisions
    }

    /// Look up a record by id.
    pub fn find_by_id(&self, id: &str) -> Result<&Decision> {
        self.decisions
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::DecisionNotFound(id.to_string()))
    }

    /// Number of records in the journal
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    /// Whether the journal holds no records
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Name of the project this store belongs to
    pub fn project_name(&self) -> &str {
        &self.project_name
    }
}

/// Deduplicate tags case-sensitively, preserving first occurrence and
/// dropping empty strings.
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DecisionCategory, DecisionImpact};

    fn memory_store() -> DecisionStore {
        DecisionStore::with_backend("Test Project", Box::new(MemoryBackend::new())).unwrap()
    }

    #[test]
    fn append_assigns_id_and_returns_record() {
        let mut store = memory_store();
        let decision = store
            .append(
                DecisionDraft::new(
                    DecisionCategory::ComponentSelection,
                    "Selected STM32F407 over STM32F405",
                )
                .impact(DecisionImpact::High)
                .tags(["mcu", "connectivity"]),
            )
            .unwrap();

        assert!(!decision.id.is_empty());
        assert_eq!(decision.category, DecisionCategory::ComponentSelection);
        assert_eq!(decision.impact, DecisionImpact::High);
        assert!(decision.tags.contains(&"mcu".to_string()));
    }

    #[test]
    fn append_rejects_empty_decision_text() {
        let mut store = memory_store();
        let err = store
            .append(DecisionDraft::new(DecisionCategory::Testing, "   "))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn append_rejects_missing_category() {
        let mut store = memory_store();
        let draft = DecisionDraft {
            decision: "orphan decision".to_string(),
            ..Default::default()
        };
        assert!(matches!(store.append(draft), Err(Error::Validation(_))));
    }

    #[test]
    fn impact_defaults_to_medium() {
        let mut store = memory_store();
        let decision = store
            .append(DecisionDraft::new(
                DecisionCategory::Architecture,
                "Event-driven firmware core",
            ))
            .unwrap();
        assert_eq!(decision.impact, DecisionImpact::Medium);
    }

    #[test]
    fn tags_are_deduplicated_case_sensitively() {
        let mut store = memory_store();
        let decision = store
            .append(
                DecisionDraft::new(DecisionCategory::Other, "tag handling")
                    .tags(["mcu", "MCU", "mcu", "", "power"]),
            )
            .unwrap();
        assert_eq!(decision.tags, ["mcu", "MCU", "power"]);
    }

    #[test]
    fn all_preserves_insertion_order_and_count() {
        let mut store = memory_store();
        for i in 0..10 {
            store
                .append(DecisionDraft::new(
                    DecisionCategory::Other,
                    format!("decision {}", i),
                ))
                .unwrap();
        }

        assert_eq!(store.len(), 10);
        let texts: Vec<_> = store.all().iter().map(|d| d.decision.as_str()).collect();
        assert_eq!(texts[0], "decision 0");
        assert_eq!(texts[9], "decision 9");
    }

    #[test]
    fn timestamps_never_decrease() {
        let mut store = memory_store();
        for i in 0..50 {
            store
                .append(DecisionDraft::new(
                    DecisionCategory::Other,
                    format!("d{}", i),
                ))
                .unwrap();
        }

        let stamps: Vec<_> = store.all().iter().map(|d| d.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn find_by_id_returns_the_appended_record() {
        let mut store = memory_store();
        let appended = store
            .append(
                DecisionDraft::new(DecisionCategory::PowerSupply, "Buck converter")
                    .rationale("efficiency"),
            )
            .unwrap();

        let found = store.find_by_id(&appended.id).unwrap();
        assert_eq!(*found, appended);
    }

    #[test]
    fn find_by_unknown_id_is_not_found() {
        let store = memory_store();
        assert!(matches!(
            store.find_by_id("no-such-id"),
            Err(Error::DecisionNotFound(_))
        ));
    }

    #[test]
    fn ids_are_unique_across_appends() {
        let mut store = memory_store();
        let mut ids = std::collections::HashSet::new();
        for i in 0..100 {
            let d = store
                .append(DecisionDraft::new(
                    DecisionCategory::Other,
                    format!("d{}", i),
                ))
                .unwrap();
            assert!(ids.insert(d.id));
        }
    }
}
