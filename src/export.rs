//! Portable journal export
//!
//! Serializes the project metadata plus every decision record to one
//! self-contained JSON document. Publishing is all-or-nothing: the document
//! is written to a temp file in the destination directory, fsynced, then
//! atomically renamed into place, so a reader never sees a partial export.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::store::DecisionStore;
use crate::types::{Decision, ProjectMeta};

/// The export document schema:
/// `{ "project": {...}, "decisions": [...] }`.
///
/// Field-for-field round-trippable: parsing an exported document yields
/// records equal to the store's contents at export time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub project: ProjectMeta,
    pub decisions: Vec<Decision>,
}

impl ExportDocument {
    /// Parse a previously exported document.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Writes export documents for one store.
pub struct ExportService<'a> {
    store: &'a DecisionStore,
    meta: ProjectMeta,
}

impl<'a> ExportService<'a> {
    pub fn new(store: &'a DecisionStore, meta: ProjectMeta) -> Self {
        Self { store, meta }
    }

    /// Build the document from the store's current contents.
    pub fn document(&self) -> ExportDocument {
        ExportDocument {
            project: self.meta.clone(),
            decisions: self.store.all().to_vec(),
        }
    }

    /// Export to `destination`, atomically.
    pub fn export(&self, destination: &Path) -> Result<()> {
        let document = self.document();
        let json = serde_json::to_string_pretty(&document)?;

        let dir = destination.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
            None => tempfile::NamedTempFile::new_in(".")?,
        };
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(destination).map_err(|e| e.error)?;

        tracing::info!(
            destination = %destination.display(),
            decisions = document.decisions.len(),
            "journal exported"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;
    use crate::types::{DecisionCategory, DecisionDraft, DecisionImpact};
    use chrono::Utc;

    fn meta() -> ProjectMeta {
        ProjectMeta {
            name: "Export Test".to_string(),
            root: std::path::PathBuf::from("/tmp/export-test"),
            created_at: Utc::now(),
        }
    }

    fn populated_store() -> DecisionStore {
        let mut store =
            DecisionStore::with_backend("Export Test", Box::new(MemoryBackend::new())).unwrap();
        store
            .append(
                DecisionDraft::new(DecisionCategory::ComponentSelection, "Export test decision")
                    .rationale("Testing export functionality")
                    .impact(DecisionImpact::High)
                    .tags(["export"])
                    .context_entry("revision", serde_json::json!(3)),
            )
            .unwrap();
        store
            .append(DecisionDraft::new(
                DecisionCategory::Other,
                "Second record",
            ))
            .unwrap();
        store
    }

    #[test]
    fn export_round_trips_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = populated_store();
        let destination = dir.path().join("export.json");

        ExportService::new(&store, meta())
            .export(&destination)
            .unwrap();

        let document = ExportDocument::read(&destination).unwrap();
        assert_eq!(document.project.name, "Export Test");
        assert_eq!(document.decisions, store.all().to_vec());
    }

    #[test]
    fn exported_document_has_the_declared_schema() {
        let dir = tempfile::tempdir().unwrap();
        let store = populated_store();
        let destination = dir.path().join("export.json");

        ExportService::new(&store, meta())
            .export(&destination)
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&destination).unwrap()).unwrap();
        assert!(raw.get("project").is_some());
        let decisions = raw["decisions"].as_array().unwrap();
        assert_eq!(decisions.len(), 2);
        for field in [
            "id",
            "timestamp",
            "category",
            "decision",
            "rationale",
            "alternatives",
            "impact",
            "tags",
            "context",
        ] {
            assert!(decisions[0].get(field).is_some(), "missing field {}", field);
        }
    }

    #[test]
    fn export_to_unwritable_destination_fails_without_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let store = populated_store();
        let destination = dir.path().join("no-such-subdir").join("export.json");

        let result = ExportService::new(&store, meta()).export(&destination);
        assert!(result.is_err());
        assert!(!destination.exists());
    }

    #[test]
    fn export_overwrites_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let store = populated_store();
        let destination = dir.path().join("export.json");
        std::fs::write(&destination, "stale").unwrap();

        ExportService::new(&store, meta())
            .export(&destination)
            .unwrap();

        let document = ExportDocument::read(&destination).unwrap();
        assert_eq!(document.decisions.len(), 2);
    }

    #[test]
    fn empty_store_exports_an_empty_decision_list() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            DecisionStore::with_backend("Export Test", Box::new(MemoryBackend::new())).unwrap();
        let destination = dir.path().join("export.json");

        ExportService::new(&store, meta())
            .export(&destination)
            .unwrap();

        let document = ExportDocument::read(&destination).unwrap();
        assert!(document.decisions.is_empty());
    }
}
