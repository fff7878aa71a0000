//! Storage backends for decision records
//!
//! The store core is persistence-agnostic: it talks to a [`StorageBackend`]
//! that can load the full ordered record set and durably append one record.
//! The concrete encoding lives entirely behind this trait.

use crate::error::{Error, Result};
use crate::types::Decision;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Durable, ordered storage for one project's decision records.
///
/// Implementations must make `append` atomic with respect to concurrent
/// appenders from other processes (one non-interleaved write per record)
/// and durable before returning. Cross-process append *ordering* is the
/// caller's concern, not the backend's.
pub trait StorageBackend {
    /// Load all records in insertion order. An empty journal is `Ok(vec![])`.
    fn load(&self) -> Result<Vec<Decision>>;

    /// Durably persist one record. Must not return before the record would
    /// survive a crash.
    fn append(&mut self, decision: &Decision) -> Result<()>;
}

// ============================================
// JSONL backend
// ============================================

/// Append-only JSON-lines file: one decision per line.
///
/// The default backend. Appends are a single `write_all` of one line
/// followed by fsync, so a record is either fully present or absent. A
/// torn final line (crash mid-append) is skipped with a warning on load;
/// malformed JSON anywhere *before* the final line means the journal was
/// edited or corrupted and load fails.
pub struct JsonlBackend {
    path: PathBuf,
}

impl JsonlBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonlBackend {
    fn load(&self) -> Result<Vec<Decision>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let lines: Vec<String> = reader.lines().collect::<std::io::Result<_>>()?;
        let last_line = lines.len().saturating_sub(1);

        let mut decisions = Vec::with_capacity(lines.len());
        for (idx, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Decision>(line) {
                Ok(decision) => decisions.push(decision),
                Err(e) if idx == last_line => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = idx + 1,
                        error = %e,
                        "skipping torn final journal line"
                    );
                }
                Err(e) => {
                    return Err(Error::Storage(format!(
                        "corrupt journal record at {}:{}: {}",
                        self.path.display(),
                        idx + 1,
                        e
                    )));
                }
            }
        }

        Ok(decisions)
    }

    fn append(&mut self, decision: &Decision) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_string(decision)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // One write per record keeps appends non-interleaved even with a
        // second process sharing the journal (O_APPEND semantics).
        file.write_all(line.as_bytes())?;
        file.sync_all()?;

        Ok(())
    }
}

// ============================================
// In-memory backend
// ============================================

/// Volatile backend for tests and ephemeral journals.
#[derive(Default)]
pub struct MemoryBackend {
    records: Vec<Decision>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> Result<Vec<Decision>> {
        Ok(self.records.clone())
    }

    fn append(&mut self, decision: &Decision) -> Result<()> {
        self.records.push(decision.clone());
        Ok(())
    }
}
