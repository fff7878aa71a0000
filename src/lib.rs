//! # declog
//!
//! A project-scoped engineering decision journal.
//!
//! This library provides:
//! - An append-only store of decision records, per project
//! - Search, timeline, and statistics views over the journal
//! - A pattern/risk analysis engine with recommendations
//! - Portable JSON export
//! - A pure summarizer for version-control post-commit hooks
//!
//! ## Architecture
//!
//! Everything hangs off one [`DecisionStore`] per project:
//! - **Records:** Immutable [`Decision`] values, ordered by append
//! - **Views:** Search, timeline, statistics, and analysis read the
//!   in-memory record list; none of them touch storage
//! - **Storage:** Pluggable backends (JSONL by default, SQLite optional)
//!   behind [`StorageBackend`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use declog::{DecisionCategory, DecisionDraft, DecisionImpact, DecisionStore, Project};
//!
//! let project = Project::open(std::path::Path::new("."))?;
//! let mut store = DecisionStore::open(&project)?;
//!
//! let decision = store.append(
//!     DecisionDraft::new(
//!         DecisionCategory::ComponentSelection,
//!         "Selected STM32F407 over STM32F405",
//!     )
//!     .rationale("Need USB OTG and Ethernet")
//!     .impact(DecisionImpact::High)
//!     .tags(["mcu"]),
//! )?;
//! println!("recorded {}", decision.id);
//! # Ok::<(), declog::Error>(())
//! ```

// Re-export commonly used items at the crate root
pub use config::{Project, ProjectConfig, StorageKind};
pub use error::{Error, Result};
pub use store::{DecisionStore, JsonlBackend, MemoryBackend, SqliteBackend, StorageBackend};
pub use types::*;

// Public modules
pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod hook;
pub mod logging;
pub mod search;
pub mod stats;
pub mod store;
pub mod timeline;
pub mod types;
