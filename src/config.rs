//! Project configuration and journal directory layout
//!
//! Journal data is project-scoped: everything lives under `<root>/.declog/`
//! next to the code it describes, so the journal travels with the project's
//! version-control history.
//!
//! ```text
//! <project root>/
//!   .declog/
//!     config.toml       project name, storage backend choice, logging
//!     journal.jsonl     decision records (jsonl backend)
//!     journal.db        decision records (sqlite backend)
//! ```
//!
//! Log files follow the XDG Base Directory Specification instead, since they
//! are operator state, not project history:
//! `$XDG_STATE_HOME/declog/` (~/.local/state/declog/).

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the journal directory under the project root
pub const JOURNAL_DIR: &str = ".declog";
/// Name of the config file inside the journal directory
pub const CONFIG_FILE: &str = "config.toml";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Which storage backend holds the decision records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Append-only JSON-lines file (default; diff-friendly, no tooling needed)
    #[default]
    Jsonl,
    /// SQLite database
    Sqlite,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Jsonl => "jsonl",
            StorageKind::Sqlite => "sqlite",
        }
    }

    /// Data file name for this backend, relative to the journal directory
    pub fn data_file(&self) -> &'static str {
        match self {
            StorageKind::Jsonl => "journal.jsonl",
            StorageKind::Sqlite => "journal.db",
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Per-project configuration, stored at `<root>/.declog/config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Human-friendly project name
    pub name: String,
    /// When the journal was initialized
    pub created_at: DateTime<Utc>,
    /// Storage backend for decision records
    #[serde(default)]
    pub storage: StorageKind,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProjectConfig {
    /// Parse a config from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    /// Serialize this config to TOML text
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))
    }
}

/// Handle to one project's journal.
///
/// Every operation in this crate takes an explicit `Project` (or a store
/// opened from one); there is no ambient "current project" lookup.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Initialize a journal in an existing project directory.
    ///
    /// Creates `<root>/.declog/` and writes `config.toml`. Fails if the root
    /// does not exist; reopening an already-initialized project with `init`
    /// is a config error (use [`Project::open`]).
    pub fn init(root: impl AsRef<Path>, name: impl Into<String>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::Config(format!(
                "project root {} does not exist",
                root.display()
            )));
        }

        let journal_dir = root.join(JOURNAL_DIR);
        let config_path = journal_dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Err(Error::Config(format!(
                "journal already initialized at {}",
                journal_dir.display()
            )));
        }

        std::fs::create_dir_all(&journal_dir)?;

        let config = ProjectConfig {
            name: name.into(),
            created_at: Utc::now(),
            storage: StorageKind::default(),
            logging: LoggingConfig::default(),
        };
        std::fs::write(&config_path, config.to_toml()?)?;

        tracing::info!(root = %root.display(), name = %config.name, "journal initialized");

        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    /// Open an existing journal.
    ///
    /// Fails with [`Error::ProjectNotFound`] when no journal directory
    /// exists at this root. An initialized journal with zero decisions
    /// opens normally.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let config_path = root.join(JOURNAL_DIR).join(CONFIG_FILE);
        if !config_path.exists() {
            return Err(Error::ProjectNotFound(root.to_path_buf()));
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config = ProjectConfig::from_toml(&content)?;

        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    /// Project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Project configuration
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Mutable project configuration. Changes apply to this handle only;
    /// nothing is written back to `config.toml`.
    pub fn config_mut(&mut self) -> &mut ProjectConfig {
        &mut self.config
    }

    /// Human-friendly project name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Journal directory: `<root>/.declog/`
    pub fn journal_dir(&self) -> PathBuf {
        self.root.join(JOURNAL_DIR)
    }

    /// Path of the configured backend's data file
    pub fn data_path(&self) -> PathBuf {
        self.journal_dir().join(self.config.storage.data_file())
    }

    /// Project metadata as embedded in statistics and export documents
    pub fn meta(&self) -> crate::types::ProjectMeta {
        crate::types::ProjectMeta {
            name: self.config.name.clone(),
            root: self.root.clone(),
            created_at: self.config.created_at,
        }
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/declog/` (~/.local/state/declog/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("declog")
    }
}
