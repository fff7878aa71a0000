//! Core domain types for declog
//!
//! A journal belongs to exactly one project and holds an append-only,
//! chronologically ordered collection of [`Decision`] records. Records are
//! immutable once the store has issued them; everything downstream (search,
//! timeline, statistics, analysis, export) is a read-only view.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Project** | A directory tree whose engineering decisions are being journaled |
//! | **Decision** | One recorded decision: what was decided, why, alternatives, impact, tags |
//! | **Draft** | Caller-supplied decision fields before the store assigns id + timestamp |
//! | **Milestone** | A high-impact decision, treated as a narrative checkpoint |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schemaless auxiliary metadata attached to a decision.
///
/// String keys mapping to JSON values, deterministically ordered by key so
/// serialization is stable. Opaque to the store.
pub type ContextMap = serde_json::Map<String, serde_json::Value>;

// ============================================
// Category
// ============================================

/// Closed set of decision categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionCategory {
    ComponentSelection,
    Architecture,
    PowerSupply,
    Fabrication,
    Testing,
    IssueResolution,
    Milestone,
    Other,
}

impl DecisionCategory {
    /// Every member, in declaration order. Statistics report all of these
    /// even at zero.
    pub const ALL: [DecisionCategory; 8] = [
        DecisionCategory::ComponentSelection,
        DecisionCategory::Architecture,
        DecisionCategory::PowerSupply,
        DecisionCategory::Fabrication,
        DecisionCategory::Testing,
        DecisionCategory::IssueResolution,
        DecisionCategory::Milestone,
        DecisionCategory::Other,
    ];

    /// Returns the identifier used in storage and export documents
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionCategory::ComponentSelection => "component_selection",
            DecisionCategory::Architecture => "architecture",
            DecisionCategory::PowerSupply => "power_supply",
            DecisionCategory::Fabrication => "fabrication",
            DecisionCategory::Testing => "testing",
            DecisionCategory::IssueResolution => "issue_resolution",
            DecisionCategory::Milestone => "milestone",
            DecisionCategory::Other => "other",
        }
    }

    /// Lenient parse for forward compatibility: unknown strings map to
    /// [`DecisionCategory::Other`] instead of failing.
    ///
    /// The store's append boundary uses strict [`FromStr`] parsing; this is
    /// the documented escape hatch for callers ingesting categories from
    /// sources that may be newer than this crate.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(DecisionCategory::Other)
    }
}

impl std::fmt::Display for DecisionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DecisionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "component_selection" => Ok(DecisionCategory::ComponentSelection),
            "architecture" => Ok(DecisionCategory::Architecture),
            "power_supply" => Ok(DecisionCategory::PowerSupply),
            "fabrication" => Ok(DecisionCategory::Fabrication),
            "testing" => Ok(DecisionCategory::Testing),
            "issue_resolution" => Ok(DecisionCategory::IssueResolution),
            "milestone" => Ok(DecisionCategory::Milestone),
            "other" => Ok(DecisionCategory::Other),
            _ => Err(format!("unknown decision category: {}", s)),
        }
    }
}

// ============================================
// Impact
// ============================================

/// Impact level of a decision, ordered `Low < Medium < High`.
///
/// `High` is the fixed milestone threshold.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DecisionImpact {
    Low,
    #[default]
    Medium,
    High,
}

impl DecisionImpact {
    /// Every member, in ascending order.
    pub const ALL: [DecisionImpact; 3] = [
        DecisionImpact::Low,
        DecisionImpact::Medium,
        DecisionImpact::High,
    ];

    /// Returns the identifier used in storage and export documents
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionImpact::Low => "low",
            DecisionImpact::Medium => "medium",
            DecisionImpact::High => "high",
        }
    }
}

impl std::fmt::Display for DecisionImpact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DecisionImpact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(DecisionImpact::Low),
            "medium" => Ok(DecisionImpact::Medium),
            "high" => Ok(DecisionImpact::High),
            _ => Err(format!("unknown decision impact: {}", s)),
        }
    }
}

// ============================================
// Decision
// ============================================

/// One recorded engineering decision. Immutable once created.
///
/// `id` and `timestamp` are assigned by the store at append time; everything
/// else comes from the caller's [`DecisionDraft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Unique identifier (UUID v4), never reused within a project
    pub id: String,
    /// Creation instant (UTC); monotonic per store
    pub timestamp: DateTime<Utc>,
    /// Decision category
    pub category: DecisionCategory,
    /// What was decided (never empty)
    pub decision: String,
    /// Why it was decided (may be empty)
    #[serde(default)]
    pub rationale: String,
    /// Options considered, in the order they were weighed
    #[serde(default)]
    pub alternatives: Vec<String>,
    /// Impact level
    #[serde(default)]
    pub impact: DecisionImpact,
    /// Case-sensitive labels, deduplicated preserving first occurrence
    #[serde(default)]
    pub tags: Vec<String>,
    /// Auxiliary key/value metadata (test payloads, commit ids, ...)
    #[serde(default)]
    pub context: ContextMap,
}

impl Decision {
    /// Check if this decision has a documented rationale
    pub fn has_rationale(&self) -> bool {
        !self.rationale.trim().is_empty()
    }

    /// Check if this decision is a milestone (fixed policy: high impact)
    pub fn is_milestone(&self) -> bool {
        self.impact == DecisionImpact::High
    }
}

// ============================================
// Draft
// ============================================

/// Caller-supplied fields for a decision, validated at the store boundary.
///
/// Builder-style setters cover the optional fields:
///
/// ```
/// use declog::types::{DecisionCategory, DecisionDraft, DecisionImpact};
///
/// let draft = DecisionDraft::new(
///     DecisionCategory::ComponentSelection,
///     "Selected STM32F407 over STM32F405",
/// )
/// .rationale("Need USB OTG and Ethernet")
/// .alternatives(["STM32F405", "STM32H7 series"])
/// .impact(DecisionImpact::High)
/// .tags(["mcu", "connectivity"]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionDraft {
    pub category: Option<DecisionCategory>,
    pub decision: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    /// Defaults to [`DecisionImpact::Medium`] when unset
    pub impact: Option<DecisionImpact>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub context: ContextMap,
}

impl DecisionDraft {
    /// Create a draft with the two required fields
    pub fn new(category: DecisionCategory, decision: impl Into<String>) -> Self {
        Self {
            category: Some(category),
            decision: decision.into(),
            ..Default::default()
        }
    }

    /// Set the rationale
    pub fn rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }

    /// Set the alternatives considered
    pub fn alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternatives = alternatives.into_iter().map(Into::into).collect();
        self
    }

    /// Set the impact level
    pub fn impact(mut self, impact: DecisionImpact) -> Self {
        self.impact = Some(impact);
        self
    }

    /// Set the tags
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Attach one context entry
    pub fn context_entry(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Build a Testing-category draft from a test run.
    ///
    /// The result payload and pass/fail verdict land in `context`, the
    /// verdict also drives the impact: a failed spec check is worth more
    /// attention than a pass.
    pub fn test_result(
        test_name: impl Into<String>,
        result: serde_json::Value,
        meets_spec: bool,
        notes: impl Into<String>,
    ) -> Self {
        let test_name = test_name.into();
        let verdict = if meets_spec { "pass" } else { "fail" };
        DecisionDraft::new(
            DecisionCategory::Testing,
            format!("Test executed: {} ({})", test_name, verdict),
        )
        .rationale(notes)
        .impact(if meets_spec {
            DecisionImpact::Low
        } else {
            DecisionImpact::High
        })
        .tags(["test-result"])
        .context_entry("test_name", serde_json::Value::String(test_name))
        .context_entry("result", result)
        .context_entry("meets_spec", serde_json::Value::Bool(meets_spec))
    }
}

// ============================================
// Project metadata
// ============================================

/// Project identity as carried in statistics and export documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMeta {
    /// Human-friendly project name
    pub name: String,
    /// Canonical path to the project root
    pub root: std::path::PathBuf,
    /// When the journal was initialized
    pub created_at: DateTime<Utc>,
}
