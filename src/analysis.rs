//! Heuristic analysis of the decision set
//!
//! [`AnalysisEngine`] is a deterministic, side-effect-free function of the
//! store's current contents: same records in, same [`Insight`] out. There
//! is no model and no hidden state; the scoring formula and thresholds
//! below are design choices, so tests assert structure, bounds, and
//! determinism rather than exact values.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::store::DecisionStore;
use crate::types::{Decision, DecisionCategory, DecisionImpact};

// Heuristic thresholds. Tuned by eyeballing real journals, not learned.
/// A category with at least this many decisions is a repeated pattern
const REPEATED_CATEGORY_MIN: usize = 3;
/// A tag pair appearing together in at least this many decisions co-occurs
const TAG_PAIR_MIN: usize = 2;
/// Consecutive issue-resolution decisions forming a run
const ISSUE_RUN_MIN: usize = 3;
/// Journal size at which a missing testing category becomes a risk
const TESTING_GAP_MIN_RECORDS: usize = 3;
/// Journal size at which an issue-resolution majority becomes a risk
const ISSUE_MAJORITY_MIN_RECORDS: usize = 4;
/// Rationale coverage below this triggers a documentation recommendation
const RATIONALE_COVERAGE_TARGET: f64 = 0.5;
/// Alternatives coverage below this triggers a recommendation
const ALTERNATIVES_COVERAGE_TARGET: f64 = 0.3;
/// Untagged fraction above this triggers a tagging recommendation
const UNTAGGED_FRACTION_LIMIT: f64 = 0.5;

/// Kind of detected recurring structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// One category dominating repeated decisions
    RepeatedCategory,
    /// A tag pair that keeps appearing together
    CoOccurringTags,
    /// A run of consecutive issue-resolution decisions
    IssueResolutionRun,
}

/// A detected pattern with the records supporting it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pattern {
    pub kind: PatternKind,
    /// Ids of the decisions exhibiting the pattern
    pub decision_ids: Vec<String>,
    /// Human-readable one-liner
    pub summary: String,
}

/// Kind of recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Documentation,
    Testing,
    Alternatives,
    Tagging,
}

/// One structured suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub suggestion: String,
    /// In [0, 1]
    pub confidence: f64,
}

/// Derived, never-persisted analysis output; recomputed per call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    /// In [0, 1]; 0 exactly when the journal is empty
    pub confidence_score: f64,
    /// Detected recurring structures
    pub patterns: Vec<Pattern>,
    /// Independent, reproducible risk flags
    pub risk_factors: Vec<String>,
    /// Sorted by descending confidence, detection order on ties
    pub recommendations: Vec<Recommendation>,
}

/// Read-only heuristic analyzer over a store.
pub struct AnalysisEngine<'a> {
    store: &'a DecisionStore,
}

impl<'a> AnalysisEngine<'a> {
    pub fn new(store: &'a DecisionStore) -> Self {
        Self { store }
    }

    /// Analyze the store's current contents.
    pub fn analyze(&self) -> Insight {
        let decisions = self.store.all();
        if decisions.is_empty() {
            return Insight {
                confidence_score: 0.0,
                patterns: Vec::new(),
                risk_factors: Vec::new(),
                recommendations: Vec::new(),
            };
        }

        Insight {
            confidence_score: confidence_score(decisions),
            patterns: detect_patterns(decisions),
            risk_factors: detect_risks(decisions),
            recommendations: build_recommendations(decisions),
        }
    }
}

/// `0.2 + 0.5·rationale_ratio + 0.3·category_coverage`, clamped to [0, 1].
///
/// Grows with the fraction of decisions carrying a rationale and with the
/// spread of categories in use; the 0.2 floor keeps any non-empty journal
/// strictly above zero.
fn confidence_score(decisions: &[Decision]) -> f64 {
    let total = decisions.len() as f64;
    let with_rationale = decisions.iter().filter(|d| d.has_rationale()).count() as f64;
    let distinct_categories: std::collections::BTreeSet<_> =
        decisions.iter().map(|d| d.category).collect();

    let rationale_ratio = with_rationale / total;
    let category_coverage = distinct_categories.len() as f64 / DecisionCategory::ALL.len() as f64;

    (0.2 + 0.5 * rationale_ratio + 0.3 * category_coverage).clamp(0.0, 1.0)
}

fn detect_patterns(decisions: &[Decision]) -> Vec<Pattern> {
    let mut patterns = Vec::new();

    // Repeated categories, in enum declaration order for determinism
    for category in DecisionCategory::ALL {
        let ids: Vec<String> = decisions
            .iter()
            .filter(|d| d.category == category)
            .map(|d| d.id.clone())
            .collect();
        if ids.len() >= REPEATED_CATEGORY_MIN {
            patterns.push(Pattern {
                summary: format!("{} decisions in category {}", ids.len(), category),
                kind: PatternKind::RepeatedCategory,
                decision_ids: ids,
            });
        }
    }

    // Tag pairs that keep showing up together
    let mut pair_ids: BTreeMap<(String, String), Vec<String>> = BTreeMap::new();
    for decision in decisions {
        for (i, a) in decision.tags.iter().enumerate() {
            for b in &decision.tags[i + 1..] {
                let key = if a <= b {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                };
                pair_ids.entry(key).or_default().push(decision.id.clone());
            }
        }
    }
    for ((a, b), ids) in pair_ids {
        if ids.len() >= TAG_PAIR_MIN {
            patterns.push(Pattern {
                summary: format!("tags \"{}\" and \"{}\" co-occur in {} decisions", a, b, ids.len()),
                kind: PatternKind::CoOccurringTags,
                decision_ids: ids,
            });
        }
    }

    // Runs of consecutive issue-resolution decisions
    let mut run: Vec<String> = Vec::new();
    let flush_run = |run: &mut Vec<String>, patterns: &mut Vec<Pattern>| {
        if run.len() >= ISSUE_RUN_MIN {
            patterns.push(Pattern {
                summary: format!("{} consecutive issue-resolution decisions", run.len()),
                kind: PatternKind::IssueResolutionRun,
                decision_ids: std::mem::take(run),
            });
        }
        run.clear();
    };
    for decision in decisions {
        if decision.category == DecisionCategory::IssueResolution {
            run.push(decision.id.clone());
        } else {
            flush_run(&mut run, &mut patterns);
        }
    }
    flush_run(&mut run, &mut patterns);

    patterns
}

fn detect_risks(decisions: &[Decision]) -> Vec<String> {
    let mut risks = Vec::new();

    let undocumented_high: Vec<&str> = decisions
        .iter()
        .filter(|d| d.impact == DecisionImpact::High && !d.has_rationale())
        .map(|d| d.id.as_str())
        .collect();
    if !undocumented_high.is_empty() {
        risks.push(format!(
            "{} high-impact decision(s) lack a rationale: {}",
            undocumented_high.len(),
            undocumented_high.join(", ")
        ));
    }

    if decisions.len() >= TESTING_GAP_MIN_RECORDS
        && !decisions
            .iter()
            .any(|d| d.category == DecisionCategory::Testing)
    {
        risks.push("no testing-category decisions recorded".to_string());
    }

    let issue_count = decisions
        .iter()
        .filter(|d| d.category == DecisionCategory::IssueResolution)
        .count();
    if decisions.len() >= ISSUE_MAJORITY_MIN_RECORDS && issue_count * 2 > decisions.len() {
        risks.push(format!(
            "issue resolution dominates the journal ({} of {} decisions)",
            issue_count,
            decisions.len()
        ));
    }

    risks
}

fn build_recommendations(decisions: &[Decision]) -> Vec<Recommendation> {
    let total = decisions.len() as f64;
    let mut recommendations = Vec::new();

    let rationale_ratio = decisions.iter().filter(|d| d.has_rationale()).count() as f64 / total;
    if rationale_ratio < RATIONALE_COVERAGE_TARGET {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Documentation,
            suggestion: "Record a rationale with each decision; most entries currently lack one"
                .to_string(),
            confidence: 1.0 - rationale_ratio,
        });
    }

    if decisions.len() >= TESTING_GAP_MIN_RECORDS
        && !decisions
            .iter()
            .any(|d| d.category == DecisionCategory::Testing)
    {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Testing,
            suggestion: "Log test results alongside design decisions to close the loop"
                .to_string(),
            confidence: 0.8,
        });
    }

    let alternatives_ratio =
        decisions.iter().filter(|d| !d.alternatives.is_empty()).count() as f64 / total;
    if decisions.len() >= TESTING_GAP_MIN_RECORDS
        && alternatives_ratio < ALTERNATIVES_COVERAGE_TARGET
    {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Alternatives,
            suggestion: "Capture the alternatives you considered; they explain decisions later"
                .to_string(),
            confidence: 0.6,
        });
    }

    let untagged_ratio = decisions.iter().filter(|d| d.tags.is_empty()).count() as f64 / total;
    if untagged_ratio > UNTAGGED_FRACTION_LIMIT {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Tagging,
            suggestion: "Tag decisions to make search and co-occurrence analysis useful"
                .to_string(),
            confidence: 0.5,
        });
    }

    // Descending confidence; stable sort keeps detection order on ties
    recommendations.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DecisionStore, MemoryBackend};
    use crate::types::DecisionDraft;

    fn memory_store() -> DecisionStore {
        DecisionStore::with_backend("Analysis Test", Box::new(MemoryBackend::new())).unwrap()
    }

    fn populated_store() -> DecisionStore {
        let mut store = memory_store();
        store
            .append(
                DecisionDraft::new(DecisionCategory::ComponentSelection, "Selected STM32F407")
                    .rationale("Need USB and Ethernet")
                    .impact(DecisionImpact::High)
                    .tags(["mcu", "review"]),
            )
            .unwrap();
        store
            .append(
                DecisionDraft::new(DecisionCategory::PowerSupply, "Buck converter over linear")
                    .rationale("90% vs 60% efficiency")
                    .tags(["power", "review"]),
            )
            .unwrap();
        store
            .append(
                DecisionDraft::new(DecisionCategory::Testing, "PCB prototype validation")
                    .rationale("All bring-up tests passed")
                    .tags(["review"]),
            )
            .unwrap();
        store
            .append(
                DecisionDraft::new(DecisionCategory::IssueResolution, "Fixed power rail noise")
                    .rationale("Added more decoupling caps")
                    .impact(DecisionImpact::Low)
                    .tags(["power", "mcu"]),
            )
            .unwrap();
        store
    }

    #[test]
    fn empty_store_scores_zero_with_no_output() {
        let store = memory_store();
        let insight = AnalysisEngine::new(&store).analyze();

        assert_eq!(insight.confidence_score, 0.0);
        assert!(insight.patterns.is_empty());
        assert!(insight.risk_factors.is_empty());
        assert!(insight.recommendations.is_empty());
    }

    #[test]
    fn non_empty_store_scores_strictly_positive_within_bounds() {
        let store = populated_store();
        let insight = AnalysisEngine::new(&store).analyze();

        assert!(insight.confidence_score > 0.0);
        assert!(insight.confidence_score <= 1.0);
    }

    #[test]
    fn analysis_is_deterministic() {
        let store = populated_store();
        let engine = AnalysisEngine::new(&store);
        assert_eq!(engine.analyze(), engine.analyze());
    }

    #[test]
    fn more_rationale_means_more_confidence() {
        let mut sparse = memory_store();
        let mut documented = memory_store();
        for i in 0..4 {
            sparse
                .append(DecisionDraft::new(
                    DecisionCategory::Other,
                    format!("d{}", i),
                ))
                .unwrap();
            documented
                .append(
                    DecisionDraft::new(DecisionCategory::Other, format!("d{}", i))
                        .rationale("because"),
                )
                .unwrap();
        }

        let sparse_score = AnalysisEngine::new(&sparse).analyze().confidence_score;
        let documented_score = AnalysisEngine::new(&documented).analyze().confidence_score;
        assert!(documented_score > sparse_score);
    }

    #[test]
    fn repeated_category_pattern_carries_supporting_ids() {
        let mut store = memory_store();
        let mut expected_ids = Vec::new();
        for i in 0..3 {
            let d = store
                .append(DecisionDraft::new(
                    DecisionCategory::Architecture,
                    format!("layer {}", i),
                ))
                .unwrap();
            expected_ids.push(d.id);
        }

        let insight = AnalysisEngine::new(&store).analyze();
        let pattern = insight
            .patterns
            .iter()
            .find(|p| p.kind == PatternKind::RepeatedCategory)
            .expect("repeated category pattern");
        assert_eq!(pattern.decision_ids, expected_ids);
    }

    #[test]
    fn co_occurring_tags_are_detected() {
        let mut store = memory_store();
        for i in 0..2 {
            store
                .append(
                    DecisionDraft::new(DecisionCategory::PowerSupply, format!("rail fix {}", i))
                        .tags(["power", "noise"]),
                )
                .unwrap();
        }

        let insight = AnalysisEngine::new(&store).analyze();
        let pattern = insight
            .patterns
            .iter()
            .find(|p| p.kind == PatternKind::CoOccurringTags)
            .expect("co-occurring tag pattern");
        assert_eq!(pattern.decision_ids.len(), 2);
        assert!(pattern.summary.contains("noise") && pattern.summary.contains("power"));
    }

    #[test]
    fn issue_resolution_run_is_detected() {
        let mut store = memory_store();
        for i in 0..3 {
            store
                .append(DecisionDraft::new(
                    DecisionCategory::IssueResolution,
                    format!("fix {}", i),
                ))
                .unwrap();
        }
        store
            .append(DecisionDraft::new(DecisionCategory::Testing, "regression run"))
            .unwrap();

        let insight = AnalysisEngine::new(&store).analyze();
        let run = insight
            .patterns
            .iter()
            .find(|p| p.kind == PatternKind::IssueResolutionRun)
            .expect("issue run pattern");
        assert_eq!(run.decision_ids.len(), 3);
    }

    #[test]
    fn undocumented_high_impact_is_a_risk() {
        let mut store = memory_store();
        let d = store
            .append(
                DecisionDraft::new(DecisionCategory::Architecture, "Big rewrite")
                    .impact(DecisionImpact::High),
            )
            .unwrap();

        let insight = AnalysisEngine::new(&store).analyze();
        assert!(insight
            .risk_factors
            .iter()
            .any(|r| r.contains("high-impact") && r.contains(&d.id)));
    }

    #[test]
    fn testing_gap_is_flagged_once_the_journal_is_established() {
        let mut store = memory_store();
        for i in 0..3 {
            store
                .append(DecisionDraft::new(
                    DecisionCategory::Architecture,
                    format!("d{}", i),
                ))
                .unwrap();
        }

        let insight = AnalysisEngine::new(&store).analyze();
        assert!(insight
            .risk_factors
            .iter()
            .any(|r| r.contains("no testing-category")));
        assert!(insight
            .recommendations
            .iter()
            .any(|r| r.kind == RecommendationKind::Testing));
    }

    #[test]
    fn recommendations_are_sorted_by_descending_confidence() {
        let mut store = memory_store();
        for i in 0..4 {
            store
                .append(DecisionDraft::new(
                    DecisionCategory::Architecture,
                    format!("d{}", i),
                ))
                .unwrap();
        }

        let insight = AnalysisEngine::new(&store).analyze();
        assert!(!insight.recommendations.is_empty());
        assert!(insight
            .recommendations
            .windows(2)
            .all(|w| w[0].confidence >= w[1].confidence));
        assert!(insight
            .recommendations
            .iter()
            .all(|r| (0.0..=1.0).contains(&r.confidence)));
    }

    #[test]
    fn recommendation_serializes_kind_as_type() {
        let rec = Recommendation {
            kind: RecommendationKind::Documentation,
            suggestion: "write it down".to_string(),
            confidence: 0.7,
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "documentation");
    }
}
