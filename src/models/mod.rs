// reasoncheck Data Models
// Reasoning chain, issues, suggestions and the assembled analysis result

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::services::error::{AnalysisError, AnalysisOutcome, SignalError};
use crate::services::signals::SignalProvider;

// ============ Signals ============

/// Trigger lexicon categories a step's text is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCategory {
    Hedge,
    Absolutist,
    AbsolutistIdiom,
    Emotional,
    Causal,
    Connective,
    Conclusion,
    Assertive,
    CommonKnowledge,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSignals {
    pub tokens: Vec<String>,
    pub token_count: usize,
    /// Sentiment polarity in [-1, 1].
    pub polarity: f64,
    /// Subjectivity in [0, 1].
    pub subjectivity: f64,
    #[serde(default)]
    pub triggers: BTreeMap<TriggerCategory, Vec<String>>,
}

impl StepSignals {
    pub fn matched(&self, category: TriggerCategory) -> &[String] {
        self.triggers.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, category: TriggerCategory) -> bool {
        !self.matched(category).is_empty()
    }
}

// ============ Reasoning Chain ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepRole {
    Premise,
    Evidence,
    Conclusion,
}

/// One line of the user's argument. Text is fixed at parse time; signals are
/// computed on first use and cached for the lifetime of the step.
#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningStep {
    index: usize,
    text: String,
    role: StepRole,
    signals: OnceLock<StepSignals>,
}

impl ReasoningStep {
    pub(crate) fn new(index: usize, text: String, role: StepRole) -> Self {
        Self {
            index,
            text,
            role,
            signals: OnceLock::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn role(&self) -> StepRole {
        self.role
    }

    /// Signals for this step, computed through `provider` at most once.
    pub fn signals(&self, provider: &dyn SignalProvider) -> Result<&StepSignals, SignalError> {
        if let Some(cached) = self.signals.get() {
            return Ok(cached);
        }
        let computed = provider.signals(&self.text)?;
        Ok(self.signals.get_or_init(|| computed))
    }

    pub fn cached_signals(&self) -> Option<&StepSignals> {
        self.signals.get()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StepRecord<'a> {
    index: usize,
    text: &'a str,
    role: StepRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    signals: Option<&'a StepSignals>,
}

impl Serialize for ReasoningStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StepRecord {
            index: self.index,
            text: &self.text,
            role: self.role,
            signals: self.signals.get(),
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Contradicts,
}

/// Link between two steps found at parse time; `source` is the earlier step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRelation {
    pub kind: RelationKind,
    pub source: usize,
    pub target: usize,
    /// Content words both steps talk about.
    pub shared: Vec<String>,
}

/// Finalized, ordered argument. Never empty; indices are exactly 1..=N.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasoningChain {
    steps: Vec<ReasoningStep>,
    relations: Vec<StepRelation>,
}

impl ReasoningChain {
    pub(crate) fn from_steps(steps: Vec<ReasoningStep>) -> AnalysisOutcome<Self> {
        if steps.is_empty() {
            return Err(AnalysisError::EmptyChain);
        }
        debug_assert!(steps.iter().enumerate().all(|(i, s)| s.index == i + 1));
        Ok(Self {
            steps,
            relations: Vec::new(),
        })
    }

    pub(crate) fn with_relations(mut self, relations: Vec<StepRelation>) -> Self {
        debug_assert!(relations
            .iter()
            .all(|r| r.source < r.target && r.target <= self.steps.len()));
        self.relations = relations;
        self
    }

    pub fn steps(&self) -> &[ReasoningStep] {
        &self.steps
    }

    pub fn relations(&self) -> &[StepRelation] {
        &self.relations
    }

    pub fn contradictions(&self) -> impl Iterator<Item = &StepRelation> {
        self.relations
            .iter()
            .filter(|r| r.kind == RelationKind::Contradicts)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step by its 1-based index.
    pub fn get(&self, index: usize) -> Option<&ReasoningStep> {
        index.checked_sub(1).and_then(|i| self.steps.get(i))
    }
}

// ============ Issues ============

/// Issue categories in detector priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    CircularReasoning,
    HastyGeneralization,
    UnsupportedClaim,
    EmotionalLanguage,
    UnsupportedAssumption,
    AbruptTopicChange,
}

impl IssueKind {
    pub const ALL: [IssueKind; 6] = [
        IssueKind::CircularReasoning,
        IssueKind::HastyGeneralization,
        IssueKind::UnsupportedClaim,
        IssueKind::EmotionalLanguage,
        IssueKind::UnsupportedAssumption,
        IssueKind::AbruptTopicChange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::CircularReasoning => "circular_reasoning",
            IssueKind::HastyGeneralization => "hasty_generalization",
            IssueKind::UnsupportedClaim => "unsupported_claim",
            IssueKind::EmotionalLanguage => "emotional_language",
            IssueKind::UnsupportedAssumption => "unsupported_assumption",
            IssueKind::AbruptTopicChange => "abrupt_topic_change",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    /// Sort rank: warnings come first.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Warning => 0,
            Severity::Info => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum IssueTarget {
    Step { index: usize },
    /// Chain-level finding spanning two steps.
    Pair { first: usize, second: usize },
}

impl IssueTarget {
    pub fn anchor(&self) -> usize {
        match self {
            IssueTarget::Step { index } => *index,
            IssueTarget::Pair { first, .. } => *first,
        }
    }

    pub fn steps(&self) -> Vec<usize> {
        match self {
            IssueTarget::Step { index } => vec![*index],
            IssueTarget::Pair { first, second } => vec![*first, *second],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub target: IssueTarget,
    pub kind: IssueKind,
    pub severity: Severity,
    pub evidence: String,
    /// Trigger phrases that fired, in lexicon order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

// ============ Suggestions ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum SuggestionTarget {
    Step { index: usize },
    Pair { first: usize, second: usize },
    /// Whole-chain advice not tied to particular steps.
    Chain,
}

impl SuggestionTarget {
    pub fn is_chain_level(&self) -> bool {
        !matches!(self, SuggestionTarget::Step { .. })
    }
}

impl From<IssueTarget> for SuggestionTarget {
    fn from(target: IssueTarget) -> Self {
        match target {
            IssueTarget::Step { index } => SuggestionTarget::Step { index },
            IssueTarget::Pair { first, second } => SuggestionTarget::Pair { first, second },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub target: SuggestionTarget,
    pub source_issue_kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub rationale: Vec<String>,
}

// ============ Guidance ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentContext {
    Academic,
    Relationship,
    Career,
    Financial,
    Health,
    General,
}

impl ArgumentContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentContext::Academic => "academic",
            ArgumentContext::Relationship => "relationship",
            ArgumentContext::Career => "career",
            ArgumentContext::Financial => "financial",
            ArgumentContext::Health => "health",
            ArgumentContext::General => "general",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    pub topic: String,
    pub points: Vec<String>,
}

// ============ Analysis Result ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowVerdict {
    Smooth,
    Fragmented,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub step_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    /// Steps touched by at least one issue, ascending.
    pub flagged_steps: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub chain: ReasoningChain,
    pub issues: Vec<Issue>,
    pub suggestions: Vec<Suggestion>,
    pub flow: FlowVerdict,
    pub context: ArgumentContext,
    pub guidance: Vec<Guidance>,
    pub summary: AnalysisSummary,
}

impl AnalysisResult {
    pub fn issues_for_step(&self, index: usize) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(move |i| i.target.steps().contains(&index))
    }

    pub fn suggestions_for(&self, target: SuggestionTarget) -> impl Iterator<Item = &Suggestion> {
        self.suggestions.iter().filter(move |s| s.target == target)
    }
}
