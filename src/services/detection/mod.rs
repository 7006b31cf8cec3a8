// Detection Module
// Runs the fixed battery of reasoning-defect detectors over a parsed chain:
// - circular: restated or mutually-justifying step pairs
// - generalization: absolutist wording without a qualifier
// - unsupported_claim: opinionated claims with no nearby reason
// - emotional: strong sentiment or emotional vocabulary
// - assumption: first conclusion reached with too little grounding
// - topic_flow: consecutive steps with no overlap and no connective

pub mod assumption;
pub mod circular;
pub mod emotional;
pub mod generalization;
pub mod topic_flow;
pub mod unsupported_claim;

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{Issue, IssueKind, ReasoningChain, ReasoningStep, StepSignals};
use super::config_store::AnalyzerConfig;
use super::error::{AnalysisError, AnalysisOutcome};
use super::signals::SignalProvider;
use super::text_processor::informative_tokens;

/// A step together with its signals and stopword-free stemmed tokens.
pub struct StepView<'a> {
    pub step: &'a ReasoningStep,
    pub signals: &'a StepSignals,
    pub informative: BTreeSet<String>,
}

impl StepView<'_> {
    pub fn index(&self) -> usize {
        self.step.index()
    }
}

/// Read-only input shared by every detector.
pub struct DetectionContext<'a> {
    pub config: &'a AnalyzerConfig,
    pub views: Vec<StepView<'a>>,
}

impl<'a> DetectionContext<'a> {
    pub fn build(
        chain: &'a ReasoningChain,
        config: &'a AnalyzerConfig,
        provider: &dyn SignalProvider,
    ) -> AnalysisOutcome<Self> {
        let mut views = Vec::with_capacity(chain.len());
        for step in chain.steps() {
            let signals = step.signals(provider).map_err(|e| AnalysisError::SignalProvider {
                step: step.index(),
                message: e.to_string(),
            })?;
            let informative = informative_tokens(&signals.tokens, &config.lexicons.stopwords);
            views.push(StepView { step, signals, informative });
        }
        Ok(Self { config, views })
    }
}

pub type DetectorFn = fn(&DetectionContext<'_>) -> Vec<Issue>;

/// Detectors in priority order; issue and suggestion ranking follow this order.
pub const DETECTORS: [(IssueKind, DetectorFn); 6] = [
    (IssueKind::CircularReasoning, circular::detect),
    (IssueKind::HastyGeneralization, generalization::detect),
    (IssueKind::UnsupportedClaim, unsupported_claim::detect),
    (IssueKind::EmotionalLanguage, emotional::detect),
    (IssueKind::UnsupportedAssumption, assumption::detect),
    (IssueKind::AbruptTopicChange, topic_flow::detect),
];

pub struct Analyzer {
    config: Arc<AnalyzerConfig>,
    provider: Arc<dyn SignalProvider>,
}

impl Analyzer {
    pub fn new(config: Arc<AnalyzerConfig>, provider: Arc<dyn SignalProvider>) -> Self {
        Self { config, provider }
    }

    /// Issues ordered by step (pairs by their first step), then detector priority.
    pub fn analyze(&self, chain: &ReasoningChain) -> AnalysisOutcome<Vec<Issue>> {
        let ctx = DetectionContext::build(chain, &self.config, self.provider.as_ref())?;

        let mut issues = Vec::new();
        for (kind, detect) in DETECTORS {
            let found = detect(&ctx);
            debug_assert!(found.iter().all(|i| i.kind == kind));
            debug!(detector = %kind, found = found.len(), "[analyzer] detector finished");
            issues.extend(found);
        }

        issues.sort_by_key(|issue| {
            let steps = issue.target.steps();
            (steps[0], issue.kind, steps.last().copied().unwrap_or(0))
        });

        info!(steps = chain.len(), issues = issues.len(), "[analyzer] chain analyzed");
        Ok(issues)
    }
}

/// Round a score to four decimals for stable evidence output.
pub(crate) fn round4(x: f64) -> f64 {
    (x * 10000.0).round() / 10000.0
}

/// Comma-separated quoted phrase list for evidence strings.
pub(crate) fn quote_list(phrases: &[String]) -> String {
    phrases
        .iter()
        .map(|p| format!("'{}'", p))
        .collect::<Vec<_>>()
        .join(", ")
}
