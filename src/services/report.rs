// Report Assembly
// Pipeline facade: text -> chain -> issues -> suggestions -> AnalysisResult

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::{
    AnalysisResult, AnalysisSummary, ArgumentContext, Guidance, Issue, ReasoningChain, Severity,
    Suggestion,
};
use super::config_store::AnalyzerConfig;
use super::detection::Analyzer;
use super::error::AnalysisOutcome;
use super::guidance::ContextAdvisor;
use super::parser::ChainParser;
use super::signals::{LexiconSignalProvider, SignalProvider};
use super::suggestions::{flow_verdict, SuggestionEngine};

/// Combine pipeline outputs into the final result. No analysis happens here.
pub fn assemble(
    chain: ReasoningChain,
    issues: Vec<Issue>,
    suggestions: Vec<Suggestion>,
    context: ArgumentContext,
    guidance: Vec<Guidance>,
) -> AnalysisResult {
    let flagged: BTreeSet<usize> = issues.iter().flat_map(|i| i.target.steps()).collect();
    let summary = AnalysisSummary {
        step_count: chain.len(),
        warning_count: issues.iter().filter(|i| i.severity == Severity::Warning).count(),
        info_count: issues.iter().filter(|i| i.severity == Severity::Info).count(),
        flagged_steps: flagged.into_iter().collect(),
    };
    AnalysisResult {
        flow: flow_verdict(&issues),
        chain,
        issues,
        suggestions,
        context,
        guidance,
        summary,
    }
}

pub struct ReasoningDebugger {
    parser: ChainParser,
    analyzer: Analyzer,
    suggestions: SuggestionEngine,
    advisor: ContextAdvisor,
}

impl ReasoningDebugger {
    /// Build the pipeline with the lexicon-backed signal provider.
    pub fn new(config: AnalyzerConfig) -> AnalysisOutcome<Self> {
        let provider = Arc::new(LexiconSignalProvider::new(&config));
        Self::with_provider(config, provider)
    }

    pub fn with_provider(
        config: AnalyzerConfig,
        provider: Arc<dyn SignalProvider>,
    ) -> AnalysisOutcome<Self> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "[debugger] rejected configuration");
            return Err(e);
        }
        let config = Arc::new(config);
        Ok(Self {
            parser: ChainParser::new(config.clone()),
            analyzer: Analyzer::new(config.clone(), provider),
            suggestions: SuggestionEngine::new(config.clone()),
            advisor: ContextAdvisor::new(config),
        })
    }

    pub fn analyze(&self, text: &str) -> AnalysisOutcome<AnalysisResult> {
        let chain = self.parser.parse(text)?;
        let issues = self.analyzer.analyze(&chain)?;
        let suggestions = self.suggestions.suggest(&chain, &issues);
        let (context, guidance) = self.advisor.advise(&chain);

        let result = assemble(chain, issues, suggestions, context, guidance);
        info!(
            steps = result.summary.step_count,
            warnings = result.summary.warning_count,
            infos = result.summary.info_count,
            suggestions = result.suggestions.len(),
            flow = ?result.flow,
            context = result.context.as_str(),
            "[debugger] analysis complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FlowVerdict, IssueKind, IssueTarget, StepSignals, SuggestionTarget};
    use crate::services::error::{AnalysisError, SignalError};

    fn debugger() -> ReasoningDebugger {
        ReasoningDebugger::new(AnalyzerConfig::default()).unwrap()
    }

    fn kinds(result: &AnalysisResult) -> Vec<IssueKind> {
        result.issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_same_text_gives_identical_json() {
        let text = "I'm furious that everyone always ignores me.\nI should quit because nobody listens.\nClearly the weather is nice.";
        let a = serde_json::to_string(&debugger().analyze(text).unwrap()).unwrap();
        let b = serde_json::to_string(&debugger().analyze(text).unwrap()).unwrap();
        assert_eq!(a, b);

        let shared = debugger();
        let c = serde_json::to_string(&shared.analyze(text).unwrap()).unwrap();
        let d = serde_json::to_string(&shared.analyze(text).unwrap()).unwrap();
        assert_eq!(a, c);
        assert_eq!(c, d);
    }

    #[test]
    fn test_suggestion_keys_are_unique() {
        let text = "Cats sleep all day.\nStocks fell sharply.\nMy garden has roses.\nClearly pizza is the best.";
        let result = debugger().analyze(text).unwrap();
        let keys: BTreeSet<(SuggestionTarget, IssueKind)> = result
            .suggestions
            .iter()
            .map(|s| (s.target, s.source_issue_kind))
            .collect();
        assert_eq!(keys.len(), result.suggestions.len());
        assert_eq!(result.suggestions_for(SuggestionTarget::Chain).count(), 1);
    }

    #[test]
    fn test_indices_match_non_blank_lines() {
        let result = debugger().analyze("\nfirst point\n\n   \nsecond point\nthird point\n\n").unwrap();
        let indices: Vec<usize> = result.chain.steps().iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(result.summary.step_count, 3);
    }

    #[test]
    fn test_blank_input_is_empty_chain() {
        assert!(matches!(debugger().analyze(""), Err(AnalysisError::EmptyChain)));
        assert!(matches!(debugger().analyze(" \n\t \n"), Err(AnalysisError::EmptyChain)));
    }

    #[test]
    fn test_restated_step_is_circular() {
        let result = debugger()
            .analyze("I should save more money.\nI should save more money because saving is important.")
            .unwrap();
        let circular: Vec<&Issue> = result
            .issues
            .iter()
            .filter(|i| i.kind == IssueKind::CircularReasoning)
            .collect();
        assert_eq!(circular.len(), 1);
        assert_eq!(circular[0].target, IssueTarget::Pair { first: 1, second: 2 });
        assert_eq!(result.context, ArgumentContext::Financial);
    }

    #[test]
    fn test_emotional_step_gets_info_issue_and_evidence_suggestion() {
        let result = debugger().analyze("I'm furious about my horrible boss.").unwrap();
        let issue = result
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::EmotionalLanguage)
            .unwrap();
        assert_eq!(issue.severity, Severity::Info);
        assert_eq!(issue.target, IssueTarget::Step { index: 1 });

        let suggestion = result
            .suggestions
            .iter()
            .find(|s| s.source_issue_kind == IssueKind::EmotionalLanguage)
            .unwrap();
        assert_eq!(suggestion.target, SuggestionTarget::Step { index: 1 });
        assert!(suggestion.message.contains("factual evidence"));
        assert_eq!(result.summary.info_count, 1);
    }

    #[test]
    fn test_hasty_generalization_scenarios() {
        let flagged = debugger().analyze("Everyone always fails at budgeting.").unwrap();
        assert!(kinds(&flagged).contains(&IssueKind::HastyGeneralization));

        let hedged = debugger().analyze("Some people sometimes struggle with budgeting.").unwrap();
        assert!(!kinds(&hedged).contains(&IssueKind::HastyGeneralization));
    }

    #[test]
    fn test_unrelated_steps_are_fragmented() {
        let result = debugger()
            .analyze("The sky is blue due to Rayleigh scattering.\nChocolate ice cream tastes great.")
            .unwrap();
        assert_eq!(result.flow, FlowVerdict::Fragmented);
        assert!(result
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::AbruptTopicChange && i.target == IssueTarget::Pair { first: 1, second: 2 }));
        assert_eq!(result.summary.flagged_steps, vec![1, 2]);
        assert!(result
            .issues_for_step(2)
            .any(|i| i.kind == IssueKind::AbruptTopicChange));
        assert_eq!(result.issues_for_step(3).count(), 0);
    }

    #[test]
    fn test_contradiction_is_reported_in_chain_and_guidance() {
        let result = debugger()
            .analyze("Remote work boosts productivity\nRemote work doesn't boost productivity")
            .unwrap();
        assert_eq!(result.chain.contradictions().count(), 1);
        assert!(result.guidance[0].topic.starts_with("Steps 1 and 2"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["chain"]["relations"][0]["kind"], "contradicts");
        assert_eq!(json["chain"]["relations"][0]["target"], 2);
    }

    #[test]
    fn test_causal_chain_is_smooth() {
        let result = debugger()
            .analyze(
                "Regular exercise strengthens the heart because it trains cardiac muscle.\n\
                 Since a stronger heart pumps blood more efficiently, resting heart rate drops.\n\
                 Therefore, regular exercise lowers resting heart rate.",
            )
            .unwrap();
        assert_eq!(result.flow, FlowVerdict::Smooth);
        assert!(!kinds(&result).contains(&IssueKind::AbruptTopicChange));
    }

    struct OfflineProvider;

    impl SignalProvider for OfflineProvider {
        fn signals(&self, _text: &str) -> Result<StepSignals, SignalError> {
            Err(SignalError::Unavailable("sentiment model offline".to_string()))
        }
    }

    #[test]
    fn test_provider_failure_is_not_a_clean_report() {
        let debugger =
            ReasoningDebugger::with_provider(AnalyzerConfig::default(), Arc::new(OfflineProvider)).unwrap();
        let err = debugger.analyze("A perfectly ordinary step.").unwrap_err();
        assert!(matches!(err, AnalysisError::SignalProvider { step: 1, .. }));
        assert!(err.to_string().contains("sentiment model offline"));
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let mut config = AnalyzerConfig::default();
        config.lexicons.causal.clear();
        assert!(matches!(
            ReasoningDebugger::new(config),
            Err(AnalysisError::Configuration { .. })
        ));
    }

    #[test]
    fn test_thresholds_are_tunable() {
        let mut config = AnalyzerConfig::default();
        config.thresholds.min_continuity = 0.0;
        let result = ReasoningDebugger::new(config)
            .unwrap()
            .analyze("The sky is blue.\nChocolate ice cream tastes great.")
            .unwrap();
        assert_eq!(result.flow, FlowVerdict::Smooth);
    }
}
