// Suggestion Engine
// Maps issues to suggestions, deduplicates by (target, source kind) and ranks them

pub mod templates;

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use crate::models::{FlowVerdict, Issue, IssueKind, ReasoningChain, Suggestion, SuggestionTarget};
use super::config_store::AnalyzerConfig;

pub struct SuggestionEngine {
    config: Arc<AnalyzerConfig>,
}

impl SuggestionEngine {
    pub fn new(config: Arc<AnalyzerConfig>) -> Self {
        Self { config }
    }

    /// Suggestions for `issues` (expected in analyzer order). The first suggestion
    /// generated for a (target, kind) key wins; the result is ranked by `rank_key`.
    pub fn suggest(&self, chain: &ReasoningChain, issues: &[Issue]) -> Vec<Suggestion> {
        let mut seen: BTreeSet<(SuggestionTarget, IssueKind)> = BTreeSet::new();
        let mut suggestions = Vec::new();
        let mut dropped = 0usize;

        for issue in issues {
            for candidate in templates::render(issue, chain, &self.config) {
                if seen.insert((candidate.target, candidate.source_issue_kind)) {
                    suggestions.push(candidate);
                } else {
                    dropped += 1;
                }
            }
        }

        suggestions.sort_by_key(rank_key);
        debug!(kept = suggestions.len(), dropped, "[suggestions] ranked");
        suggestions
    }
}

/// Step targets first in step order, then chain-level advice. Within a target group:
/// severity (warning first), detector priority, then the steps involved.
pub fn rank_key(s: &Suggestion) -> (u8, usize, u8, IssueKind, usize, usize) {
    let group = u8::from(s.target.is_chain_level());
    let index = match s.target {
        SuggestionTarget::Step { index } => index,
        _ => 0,
    };
    let (first, second) = match s.target {
        SuggestionTarget::Step { index } => (index, index),
        SuggestionTarget::Pair { first, second } => (first, second),
        SuggestionTarget::Chain => (usize::MAX, usize::MAX),
    };
    (group, index, s.severity.rank(), s.source_issue_kind, first, second)
}

pub fn flow_verdict(issues: &[Issue]) -> FlowVerdict {
    if issues.iter().any(|i| i.kind == IssueKind::AbruptTopicChange) {
        FlowVerdict::Fragmented
    } else {
        FlowVerdict::Smooth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IssueTarget, Severity};
    use crate::services::parser::ChainParser;

    fn issue(kind: IssueKind, severity: Severity, target: IssueTarget) -> Issue {
        Issue {
            target,
            kind,
            severity,
            evidence: String::new(),
            triggers: Vec::new(),
            similarity: None,
        }
    }

    fn triggered(kind: IssueKind, target: IssueTarget, trigger: &str) -> Issue {
        Issue { triggers: vec![trigger.to_string()], ..issue(kind, Severity::Warning, target) }
    }

    fn setup(text: &str) -> (ReasoningChain, SuggestionEngine) {
        let config = Arc::new(AnalyzerConfig::default());
        let chain = ChainParser::new(config.clone()).parse(text).unwrap();
        (chain, SuggestionEngine::new(config))
    }

    #[test]
    fn test_duplicate_keys_collapse_first_wins() {
        let (chain, engine) = setup("a b\nc d\ne f");
        let issues = vec![
            issue(IssueKind::AbruptTopicChange, Severity::Warning, IssueTarget::Pair { first: 1, second: 2 }),
            issue(IssueKind::AbruptTopicChange, Severity::Warning, IssueTarget::Pair { first: 2, second: 3 }),
        ];
        let out = engine.suggest(&chain, &issues);
        let chain_level: Vec<&Suggestion> = out.iter().filter(|s| s.target == SuggestionTarget::Chain).collect();
        assert_eq!(chain_level.len(), 1);
        assert_eq!(out.len(), 3);

        let keys: BTreeSet<(SuggestionTarget, IssueKind)> =
            out.iter().map(|s| (s.target, s.source_issue_kind)).collect();
        assert_eq!(keys.len(), out.len());
    }

    #[test]
    fn test_same_key_keeps_first_issue_message() {
        let (chain, engine) = setup("Everyone always lies and never listens.");
        let target = IssueTarget::Step { index: 1 };
        let always = triggered(IssueKind::HastyGeneralization, target, "always");
        let never = triggered(IssueKind::HastyGeneralization, target, "never");

        let out = engine.suggest(&chain, &[always.clone(), never.clone()]);
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("'always'"));
        assert!(!out[0].message.contains("'never'"));

        let reversed = engine.suggest(&chain, &[never, always]);
        assert_eq!(reversed.len(), 1);
        assert!(reversed[0].message.contains("'never'"));
    }

    #[test]
    fn test_ranking_is_step_then_severity_then_priority() {
        let (chain, engine) = setup("one\ntwo\nthree");
        let issues = vec![
            issue(IssueKind::EmotionalLanguage, Severity::Info, IssueTarget::Step { index: 1 }),
            issue(IssueKind::UnsupportedAssumption, Severity::Warning, IssueTarget::Step { index: 1 }),
            issue(IssueKind::HastyGeneralization, Severity::Warning, IssueTarget::Step { index: 1 }),
            issue(IssueKind::AbruptTopicChange, Severity::Warning, IssueTarget::Pair { first: 2, second: 3 }),
            issue(IssueKind::CircularReasoning, Severity::Warning, IssueTarget::Pair { first: 1, second: 3 }),
            issue(IssueKind::UnsupportedClaim, Severity::Warning, IssueTarget::Step { index: 3 }),
        ];
        let order: Vec<(SuggestionTarget, IssueKind)> = engine
            .suggest(&chain, &issues)
            .iter()
            .map(|s| (s.target, s.source_issue_kind))
            .collect();
        assert_eq!(
            order,
            vec![
                (SuggestionTarget::Step { index: 1 }, IssueKind::HastyGeneralization),
                (SuggestionTarget::Step { index: 1 }, IssueKind::UnsupportedAssumption),
                (SuggestionTarget::Step { index: 1 }, IssueKind::EmotionalLanguage),
                (SuggestionTarget::Step { index: 3 }, IssueKind::UnsupportedClaim),
                (SuggestionTarget::Pair { first: 1, second: 3 }, IssueKind::CircularReasoning),
                (SuggestionTarget::Pair { first: 2, second: 3 }, IssueKind::AbruptTopicChange),
                (SuggestionTarget::Chain, IssueKind::AbruptTopicChange),
            ]
        );
    }

    #[test]
    fn test_ranking_ignores_issue_input_order() {
        let (chain, engine) = setup("one\ntwo");
        let a = issue(IssueKind::EmotionalLanguage, Severity::Info, IssueTarget::Step { index: 2 });
        let b = issue(IssueKind::UnsupportedClaim, Severity::Warning, IssueTarget::Step { index: 1 });
        let forward = engine.suggest(&chain, &[a.clone(), b.clone()]);
        let backward = engine.suggest(&chain, &[b, a]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_flow_verdict() {
        let smooth = vec![issue(IssueKind::EmotionalLanguage, Severity::Info, IssueTarget::Step { index: 1 })];
        assert_eq!(flow_verdict(&smooth), FlowVerdict::Smooth);
        assert_eq!(flow_verdict(&[]), FlowVerdict::Smooth);
        let fragmented = vec![issue(IssueKind::AbruptTopicChange, Severity::Warning, IssueTarget::Pair { first: 1, second: 2 })];
        assert_eq!(flow_verdict(&fragmented), FlowVerdict::Fragmented);
    }
}
