// Suggestion Templates
// One template per issue kind; wording is filled from the issue's triggers and the step text

use crate::models::{Issue, IssueKind, IssueTarget, ReasoningChain, Suggestion, SuggestionTarget};
use crate::services::config_store::AnalyzerConfig;

const EXCERPT_CHARS: usize = 60;

/// Candidate suggestions for one issue, primary suggestion first.
pub fn render(issue: &Issue, chain: &ReasoningChain, config: &AnalyzerConfig) -> Vec<Suggestion> {
    let primary = |message: String, rationale: Vec<String>| Suggestion {
        target: SuggestionTarget::from(issue.target),
        source_issue_kind: issue.kind,
        severity: issue.severity,
        message,
        rationale,
    };

    match (issue.kind, issue.target) {
        (IssueKind::CircularReasoning, IssueTarget::Pair { first, second }) => vec![primary(
            format!(
                "Give step {} an independent reason instead of leaning on step {} (\"{}\").",
                second,
                first,
                step_excerpt(chain, first)
            ),
            vec![
                "What external evidence would support this conclusion on its own?".to_string(),
                format!("Would someone who doubts step {} be persuaded by step {}?", first, second),
            ],
        )],
        (IssueKind::HastyGeneralization, target) => {
            let index = target.anchor();
            let term = issue.triggers.first().map(String::as_str).unwrap_or("this wording");
            vec![primary(
                format!(
                    "Qualify '{}' in step {} (\"{}\"), e.g. with {}.",
                    term,
                    index,
                    step_excerpt(chain, index),
                    hedge_examples(config)
                ),
                vec![
                    "How many cases have you actually observed?".to_string(),
                    "What exceptions might there be to this generalization?".to_string(),
                ],
            )]
        }
        (IssueKind::UnsupportedClaim, target) => {
            let index = target.anchor();
            vec![primary(
                format!(
                    "Add supporting evidence or a reason for step {} (\"{}\").",
                    index,
                    step_excerpt(chain, index)
                ),
                vec![
                    "What evidence do you have for this claim?".to_string(),
                    "Is this a conclusion that needs facts or data behind it?".to_string(),
                ],
            )]
        }
        (IssueKind::EmotionalLanguage, target) => {
            let index = target.anchor();
            vec![primary(
                format!(
                    "Balance the feelings in step {} (\"{}\") with factual evidence.",
                    index,
                    step_excerpt(chain, index)
                ),
                vec![
                    "What specific observations support how you're feeling?".to_string(),
                    "Could you rephrase this in neutral, fact-based terms?".to_string(),
                ],
            )]
        }
        (IssueKind::UnsupportedAssumption, target) => {
            let index = target.anchor();
            vec![primary(
                format!(
                    "State the premises that lead to the conclusion in step {} before drawing it.",
                    index
                ),
                vec![
                    "What unstated assumption links your earlier steps to this conclusion?".to_string(),
                    "Would the conclusion still follow if that assumption were false?".to_string(),
                ],
            )]
        }
        (IssueKind::AbruptTopicChange, IssueTarget::Pair { first, second }) => vec![
            primary(
                format!(
                    "Explain how step {} connects to step {}, or move it to a separate argument.",
                    second, first
                ),
                vec![format!(
                    "What links \"{}\" to \"{}\"?",
                    step_excerpt(chain, first),
                    step_excerpt(chain, second)
                )],
            ),
            Suggestion {
                target: SuggestionTarget::Chain,
                source_issue_kind: issue.kind,
                severity: issue.severity,
                message: "Keep the argument on one line of thought and bridge topic shifts with connectives such as 'because' or 'therefore'.".to_string(),
                rationale: vec!["Which single question is this argument trying to answer?".to_string()],
            },
        ],
        // Pair-scoped kinds never arrive as single steps.
        (IssueKind::CircularReasoning | IssueKind::AbruptTopicChange, IssueTarget::Step { .. }) => {
            Vec::new()
        }
    }
}

fn hedge_examples(config: &AnalyzerConfig) -> String {
    config
        .lexicons
        .hedge
        .iter()
        .filter(|h| !h.contains(' '))
        .take(3)
        .map(|h| format!("'{}'", h))
        .collect::<Vec<_>>()
        .join(" or ")
}

fn step_excerpt(chain: &ReasoningChain, index: usize) -> String {
    let text = chain.get(index).map(|s| s.text()).unwrap_or_default();
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use crate::services::parser::ChainParser;
    use std::sync::Arc;

    fn chain(text: &str) -> ReasoningChain {
        ChainParser::new(Arc::new(AnalyzerConfig::default())).parse(text).unwrap()
    }

    fn issue(kind: IssueKind, target: IssueTarget, triggers: &[&str]) -> Issue {
        Issue {
            target,
            kind,
            severity: Severity::Warning,
            evidence: String::new(),
            triggers: triggers.iter().map(|s| s.to_string()).collect(),
            similarity: None,
        }
    }

    #[test]
    fn test_hasty_template_names_trigger_and_hedges() {
        let chain = chain("Everyone always fails at budgeting.");
        let out = render(
            &issue(IssueKind::HastyGeneralization, IssueTarget::Step { index: 1 }, &["always", "everyone"]),
            &chain,
            &AnalyzerConfig::default(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].message,
            "Qualify 'always' in step 1 (\"Everyone always fails at budgeting.\"), e.g. with 'some' or 'sometimes' or 'often'."
        );
        assert_eq!(out[0].target, SuggestionTarget::Step { index: 1 });
    }

    #[test]
    fn test_topic_change_adds_chain_suggestion() {
        let chain = chain("The sky is blue.\nI like chocolate.");
        let out = render(
            &issue(IssueKind::AbruptTopicChange, IssueTarget::Pair { first: 1, second: 2 }, &[]),
            &chain,
            &AnalyzerConfig::default(),
        );
        let targets: Vec<SuggestionTarget> = out.iter().map(|s| s.target).collect();
        assert_eq!(
            targets,
            vec![SuggestionTarget::Pair { first: 1, second: 2 }, SuggestionTarget::Chain]
        );
        assert!(out.iter().all(|s| s.source_issue_kind == IssueKind::AbruptTopicChange));
    }

    #[test]
    fn test_long_steps_are_excerpted() {
        let long = "word ".repeat(30);
        let chain = chain(&long);
        let excerpt = step_excerpt(&chain, 1);
        assert!(excerpt.ends_with("..."));
        assert!(excerpt.chars().count() <= EXCERPT_CHARS + 3);
        assert_eq!(step_excerpt(&chain, 9), "");
    }
}
