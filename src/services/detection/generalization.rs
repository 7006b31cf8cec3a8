// Hasty Generalization Detector

use crate::models::{Issue, IssueKind, IssueTarget, Severity, TriggerCategory};
use super::{quote_list, DetectionContext, StepView};
use crate::services::text_processor::PhraseMatcher;

pub fn detect(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let absolutist = PhraseMatcher::new(&ctx.config.lexicons.absolutist);
    let idioms = PhraseMatcher::new(&ctx.config.lexicons.absolutist_idioms);

    ctx.views
        .iter()
        .filter_map(|view| {
            let terms = sweeping_terms(view, &absolutist, &idioms);
            if terms.is_empty() || view.signals.has(TriggerCategory::Hedge) {
                return None;
            }
            Some(Issue {
                target: IssueTarget::Step { index: view.index() },
                kind: IssueKind::HastyGeneralization,
                severity: Severity::Warning,
                evidence: format!("absolutist wording {} with no qualifier", quote_list(&terms)),
                triggers: terms,
                similarity: None,
            })
        })
        .collect()
}

/// Absolutist matches with at least one occurrence outside a set phrase such as "all right".
fn sweeping_terms(view: &StepView<'_>, absolutist: &PhraseMatcher, idioms: &PhraseMatcher) -> Vec<String> {
    let signals = view.signals;
    if !signals.has(TriggerCategory::AbsolutistIdiom) {
        return signals.matched(TriggerCategory::Absolutist).to_vec();
    }

    let idiom_spans: Vec<_> = idioms
        .find_spans(&signals.tokens)
        .into_iter()
        .map(|(_, span)| span)
        .collect();

    let mut terms: Vec<String> = Vec::new();
    for (term, span) in absolutist.find_spans(&signals.tokens) {
        let inside_idiom = idiom_spans
            .iter()
            .any(|idiom| idiom.start <= span.start && span.end <= idiom.end);
        if !inside_idiom && !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::detection::test_support::run;

    fn triggers(text: &str) -> Vec<Vec<String>> {
        run(detect, text).into_iter().map(|i| i.triggers).collect()
    }

    #[test]
    fn test_absolutist_without_hedge() {
        let issues = run(detect, "Everyone always fails at budgeting.");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].triggers, vec!["always".to_string(), "everyone".to_string()]);
        assert_eq!(issues[0].target, IssueTarget::Step { index: 1 });
    }

    #[test]
    fn test_hedged_statement_passes() {
        assert!(run(detect, "Some people sometimes struggle with budgeting.").is_empty());
        assert!(run(detect, "Everyone probably struggles with budgeting at first.").is_empty());
    }

    #[test]
    fn test_idiom_is_not_a_generalization() {
        assert!(run(detect, "The plan turned out all right.").is_empty());
        assert!(run(detect, "We visit every now and then.").is_empty());
        assert_eq!(triggers("It's all right, nobody minds."), vec![vec!["nobody".to_string()]]);
    }

    #[test]
    fn test_repeated_absolutes_are_generalizations() {
        assert_eq!(triggers("Every politician lies every time."), vec![vec!["every".to_string()]]);
        assert_eq!(triggers("All politicians lie all the time."), vec![vec!["all".to_string()]]);
        assert_eq!(triggers("Politicians lie all the time."), vec![vec!["all".to_string()]]);
    }

    #[test]
    fn test_idiom_hides_only_its_own_words() {
        assert_eq!(
            triggers("All voters agree, and that's all right."),
            vec![vec!["all".to_string()]]
        );
    }
}
