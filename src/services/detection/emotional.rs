// Emotional Language Detector

use crate::models::{Issue, IssueKind, IssueTarget, Severity, TriggerCategory};
use super::{quote_list, DetectionContext};

pub fn detect(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let threshold = ctx.config.thresholds.sentiment_magnitude;

    ctx.views
        .iter()
        .filter_map(|view| {
            let signals = view.signals;
            let words = signals.matched(TriggerCategory::Emotional);
            let strong = signals.polarity.abs() > threshold;
            if !strong && words.is_empty() {
                return None;
            }

            let mut evidence = format!("sentiment polarity {:+.2}", signals.polarity);
            if !words.is_empty() {
                evidence.push_str(&format!("; emotional wording {}", quote_list(words)));
            }
            Some(Issue {
                target: IssueTarget::Step { index: view.index() },
                kind: IssueKind::EmotionalLanguage,
                severity: Severity::Info,
                evidence,
                triggers: words.to_vec(),
                similarity: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::detection::test_support::run;

    #[test]
    fn test_furious_boss_is_emotional_info() {
        let issues = run(detect, "I'm furious about my horrible boss.");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
        assert_eq!(issues[0].triggers, vec!["furious".to_string(), "horrible".to_string()]);
        assert!(issues[0].evidence.starts_with("sentiment polarity -0.95"));
    }

    #[test]
    fn test_lexicon_match_alone_is_enough() {
        // "worried" carries no polarity entry
        let issues = run(detect, "I'm worried about the deadline.");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].evidence, "sentiment polarity +0.00; emotional wording 'worried'");
    }

    #[test]
    fn test_strong_polarity_alone_is_enough() {
        let issues = run(detect, "The results were excellent.");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].triggers.is_empty());
    }

    #[test]
    fn test_mild_sentiment_is_ignored() {
        assert!(run(detect, "The rollout went fine overall.").is_empty());
        assert!(run(detect, "Saving money is important.").is_empty());
    }
}
