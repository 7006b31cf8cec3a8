// Unsupported Claim Detector
// Opinionated or assertive steps with no causal/evidentiary connector in themselves or a neighbor.
// Common-knowledge statements never need support.

use crate::models::{Issue, IssueKind, IssueTarget, Severity, TriggerCategory};
use super::{quote_list, DetectionContext};

pub fn detect(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let threshold = ctx.config.thresholds.subjectivity;
    let views = &ctx.views;
    let mut issues = Vec::new();

    for (pos, view) in views.iter().enumerate() {
        let signals = view.signals;
        let subjective = signals.subjectivity >= threshold;
        let assertive = signals.matched(TriggerCategory::Assertive);
        if !subjective && assertive.is_empty() {
            continue;
        }
        if signals.has(TriggerCategory::CommonKnowledge) {
            continue;
        }

        let lo = pos.saturating_sub(1);
        let hi = (pos + 1).min(views.len() - 1);
        let supported = views[lo..=hi]
            .iter()
            .any(|v| v.signals.has(TriggerCategory::Causal));
        if supported {
            continue;
        }

        let evidence = if assertive.is_empty() {
            format!("subjective claim (subjectivity {:.2}) with no supporting reason nearby", signals.subjectivity)
        } else {
            format!("assertive phrasing {} with no supporting reason nearby", quote_list(assertive))
        };
        issues.push(Issue {
            target: IssueTarget::Step { index: view.index() },
            kind: IssueKind::UnsupportedClaim,
            severity: Severity::Warning,
            evidence,
            triggers: assertive.to_vec(),
            similarity: None,
        });
    }

    issues
}
