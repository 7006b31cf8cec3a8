// Circular Reasoning Detector
// A later step that only restates an earlier one, or two steps that justify each other

use std::collections::BTreeSet;

use crate::models::{Issue, IssueKind, IssueTarget, Severity};
use super::{round4, DetectionContext, StepView};
use crate::services::text_processor::{informative_tokens, jaccard, split_justification};

enum Finding {
    Restatement(f64),
    MutualJustification,
}

pub fn detect(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let threshold = ctx.config.thresholds.circular_similarity;
    let stopwords = &ctx.config.lexicons.stopwords;
    let mut issues = Vec::new();

    for (j, later) in ctx.views.iter().enumerate().skip(1) {
        // First qualifying earlier step only.
        let hit = ctx.views[..j].iter().find_map(|earlier| {
            classify_pair(earlier, later, threshold, stopwords).map(|f| (earlier, f))
        });
        let Some((earlier, finding)) = hit else { continue };

        let target = IssueTarget::Pair { first: earlier.index(), second: later.index() };
        let issue = match finding {
            Finding::Restatement(similarity) => Issue {
                target,
                kind: IssueKind::CircularReasoning,
                severity: Severity::Warning,
                evidence: format!(
                    "step {} restates step {} without adding new support (similarity {:.2})",
                    later.index(),
                    earlier.index(),
                    similarity
                ),
                triggers: Vec::new(),
                similarity: Some(round4(similarity)),
            },
            Finding::MutualJustification => Issue {
                target,
                kind: IssueKind::CircularReasoning,
                severity: Severity::Warning,
                evidence: format!(
                    "steps {} and {} each give the other's claim as their reason",
                    earlier.index(),
                    later.index()
                ),
                triggers: Vec::new(),
                similarity: None,
            },
        };
        issues.push(issue);
    }

    issues
}

fn classify_pair(
    earlier: &StepView<'_>,
    later: &StepView<'_>,
    threshold: f64,
    stopwords: &BTreeSet<String>,
) -> Option<Finding> {
    let (a, b) = (&earlier.informative, &later.informative);
    if !a.is_empty() && !b.is_empty() {
        let similarity = jaccard(a, b);
        if similarity > threshold && (a.is_subset(b) || b.is_subset(a)) {
            return Some(Finding::Restatement(similarity));
        }
    }

    let (claim_a, reason_a) = split_justification(earlier.step.text())?;
    let (claim_b, reason_b) = split_justification(later.step.text())?;
    let claim_a = informative_tokens(&claim_a, stopwords);
    let reason_a = informative_tokens(&reason_a, stopwords);
    let claim_b = informative_tokens(&claim_b, stopwords);
    let reason_b = informative_tokens(&reason_b, stopwords);

    let supports = |reason: &BTreeSet<String>, claim: &BTreeSet<String>| {
        !reason.is_empty() && reason.is_subset(claim)
    };
    if supports(&reason_a, &claim_b) && supports(&reason_b, &claim_a) {
        return Some(Finding::MutualJustification);
    }
    None
}
