// Topic Flow Detector
// Consecutive steps with too little lexical overlap and no connective bridging them

use crate::models::{Issue, IssueKind, IssueTarget, Severity, TriggerCategory};
use super::{round4, DetectionContext};
use crate::services::text_processor::jaccard;

pub fn detect(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let min_continuity = ctx.config.thresholds.min_continuity;

    ctx.views
        .windows(2)
        .filter_map(|pair| {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.signals.has(TriggerCategory::Connective) {
                return None;
            }
            let similarity = jaccard(&prev.informative, &next.informative);
            if similarity >= min_continuity {
                return None;
            }
            Some(Issue {
                target: IssueTarget::Pair { first: prev.index(), second: next.index() },
                kind: IssueKind::AbruptTopicChange,
                severity: Severity::Warning,
                evidence: format!(
                    "step {} shares almost nothing with step {} (similarity {:.2}) and has no connective",
                    next.index(),
                    prev.index(),
                    similarity
                ),
                triggers: Vec::new(),
                similarity: Some(round4(similarity)),
            })
        })
        .collect()
}
