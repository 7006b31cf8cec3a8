// Unsupported Assumption Detector
// The first conclusion in the chain must rest on enough grounding steps before it

use crate::models::{Issue, IssueKind, IssueTarget, Severity, StepRole, TriggerCategory};
use super::{quote_list, DetectionContext};

pub fn detect(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let required = ctx.config.thresholds.min_grounding_steps;
    let Some(pos) = ctx
        .views
        .iter()
        .position(|v| v.step.role() == StepRole::Conclusion)
    else {
        return Vec::new();
    };

    let conclusion = &ctx.views[pos];
    let grounding = ctx.views[..pos]
        .iter()
        .filter(|v| {
            !v.informative.is_disjoint(&conclusion.informative)
                || v.signals.has(TriggerCategory::Causal)
        })
        .count();

    if grounding >= required {
        return Vec::new();
    }

    let triggers = conclusion.signals.matched(TriggerCategory::Conclusion).to_vec();
    vec![Issue {
        target: IssueTarget::Step { index: conclusion.index() },
        kind: IssueKind::UnsupportedAssumption,
        severity: Severity::Warning,
        evidence: format!(
            "conclusion {} rests on {} grounding step(s); at least {} expected",
            quote_list(&triggers),
            grounding,
            required
        ),
        triggers,
        similarity: None,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::detection::test_support::run;

    #[test]
    fn test_conclusion_with_thin_grounding() {
        let issues = run(
            detect,
            "Remote work increases productivity\nHappy employees are more productive\nTherefore companies should allow remote work",
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].target, IssueTarget::Step { index: 3 });
        assert_eq!(issues[0].triggers, vec!["should".to_string(), "therefore".to_string()]);
        assert!(issues[0].evidence.contains("rests on 1 grounding step(s)"));
    }

    #[test]
    fn test_leading_conclusion_is_flagged() {
        let issues = run(detect, "We must cancel the project\nIt is over budget");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].target, IssueTarget::Step { index: 1 });
    }

    #[test]
    fn test_grounded_conclusion_passes() {
        let issues = run(
            detect,
            "Remote work cuts commuting time\nSurveys show remote staff finish tasks faster because of fewer interruptions\nTherefore companies should allow remote work",
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_only_first_conclusion_is_checked() {
        let issues = run(
            detect,
            "We should cut costs\nWe must also hire",
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].target, IssueTarget::Step { index: 1 });
    }

    #[test]
    fn test_no_conclusion_no_issue() {
        assert!(run(detect, "The sky is blue\nGrass is green").is_empty());
    }
}
