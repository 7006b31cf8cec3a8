// Chain Parser
// Raw multi-line text -> ReasoningChain, one non-blank line per step

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

use crate::models::{ReasoningChain, ReasoningStep, RelationKind, StepRelation, StepRole};
use super::config_store::AnalyzerConfig;
use super::error::{AnalysisError, AnalysisOutcome};
use super::text_processor::{informative_tokens, normalize_text, tokenize, PhraseMatcher};

fn list_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:\d{1,3}[.)](?:\s+|$)|[-*•]\s+)").expect("list marker regex"))
}

pub struct ChainParser {
    config: Arc<AnalyzerConfig>,
    conclusion: PhraseMatcher,
    causal: PhraseMatcher,
    negation: BTreeSet<String>,
}

/// What a step asserts, for relation finding.
struct Stance {
    negated: bool,
    content: BTreeSet<String>,
}

impl ChainParser {
    pub fn new(config: Arc<AnalyzerConfig>) -> Self {
        let conclusion = PhraseMatcher::new(&config.lexicons.conclusion);
        let causal = PhraseMatcher::new(&config.lexicons.causal);
        let negation = config
            .lexicons
            .negation
            .iter()
            .map(|w| w.trim().to_lowercase())
            .collect();
        Self { config, conclusion, causal, negation }
    }

    pub fn parse(&self, text: &str) -> AnalysisOutcome<ReasoningChain> {
        let lines: Vec<&str> = text
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        if lines.is_empty() {
            warn!("[parser] input has no non-blank lines");
            return Err(AnalysisError::EmptyChain);
        }
        let max = self.config.thresholds.max_steps;
        if lines.len() > max {
            warn!(steps = lines.len(), max, "[parser] chain exceeds step limit");
            return Err(AnalysisError::OversizedChain { steps: lines.len(), max });
        }

        let mut steps = Vec::with_capacity(lines.len());
        let mut stances = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let content = strip_list_marker(line);
            // Stored text stays as written; only the analysis copy is normalized.
            let tokens = tokenize(&normalize_text(content));
            steps.push(ReasoningStep::new(i + 1, content.to_string(), self.classify(&tokens)));
            stances.push(self.stance(&tokens));
        }

        let relations = self.relate(&stances);
        let chain = ReasoningChain::from_steps(steps)?.with_relations(relations);
        debug!(
            steps = chain.len(),
            contradictions = chain.contradictions().count(),
            "[parser] chain parsed"
        );
        Ok(chain)
    }

    fn classify(&self, tokens: &[String]) -> StepRole {
        if self.conclusion.matches(tokens) {
            StepRole::Conclusion
        } else if self.causal.matches(tokens) {
            StepRole::Evidence
        } else {
            StepRole::Premise
        }
    }

    fn stance(&self, tokens: &[String]) -> Stance {
        let negated = tokens.iter().any(|t| self.negation.contains(t));
        let content: Vec<String> = tokens
            .iter()
            .filter(|t| !self.negation.contains(*t))
            .cloned()
            .collect();
        Stance {
            negated,
            content: informative_tokens(&content, &self.config.lexicons.stopwords),
        }
    }

    /// A pair contradicts when exactly one side is negated and both talk about
    /// at least `minContradictionOverlap` of the same content words.
    fn relate(&self, stances: &[Stance]) -> Vec<StepRelation> {
        let min_overlap = self.config.thresholds.min_contradiction_overlap;
        let mut relations = Vec::new();
        for (i, a) in stances.iter().enumerate() {
            for (j, b) in stances.iter().enumerate().skip(i + 1) {
                if a.negated == b.negated {
                    continue;
                }
                let shared: Vec<String> = a.content.intersection(&b.content).cloned().collect();
                if shared.len() >= min_overlap {
                    relations.push(StepRelation {
                        kind: RelationKind::Contradicts,
                        source: i + 1,
                        target: j + 1,
                        shared,
                    });
                }
            }
        }
        relations
    }
}

/// Drop a leading "1." / "2)" / "-" marker; a line that is only a marker is kept whole.
fn strip_list_marker(line: &str) -> &str {
    match list_marker_re().find(line) {
        Some(m) if m.end() < line.len() => line[m.end()..].trim(),
        _ => line,
    }
}
