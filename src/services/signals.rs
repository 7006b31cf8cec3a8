// Signal Provider
// Tokens, sentiment, subjectivity and trigger-phrase matches for one piece of text.
//
// Detectors only see the `SignalProvider` contract; the lexicon implementation
// below could be swapped for a trained classifier without touching them.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{StepSignals, TriggerCategory};
use super::config_store::{AnalyzerConfig, SentimentEntry};
use super::error::SignalError;
use super::text_processor::{tokenize, PhraseMatcher};

const INTENSIFIER_FACTOR: f64 = 1.3;
const NEGATION_FACTOR: f64 = -0.5;

const INTENSIFIERS: &[&str] = &[
    "very", "really", "extremely", "so", "incredibly", "totally", "utterly", "truly", "deeply",
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "aren't", "wasn't", "weren't",
    "can't", "won't", "hardly",
];

pub trait SignalProvider: Send + Sync {
    fn signals(&self, text: &str) -> Result<StepSignals, SignalError>;
}

/// Lexicon-backed scorer built once from an `AnalyzerConfig`.
pub struct LexiconSignalProvider {
    matchers: Vec<(TriggerCategory, PhraseMatcher)>,
    sentiment: BTreeMap<String, SentimentEntry>,
    stopwords: BTreeSet<String>,
}

impl LexiconSignalProvider {
    pub fn new(config: &AnalyzerConfig) -> Self {
        let lex = &config.lexicons;
        let matchers: Vec<(TriggerCategory, PhraseMatcher)> = vec![
            (TriggerCategory::Hedge, PhraseMatcher::new(&lex.hedge)),
            (TriggerCategory::Absolutist, PhraseMatcher::new(&lex.absolutist)),
            (TriggerCategory::AbsolutistIdiom, PhraseMatcher::new(&lex.absolutist_idioms)),
            (TriggerCategory::Emotional, PhraseMatcher::new(&lex.emotional)),
            (TriggerCategory::Causal, PhraseMatcher::new(&lex.causal)),
            (TriggerCategory::Connective, PhraseMatcher::new(&lex.connective)),
            (TriggerCategory::Conclusion, PhraseMatcher::new(&lex.conclusion)),
            (TriggerCategory::Assertive, PhraseMatcher::new(&lex.assertive)),
            (TriggerCategory::CommonKnowledge, PhraseMatcher::new(&lex.common_knowledge)),
        ]
        .into_iter()
        .filter(|(_, matcher)| !matcher.is_empty())
        .collect();
        Self {
            matchers,
            sentiment: config.sentiment.clone(),
            stopwords: lex.stopwords.clone(),
        }
    }

    /// (polarity, subjectivity) averaged over sentiment-bearing words.
    /// A negator or intensifier modifies the next sentiment word; stopwords
    /// in between keep the modifier alive, any other word resets it.
    fn score_sentiment(&self, tokens: &[String]) -> (f64, f64) {
        let mut modifier = 1.0_f64;
        let mut polarities = Vec::new();
        let mut subjectivities = Vec::new();

        for token in tokens {
            let t = token.as_str();
            if NEGATORS.contains(&t) {
                modifier *= NEGATION_FACTOR;
            } else if INTENSIFIERS.contains(&t) {
                modifier *= INTENSIFIER_FACTOR;
            } else if let Some(entry) = self.sentiment.get(t) {
                polarities.push((entry.polarity * modifier).clamp(-1.0, 1.0));
                subjectivities.push((entry.subjectivity * modifier.abs().max(1.0)).min(1.0));
                modifier = 1.0;
            } else if !self.stopwords.contains(t) {
                modifier = 1.0;
            }
        }

        if polarities.is_empty() {
            return (0.0, 0.0);
        }
        let n = polarities.len() as f64;
        let polarity = polarities.iter().sum::<f64>() / n;
        let subjectivity = subjectivities.iter().sum::<f64>() / n;
        (polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0))
    }
}

impl SignalProvider for LexiconSignalProvider {
    fn signals(&self, text: &str) -> Result<StepSignals, SignalError> {
        let tokens = tokenize(text);
        let (polarity, subjectivity) = self.score_sentiment(&tokens);

        let mut triggers = BTreeMap::new();
        for (category, matcher) in &self.matchers {
            let found = matcher.find(&tokens);
            if !found.is_empty() {
                triggers.insert(*category, found);
            }
        }

        Ok(StepSignals {
            token_count: tokens.len(),
            tokens,
            polarity,
            subjectivity,
            triggers,
        })
    }
}
