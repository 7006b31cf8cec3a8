// Configuration Storage Service
// Analyzer thresholds and trigger lexicons, loaded from config.json

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use super::error::{AnalysisError, AnalysisOutcome};

const CONFIG_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub lexicons: Lexicons,
    /// Word-level sentiment model: word -> (polarity, subjectivity).
    #[serde(default = "default_sentiment")]
    pub sentiment: BTreeMap<String, SentimentEntry>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            thresholds: Thresholds::default(),
            lexicons: Lexicons::default(),
            sentiment: default_sentiment(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    /// Jaccard similarity a restated pair must exceed to count as circular.
    #[serde(default = "default_circular_similarity")]
    pub circular_similarity: f64,
    /// Polarity magnitude above which a step reads as emotional.
    #[serde(default = "default_sentiment_magnitude")]
    pub sentiment_magnitude: f64,
    /// Subjectivity at or above which a step counts as an opinionated claim.
    #[serde(default = "default_subjectivity")]
    pub subjectivity: f64,
    /// Consecutive steps below this similarity lose topical continuity.
    #[serde(default = "default_min_continuity")]
    pub min_continuity: f64,
    #[serde(default = "default_min_grounding_steps")]
    pub min_grounding_steps: usize,
    /// Content words a negated/unnegated pair must share to count as contradicting.
    #[serde(default = "default_min_contradiction_overlap")]
    pub min_contradiction_overlap: usize,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            circular_similarity: default_circular_similarity(),
            sentiment_magnitude: default_sentiment_magnitude(),
            subjectivity: default_subjectivity(),
            min_continuity: default_min_continuity(),
            min_grounding_steps: default_min_grounding_steps(),
            min_contradiction_overlap: default_min_contradiction_overlap(),
            max_steps: default_max_steps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lexicons {
    #[serde(default = "default_hedge")]
    pub hedge: Vec<String>,
    #[serde(default = "default_absolutist")]
    pub absolutist: Vec<String>,
    /// Set phrases containing absolutist words that do not generalize ("all right").
    #[serde(default = "default_absolutist_idioms")]
    pub absolutist_idioms: Vec<String>,
    #[serde(default = "default_emotional")]
    pub emotional: Vec<String>,
    #[serde(default = "default_causal")]
    pub causal: Vec<String>,
    #[serde(default = "default_connective")]
    pub connective: Vec<String>,
    #[serde(default = "default_conclusion")]
    pub conclusion: Vec<String>,
    #[serde(default = "default_assertive")]
    pub assertive: Vec<String>,
    /// Negation words; a negated and an unnegated step about the same things contradict.
    #[serde(default = "default_negation")]
    pub negation: Vec<String>,
    /// Statements that need no supporting reason ("the sky is blue"). May be empty.
    #[serde(default = "default_common_knowledge")]
    pub common_knowledge: Vec<String>,
    #[serde(default = "default_stopwords")]
    pub stopwords: BTreeSet<String>,
    #[serde(default = "default_contexts")]
    pub contexts: BTreeMap<String, Vec<String>>,
}

impl Default for Lexicons {
    fn default() -> Self {
        Self {
            hedge: default_hedge(),
            absolutist: default_absolutist(),
            absolutist_idioms: default_absolutist_idioms(),
            emotional: default_emotional(),
            causal: default_causal(),
            connective: default_connective(),
            conclusion: default_conclusion(),
            assertive: default_assertive(),
            negation: default_negation(),
            common_knowledge: default_common_knowledge(),
            stopwords: default_stopwords(),
            contexts: default_contexts(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SentimentEntry {
    pub polarity: f64,
    pub subjectivity: f64,
}

impl AnalyzerConfig {
    /// Reject configurations the detectors cannot run with.
    pub fn validate(&self) -> AnalysisOutcome<()> {
        let required: [(&str, usize); 9] = [
            ("hedge", self.lexicons.hedge.len()),
            ("absolutist", self.lexicons.absolutist.len()),
            ("emotional", self.lexicons.emotional.len()),
            ("causal", self.lexicons.causal.len()),
            ("connective", self.lexicons.connective.len()),
            ("conclusion", self.lexicons.conclusion.len()),
            ("assertive", self.lexicons.assertive.len()),
            ("negation", self.lexicons.negation.len()),
            ("stopwords", self.lexicons.stopwords.len()),
        ];
        for (name, len) in required {
            if len == 0 {
                return Err(AnalysisError::config(format!("lexicon '{}' is empty", name)));
            }
        }

        let t = &self.thresholds;
        let unit_range = [
            ("circularSimilarity", t.circular_similarity),
            ("sentimentMagnitude", t.sentiment_magnitude),
            ("subjectivity", t.subjectivity),
            ("minContinuity", t.min_continuity),
        ];
        for (name, value) in unit_range {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalysisError::config(format!(
                    "threshold '{}' must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if t.min_contradiction_overlap == 0 {
            return Err(AnalysisError::config("threshold 'minContradictionOverlap' must be positive"));
        }
        if t.max_steps == 0 {
            return Err(AnalysisError::config("threshold 'maxSteps' must be positive"));
        }

        for (word, entry) in &self.sentiment {
            if !(-1.0..=1.0).contains(&entry.polarity) || !(0.0..=1.0).contains(&entry.subjectivity) {
                return Err(AnalysisError::config(format!(
                    "sentiment entry '{}' is out of range",
                    word
                )));
            }
        }

        Ok(())
    }
}

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("reasoncheck"))
    }

    pub fn config_file(&self) -> &PathBuf {
        &self.config_file
    }

    /// Load and validate configuration; a missing file yields the defaults.
    pub fn load(&self) -> AnalysisOutcome<AnalyzerConfig> {
        if !self.config_file.exists() {
            info!(path = %self.config_file.display(), "config.missing_using_defaults");
            return Ok(AnalyzerConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)?;
        let config: AnalyzerConfig = serde_json::from_str(&content).map_err(|e| {
            warn!(path = %self.config_file.display(), error = %e, "config.parse_failed");
            AnalysisError::config(format!("failed to parse {}: {}", self.config_file.display(), e))
        })?;

        if config.version != CONFIG_VERSION {
            warn!(found = %config.version, expected = CONFIG_VERSION, "config.version_mismatch");
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AnalyzerConfig) -> AnalysisOutcome<()> {
        config.validate()?;
        fs::create_dir_all(&self.config_dir)?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, content)?;
        Ok(())
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_version() -> String { CONFIG_VERSION.to_string() }
fn default_circular_similarity() -> f64 { 0.5 }
fn default_sentiment_magnitude() -> f64 { 0.5 }
fn default_subjectivity() -> f64 { 0.5 }
fn default_min_continuity() -> f64 { 0.1 }
fn default_min_grounding_steps() -> usize { 2 }
fn default_min_contradiction_overlap() -> usize { 2 }
fn default_max_steps() -> usize { 200 }

fn default_hedge() -> Vec<String> {
    words(&[
        "some", "sometimes", "often", "many", "most", "usually", "generally", "frequently",
        "occasionally", "several", "few", "might", "may", "perhaps", "probably", "possibly",
        "likely", "tend to", "tends to", "seem", "seems", "in my experience", "in some cases",
        "rarely", "almost",
    ])
}

fn default_absolutist() -> Vec<String> {
    words(&[
        "always", "never", "everyone", "everybody", "everything", "nobody", "no one",
        "nothing", "all", "every", "none", "entirely", "completely", "totally",
    ])
}

fn default_absolutist_idioms() -> Vec<String> {
    words(&[
        "all right", "all of the above", "all in all", "every now and then", "every so often",
        "after all", "at all", "once and for all",
    ])
}

fn default_emotional() -> Vec<String> {
    words(&[
        "angry", "afraid", "scared", "worried", "anxious", "nervous", "frustrated",
        "disappointed", "ashamed", "guilty", "jealous", "lonely", "hopeless", "hate", "furious",
        "terrified", "ecstatic", "miserable", "awful", "terrible", "horrible", "dreadful",
        "devastated", "heartbroken", "thrilled", "amazing", "fantastic", "wonderful", "disgusting",
        "i can't stand", "i can't handle",
    ])
}

fn default_causal() -> Vec<String> {
    words(&[
        "because", "since", "due to", "given that", "as a result", "data shows", "data show",
        "studies show", "research shows", "evidence", "according to", "for example",
        "for instance", "shows", "measured", "statistics",
    ])
}

fn default_connective() -> Vec<String> {
    words(&[
        "therefore", "thus", "hence", "consequently", "because", "since", "so that",
        "as a result", "additionally", "furthermore", "moreover", "however", "on the other hand",
        "conversely", "for example", "for instance", "specifically", "which means", "this means",
        "that means", "then", "also", "finally", "first", "second", "next",
    ])
}

fn default_conclusion() -> Vec<String> {
    words(&[
        "should", "must", "therefore", "thus", "hence", "consequently", "ought to", "have to",
        "need to", "it follows that",
    ])
}

fn default_assertive() -> Vec<String> {
    words(&[
        "clearly", "obviously", "definitely", "certainly", "undeniably", "undoubtedly",
        "absolutely", "without a doubt", "everyone knows", "it is a fact", "i know", "of course",
        "the best", "the worst", "is the only",
    ])
}

fn default_negation() -> Vec<String> {
    words(&[
        "no", "not", "never", "none", "nobody", "nothing", "nowhere", "neither", "nor", "don't",
        "doesn't", "didn't", "isn't", "aren't", "wasn't", "weren't", "can't", "won't",
    ])
}

fn default_common_knowledge() -> Vec<String> {
    words(&[
        "the sky is blue", "water is wet", "the earth is round", "humans need oxygen",
        "the sun rises in the east", "paris is the capital of france", "water freezes at 0",
        "the sun is a star", "humans are mortal",
    ])
}

fn default_stopwords() -> BTreeSet<String> {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "can't", "could", "did", "do", "does", "doing",
        "don't", "down", "during", "each", "few", "for", "from", "further", "had", "has",
        "have", "having", "he", "hence", "her", "here", "hers", "him", "his", "how", "i",
        "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "it", "it's", "its", "just",
        "may", "me", "might", "more", "most", "must", "my", "myself", "no", "nor", "not", "of",
        "off", "on", "once", "only", "or", "other", "our", "ours", "out", "over", "own", "same",
        "she", "should", "since", "so", "some", "such", "than", "that", "that's", "the",
        "their", "them", "then", "there", "therefore", "these", "they", "they're", "this",
        "those", "through", "thus", "to", "too", "under", "until", "up", "very", "was", "we",
        "we're", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
        "will", "with", "would", "you", "you're", "your", "yours",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_contexts() -> BTreeMap<String, Vec<String>> {
    let mut contexts = BTreeMap::new();
    contexts.insert(
        "academic".to_string(),
        words(&["study", "exam", "test", "homework", "assignment", "class", "course", "learn", "review"]),
    );
    contexts.insert(
        "relationship".to_string(),
        words(&["boyfriend", "girlfriend", "partner", "relationship", "break up", "breakup", "date"]),
    );
    contexts.insert(
        "career".to_string(),
        words(&["job", "career", "work", "employer", "promotion", "resume", "interview", "boss"]),
    );
    contexts.insert(
        "financial".to_string(),
        words(&["money", "save", "saving", "debt", "income", "broke", "bill", "expense", "budget", "budgeting"]),
    );
    contexts.insert(
        "health".to_string(),
        words(&["eat", "dinner", "lunch", "breakfast", "food", "exercise", "workout", "sleep", "rest"]),
    );
    contexts
}

fn default_sentiment() -> BTreeMap<String, SentimentEntry> {
    let table: &[(&str, f64, f64)] = &[
        ("amazing", 0.6, 0.9),
        ("angry", -0.5, 1.0),
        ("annoying", -0.8, 0.9),
        ("awful", -1.0, 1.0),
        ("bad", -0.7, 0.67),
        ("beautiful", 0.85, 1.0),
        ("best", 1.0, 0.3),
        ("boring", -1.0, 1.0),
        ("brilliant", 0.9, 1.0),
        ("disgusting", -1.0, 1.0),
        ("dreadful", -1.0, 1.0),
        ("excellent", 1.0, 1.0),
        ("fantastic", 0.4, 0.9),
        ("furious", -0.9, 1.0),
        ("good", 0.7, 0.6),
        ("great", 0.8, 0.75),
        ("happy", 0.8, 1.0),
        ("hate", -0.8, 0.9),
        ("hopeless", -0.7, 0.8),
        ("horrible", -1.0, 1.0),
        ("important", 0.4, 1.0),
        ("incredible", 0.9, 0.9),
        ("love", 0.5, 0.6),
        ("miserable", -1.0, 1.0),
        ("nice", 0.6, 1.0),
        ("perfect", 1.0, 1.0),
        ("pointless", -0.6, 0.8),
        ("sad", -0.5, 1.0),
        ("stupid", -0.8, 1.0),
        ("terrible", -1.0, 1.0),
        ("ugly", -0.7, 1.0),
        ("useless", -0.5, 0.2),
        ("wonderful", 1.0, 1.0),
        ("worst", -1.0, 1.0),
        ("wrong", -0.5, 0.9),
    ];
    table
        .iter()
        .map(|(w, p, s)| (w.to_string(), SentimentEntry { polarity: *p, subjectivity: *s }))
        .collect()
}
