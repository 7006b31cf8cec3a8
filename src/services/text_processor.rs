// Text Processing Service
// Normalization, tokenization and lexical similarity shared by parser, signals and detectors

use regex::Regex;
use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::OnceLock;

fn space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\u{3000}\u{00A0}\u{2009}\u{202F}]").expect("space regex"))
}

fn horizontal_ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\x0C\x0B]+").expect("whitespace regex"))
}

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-z0-9]+(?:'[a-z]+)?").expect("word regex"))
}

/// Normalize quotes, dashes, exotic spaces and line endings.
/// Line structure is preserved; each line is trimmed.
pub fn normalize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut s = text
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{2014}', '\u{2013}'], "-");

    s = space_re().replace_all(&s, " ").to_string();
    s = s.replace("\r\n", "\n").replace('\r', "\n");
    s = horizontal_ws_re().replace_all(&s, " ").to_string();

    s.lines().map(str::trim).collect::<Vec<_>>().join("\n")
}

/// Lowercase word tokens; apostrophe contractions stay whole ("it's", "i'm").
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase().replace(['\u{2018}', '\u{2019}'], "'");
    word_re()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Light suffix-stripping stem so inflections of one word compare equal
/// ("save", "saves", "saving" -> "sav").
pub fn stem(token: &str) -> String {
    let len = token.chars().count();
    if len <= 3 || !token.is_ascii() {
        return token.to_string();
    }

    let mut s = if let Some(base) = token.strip_suffix("ies").filter(|b| b.len() >= 2) {
        format!("{}y", base)
    } else if let Some(base) = token.strip_suffix("ing").filter(|b| b.len() >= 3) {
        base.to_string()
    } else if let Some(base) = token.strip_suffix("ed").filter(|b| b.len() >= 3) {
        base.to_string()
    } else if let Some(base) = token.strip_suffix("ly").filter(|b| b.len() >= 3) {
        base.to_string()
    } else if token.ends_with('s') && !token.ends_with("ss") && !token.ends_with("us") {
        token[..token.len() - 1].to_string()
    } else {
        token.to_string()
    };

    if s.len() > 3 && s.ends_with('e') {
        s.pop();
    }

    // Collapse a doubled final consonant left behind by "-ing"/"-ed" ("stopped" -> "stop").
    let bytes = s.as_bytes();
    if bytes.len() > 3 {
        let last = bytes[bytes.len() - 1];
        if last == bytes[bytes.len() - 2] && !matches!(last, b'a' | b'e' | b'i' | b'o' | b'u' | b'l' | b's') {
            s.pop();
        }
    }

    s
}

/// Stemmed, stopword-free token set used for lexical-overlap comparisons.
pub fn informative_tokens(tokens: &[String], stopwords: &BTreeSet<String>) -> BTreeSet<String> {
    tokens
        .iter()
        .filter(|t| !stopwords.contains(t.as_str()))
        .filter(|t| t.chars().any(|c| c.is_alphabetic()))
        .map(|t| stem(t))
        .collect()
}

/// Jaccard similarity of two token sets; two empty sets are dissimilar.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Pre-tokenized phrase list matched on token boundaries.
#[derive(Debug, Clone, Default)]
pub struct PhraseMatcher {
    phrases: Vec<(String, Vec<String>)>,
}

impl PhraseMatcher {
    pub fn new<'a, I>(phrases: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let phrases = phrases
            .into_iter()
            .map(|p| (p.trim().to_lowercase(), tokenize(p)))
            .filter(|(_, toks)| !toks.is_empty())
            .collect();
        Self { phrases }
    }

    /// Phrases present in `tokens`, in lexicon order, each reported once.
    pub fn find(&self, tokens: &[String]) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for (phrase, needle) in &self.phrases {
            if contains_window(tokens, needle) && !found.contains(phrase) {
                found.push(phrase.clone());
            }
        }
        found
    }

    /// Token range of every occurrence of every phrase, in lexicon order.
    pub fn find_spans(&self, tokens: &[String]) -> Vec<(String, Range<usize>)> {
        let mut spans = Vec::new();
        for (phrase, needle) in &self.phrases {
            if needle.len() > tokens.len() {
                continue;
            }
            for (start, window) in tokens.windows(needle.len()).enumerate() {
                if window == needle.as_slice() {
                    spans.push((phrase.clone(), start..start + needle.len()));
                }
            }
        }
        spans
    }

    pub fn matches(&self, tokens: &[String]) -> bool {
        self.phrases
            .iter()
            .any(|(_, needle)| contains_window(tokens, needle))
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

fn contains_window(tokens: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > tokens.len() {
        return false;
    }
    tokens.windows(needle.len()).any(|w| w == needle)
}

fn is_justifier(token: &str) -> bool {
    token == "because" || token == "since"
}

/// Split a step into (claim, reason) tokens at its first "because"/"since".
/// A step that opens with the connector ("Because X, Y") is split at its first comma.
pub fn split_justification(text: &str) -> Option<(Vec<String>, Vec<String>)> {
    let tokens = tokenize(text);
    let pos = tokens.iter().position(|t| is_justifier(t))?;
    if pos > 0 {
        if pos + 1 >= tokens.len() {
            return None;
        }
        return Some((tokens[..pos].to_vec(), tokens[pos + 1..].to_vec()));
    }

    let (head, tail) = text.split_once(',')?;
    let reason: Vec<String> = tokenize(head).into_iter().skip(1).collect();
    let claim = tokenize(tail);
    if reason.is_empty() || claim.is_empty() {
        return None;
    }
    Some((claim, reason))
}
