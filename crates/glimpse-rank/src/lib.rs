//! glimpse-rank
//!
//! Rapid Automatic Keyword Extraction. Candidate phrases are runs of words
//! between stop words and punctuation; each word scores degree / frequency
//! and a phrase scores the sum of its words.

use std::collections::{HashMap, HashSet};

use glimpse_core::traits::KeywordRanker;
use glimpse_core::types::RankedPhrase;

pub use glimpse_core::stopwords::STOP_WORDS;

const PHRASE_DELIMITERS: &[char] = &[
    '.', ',', '!', '?', ';', ':', '(', ')', '[', ']', '{', '}', '"', '|', '/', '\\', '<', '>', '=',
    '*', '•', '–', '—', '\n', '\r', '\t',
];

pub struct RakeRanker {
    stop_words: HashSet<String>,
}

impl Default for RakeRanker {
    fn default() -> Self {
        Self::with_stop_words(STOP_WORDS.iter().copied())
    }
}

impl RakeRanker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stop_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self { stop_words: words.into_iter().map(str::to_lowercase).collect() }
    }

    /// Splits text into candidate phrases, in order of first appearance.
    fn candidates(&self, text: &str) -> Vec<Vec<String>> {
        let mut phrases = Vec::new();
        for sentence in text.split(PHRASE_DELIMITERS) {
            let mut current: Vec<String> = Vec::new();
            for raw in sentence.split_whitespace() {
                let word = raw.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
                let is_boundary = word.is_empty()
                    || self.stop_words.contains(&word)
                    || word.chars().all(|c| c.is_numeric());
                if is_boundary {
                    if !current.is_empty() {
                        phrases.push(std::mem::take(&mut current));
                    }
                } else {
                    current.push(word);
                }
            }
            if !current.is_empty() {
                phrases.push(current);
            }
        }
        phrases
    }
}

impl KeywordRanker for RakeRanker {
    fn rank(&self, text: &str) -> Vec<RankedPhrase> {
        let phrases = self.candidates(text);

        let mut frequency: HashMap<&str, f64> = HashMap::new();
        let mut degree: HashMap<&str, f64> = HashMap::new();
        for phrase in &phrases {
            let len = phrase.len() as f64;
            for word in phrase {
                *frequency.entry(word.as_str()).or_default() += 1.0;
                *degree.entry(word.as_str()).or_default() += len;
            }
        }

        let mut seen = HashSet::new();
        let mut ranked = Vec::new();
        for phrase in &phrases {
            let joined = phrase.join(" ");
            if !seen.insert(joined.clone()) {
                continue;
            }
            let score: f64 = phrase
                .iter()
                .map(|w| degree[w.as_str()] / frequency[w.as_str()])
                .sum();
            ranked.push(RankedPhrase { phrase: joined, score });
        }
        // Stable: equal scores keep first-appearance order.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}
