// Stopword filtering.
//
// The word list comes from the `stop-words` crate (English). Matching is
// case-insensitive on whole whitespace-separated tokens, so punctuation
// attached to a token ("the," or "it.") keeps it in the text.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// A fixed, lowercased set of stopwords.
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// The English stopword list.
    pub fn english() -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self::from_words(words)
    }

    /// Build a set from arbitrary words (lowercased on the way in).
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Drop every token whose lowercase form is a stopword, preserving order.
/// Surviving tokens are rejoined with single spaces.
pub fn remove_stopwords(text: &str, stopwords: &StopwordSet) -> String {
    text.split_whitespace()
        .filter(|word| !stopwords.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}
