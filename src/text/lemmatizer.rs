// Noun lemmatizer — maps inflected tokens to their dictionary base form.
//
// Two backends share one interface:
//
// - WordNet: when the WordNet noun index and exception list have been
//   downloaded, lemmas are found the way WordNet's morphology does it:
//   exception lookup, then suffix detachment rules, keeping only candidates
//   that exist in the noun lexicon. The shortest candidate wins.
// - Built-in: an irregular-noun table plus conservative suffix rules. Used
//   when WordNet data isn't available. Less accurate, but it never needs a
//   download and it is idempotent by construction.
//
// Lookups are case-insensitive. A token whose lemma equals its own lowercase
// form comes back exactly as it went in.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// WordNet's noun detachment rules, in WordNet order.
const WORDNET_NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Irregular plurals for the built-in backend. Self-mappings protect
/// invariant nouns from the suffix rules.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("oxen", "ox"),
    ("data", "datum"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("theses", "thesis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("halves", "half"),
    ("wolves", "wolf"),
    ("shelves", "shelf"),
    ("thieves", "thief"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("means", "means"),
    ("physics", "physics"),
    ("economics", "economics"),
    ("politics", "politics"),
];

/// Noun lemmatizer backed by WordNet data or built-in rules.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    backend: Backend,
}

#[derive(Debug, Clone)]
enum Backend {
    WordNet(WordNetNouns),
    Builtin(HashMap<&'static str, &'static str>),
}

#[derive(Debug, Clone)]
struct WordNetNouns {
    lemmas: HashSet<String>,
    exceptions: HashMap<String, Vec<String>>,
}

impl Lemmatizer {
    /// The built-in rule-based lemmatizer.
    pub fn builtin() -> Self {
        Self {
            backend: Backend::Builtin(IRREGULAR_NOUNS.iter().copied().collect()),
        }
    }

    /// Load WordNet noun data from a directory containing `index.noun` and
    /// `noun.exc` (the layout of the NLTK `wordnet` package).
    pub fn from_wordnet_dir(dir: &Path) -> Result<Self> {
        let index_path = dir.join("index.noun");
        let exc_path = dir.join("noun.exc");

        let index = std::fs::read_to_string(&index_path)
            .with_context(|| format!("Failed to read {}", index_path.display()))?;
        let exceptions = std::fs::read_to_string(&exc_path)
            .with_context(|| format!("Failed to read {}", exc_path.display()))?;

        let lemmatizer = Self::from_wordnet_data(&index, &exceptions);
        if let Backend::WordNet(ref nouns) = lemmatizer.backend {
            if nouns.lemmas.is_empty() {
                anyhow::bail!("WordNet noun index at {} is empty", index_path.display());
            }
            debug!(
                lemmas = nouns.lemmas.len(),
                exceptions = nouns.exceptions.len(),
                "Loaded WordNet noun data"
            );
        }
        Ok(lemmatizer)
    }

    /// Build a WordNet lemmatizer from the raw contents of `index.noun` and
    /// `noun.exc`.
    pub fn from_wordnet_data(index: &str, exceptions: &str) -> Self {
        // License header lines in index files start with whitespace
        let lemmas = index
            .lines()
            .filter(|line| !line.starts_with(char::is_whitespace))
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect();

        let exceptions = exceptions
            .lines()
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let inflected = fields.next()?;
                let bases: Vec<String> = fields.map(str::to_string).collect();
                if bases.is_empty() {
                    None
                } else {
                    Some((inflected.to_string(), bases))
                }
            })
            .collect();

        Self {
            backend: Backend::WordNet(WordNetNouns { lemmas, exceptions }),
        }
    }

    /// Whether this lemmatizer uses WordNet data.
    pub fn is_wordnet(&self) -> bool {
        matches!(self.backend, Backend::WordNet(_))
    }

    /// Lemmatize a single token. Tokens containing anything other than
    /// letters pass through unchanged.
    pub fn lemmatize(&self, token: &str) -> String {
        if token.is_empty() || !token.chars().all(char::is_alphabetic) {
            return token.to_string();
        }

        let lower = token.to_lowercase();
        let lemma = match &self.backend {
            Backend::WordNet(nouns) => nouns.lemma(&lower),
            Backend::Builtin(irregular) => builtin_lemma(irregular, &lower),
        };

        match lemma {
            Some(lemma) if lemma != lower => lemma,
            _ => token.to_string(),
        }
    }

    /// Lemmatize every whitespace-separated token and rejoin with single spaces.
    pub fn lemmatize_text(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|token| self.lemmatize(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl WordNetNouns {
    /// Morphy for nouns: exceptions first, then the detachment rules applied
    /// repeatedly until some candidate is in the lexicon.
    fn lemma(&self, form: &str) -> Option<String> {
        if let Some(bases) = self.exceptions.get(form) {
            let candidates = std::iter::once(form.to_string()).chain(bases.iter().cloned());
            return self.shortest_known(candidates);
        }

        let mut forms = apply_rules(&[form.to_string()]);
        if let Some(lemma) =
            self.shortest_known(std::iter::once(form.to_string()).chain(forms.iter().cloned()))
        {
            return Some(lemma);
        }
        while !forms.is_empty() {
            forms = apply_rules(&forms);
            if let Some(lemma) = self.shortest_known(forms.iter().cloned()) {
                return Some(lemma);
            }
        }
        None
    }

    fn shortest_known(&self, candidates: impl Iterator<Item = String>) -> Option<String> {
        candidates
            .filter(|c| !c.is_empty() && self.lemmas.contains(c))
            .min_by_key(|c| c.chars().count())
    }
}

/// One round of noun suffix detachment over every form. Each rule shortens
/// its input except `men -> man`, whose output matches no rule, so repeated
/// rounds run out.
fn apply_rules(forms: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for form in forms {
        for (suffix, replacement) in WORDNET_NOUN_RULES {
            if let Some(stem) = form.strip_suffix(suffix) {
                let candidate = format!("{stem}{replacement}");
                if !candidate.is_empty() && !out.contains(&candidate) {
                    out.push(candidate);
                }
            }
        }
    }
    out
}

fn builtin_lemma(irregular: &HashMap<&'static str, &'static str>, form: &str) -> Option<String> {
    if let Some(base) = irregular.get(form) {
        return Some(base.to_string());
    }
    if form.chars().count() <= 3 || ["ss", "us", "is"].iter().any(|s| form.ends_with(s)) {
        return None;
    }

    let stem = if let Some(stem) = form.strip_suffix("ies").filter(|s| s.len() > 1) {
        format!("{stem}y")
    } else if let Some(stem) = form.strip_suffix("sses") {
        format!("{stem}ss")
    } else if let Some(stem) = form.strip_suffix("shes") {
        format!("{stem}sh")
    } else if let Some(stem) = form.strip_suffix("xes") {
        format!("{stem}x")
    } else if let Some(stem) = form
        .strip_suffix("ches")
        .filter(|s| s.chars().last().is_some_and(|c| !"aeiou".contains(c)))
    {
        // "matches" -> "match", but "caches" -> "cache" via the plain rule
        format!("{stem}ch")
    } else if let Some(stem) = form.strip_suffix('s') {
        stem.to_string()
    } else {
        return None;
    };

    // Rule output may itself be an irregular form ("mens" -> "men")
    match irregular.get(stem.as_str()) {
        Some(base) => Some(base.to_string()),
        None => Some(stem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_regular_plurals() {
        let lem = Lemmatizer::builtin();
        assert_eq!(lem.lemmatize("dogs"), "dog");
        assert_eq!(lem.lemmatize("cities"), "city");
        assert_eq!(lem.lemmatize("boxes"), "box");
        assert_eq!(lem.lemmatize("classes"), "class");
        assert_eq!(lem.lemmatize("matches"), "match");
        assert_eq!(lem.lemmatize("caches"), "cache");
        assert_eq!(lem.lemmatize("dishes"), "dish");
    }

    #[test]
    fn test_builtin_irregular_and_protected() {
        let lem = Lemmatizer::builtin();
        assert_eq!(lem.lemmatize("children"), "child");
        assert_eq!(lem.lemmatize("mice"), "mouse");
        assert_eq!(lem.lemmatize("analyses"), "analysis");
        assert_eq!(lem.lemmatize("glass"), "glass");
        assert_eq!(lem.lemmatize("bus"), "bus");
        assert_eq!(lem.lemmatize("series"), "series");
        assert_eq!(lem.lemmatize("gas"), "gas");
    }

    #[test]
    fn test_case_insensitive_lookup_preserves_unchanged_tokens() {
        let lem = Lemmatizer::builtin();
        assert_eq!(lem.lemmatize("Dogs"), "dog");
        assert_eq!(lem.lemmatize("Dog"), "Dog");
    }

    #[test]
    fn test_non_alphabetic_tokens_pass_through() {
        let lem = Lemmatizer::builtin();
        assert_eq!(lem.lemmatize("dogs."), "dogs.");
        assert_eq!(lem.lemmatize("1987"), "1987");
        assert_eq!(lem.lemmatize("U.S."), "U.S.");
    }

    #[test]
    fn test_wordnet_backend_requires_lexicon_membership() {
        let index = "  1 This software and database is being provided\n\
                     dog n 1 1 @ 1 0 02084071\n\
                     glass n 1 1 @ 1 0 03438257\n\
                     mouse n 1 1 @ 1 0 02330245\n\
                     bus n 1 1 @ 1 0 02924116\n";
        let exc = "mice mouse\nbusses bus\n";
        let lem = Lemmatizer::from_wordnet_data(index, exc);
        assert!(lem.is_wordnet());
        assert_eq!(lem.lemmatize("dogs"), "dog");
        assert_eq!(lem.lemmatize("glasses"), "glass");
        assert_eq!(lem.lemmatize("mice"), "mouse");
        assert_eq!(lem.lemmatize("busses"), "bus");
        // "gla" is not in the lexicon, so "glass" stays put
        assert_eq!(lem.lemmatize("glass"), "glass");
        // Unknown words are left alone
        assert_eq!(lem.lemmatize("zorbs"), "zorbs");
    }

    #[test]
    fn test_wordnet_rules_reapply_until_lexicon_hit() {
        let index = "box n 1 1 @ 1 0 02883344\n\
                     boxes n 1 1 @ 1 0 02883345\n";
        let lem = Lemmatizer::from_wordnet_data(index, "");
        // The first round stops at the first lexicon hit
        assert_eq!(lem.lemmatize("boxess"), "boxes");

        // Without "boxes" in the lexicon a second round is needed
        let lem = Lemmatizer::from_wordnet_data("box n 1 1 @ 1 0 02883344\n", "");
        assert_eq!(lem.lemmatize("boxess"), "box");
        assert_eq!(lem.lemmatize("boxes"), "box");
        assert_eq!(lem.lemmatize("boxy"), "boxy");
    }

    #[test]
    fn test_wordnet_dir_missing_files_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Lemmatizer::from_wordnet_dir(dir.path()).is_err());
    }

    #[test]
    fn test_lemmatize_text_joins_with_single_spaces() {
        let lem = Lemmatizer::builtin();
        assert_eq!(lem.lemmatize_text("oil  prices\nrose"), "oil price rose");
    }
}
