// Class-based TF-IDF — keyword extraction per topic.
//
// All documents of a topic are treated as one big document ("class"). A
// word scores high for a topic when it is frequent in that topic and rare
// across all topics:
//
//   score(t, c) = (count(t, c) / words(c)) * ln(1 + A / f(t))
//
// where A is the average number of words per class and f(t) is the total
// count of t over all classes.

use std::collections::{BTreeMap, HashMap};

use super::model::KeywordWeight;

/// Split text into lowercase word tokens of at least two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

/// Top `top_n` keywords for each class, highest score first.
///
/// `classes` holds the documents of each class; the result is aligned with
/// it. Words scoring zero are dropped. Ties break alphabetically.
pub fn class_keywords(classes: &[Vec<&str>], top_n: usize) -> Vec<Vec<KeywordWeight>> {
    if classes.is_empty() {
        return Vec::new();
    }

    let counts: Vec<BTreeMap<String, f64>> = classes
        .iter()
        .map(|docs| {
            let mut counts = BTreeMap::new();
            for doc in docs {
                for token in tokenize(doc) {
                    *counts.entry(token).or_insert(0.0) += 1.0;
                }
            }
            counts
        })
        .collect();

    let mut frequency: HashMap<&str, f64> = HashMap::new();
    for class in &counts {
        for (word, count) in class {
            *frequency.entry(word.as_str()).or_insert(0.0) += count;
        }
    }

    let total_words: f64 = frequency.values().sum();
    let average_words = total_words / classes.len() as f64;

    counts
        .iter()
        .map(|class| {
            let class_words: f64 = class.values().sum();
            if class_words == 0.0 {
                return Vec::new();
            }

            let mut scored: Vec<KeywordWeight> = class
                .iter()
                .map(|(word, count)| {
                    let tf = count / class_words;
                    let idf = (1.0 + average_words / frequency[word.as_str()]).ln();
                    (word.clone(), tf * idf)
                })
                .filter(|(_, score)| *score > 0.0)
                .collect();

            scored.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
            scored.truncate(top_n);
            scored
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_drops_short_tokens() {
        assert_eq!(
            tokenize("Oil, a U.S. price-war: 2.5 pct"),
            vec!["oil", "price", "war", "pct"]
        );
    }

    #[test]
    fn test_distinctive_words_rank_first() {
        let classes = vec![
            vec!["oil price oil barrel", "oil opec market"],
            vec!["wheat grain market", "grain harvest wheat"],
        ];
        let keywords = class_keywords(&classes, 3);
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0][0].0, "oil");
        assert!(keywords[1][0].0 == "grain" || keywords[1][0].0 == "wheat");
        // "market" is shared, so it can't outrank a class-specific word
        let market_score = keywords[0]
            .iter()
            .find(|(w, _)| w == "market")
            .map(|(_, s)| *s)
            .unwrap_or(0.0);
        assert!(keywords[0][0].1 > market_score);
    }

    #[test]
    fn test_top_n_limits_and_sorted_descending() {
        let classes = vec![vec!["alpha beta gamma delta alpha beta alpha"]];
        let keywords = class_keywords(&classes, 2);
        assert_eq!(keywords[0].len(), 2);
        assert_eq!(keywords[0][0].0, "alpha");
        assert_eq!(keywords[0][1].0, "beta");
        assert!(keywords[0][0].1 >= keywords[0][1].1);
    }

    #[test]
    fn test_empty_class_has_no_keywords() {
        let classes = vec![vec!["oil price"], vec![""]];
        let keywords = class_keywords(&classes, 10);
        assert!(!keywords[0].is_empty());
        assert!(keywords[1].is_empty());
    }
}
