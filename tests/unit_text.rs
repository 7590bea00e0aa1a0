// Unit tests for text preparation: chunking and normalization.
//
// Property-style checks over a handful of realistic inputs: chunking
// round-trips, stopword removal and lemmatization are idempotent, and chunk
// ids stay stable through normalization.

use thematic::resources::Resources;
use thematic::text::chunker::{chunk_text, split_sentences};
use thematic::text::lemmatizer::Lemmatizer;
use thematic::text::stopwords::{remove_stopwords, StopwordSet};
use thematic::text::ChunkId;

const SAMPLES: &[&str] = &[
    "A cat sat. A dog ran. The sun rose.",
    "Crude oil prices rose 2.5 pct on Monday.  OPEC ministers met in Vienna!\n\nWill output fall? Analysts said Mr. Smith was cautious.",
    "no terminators at all just words",
    "\"Is it over?\" she asked. \"Yes!\" He left.",
    "The U.S. Treasury sold bills. Rates on three-month bills rose to 5.95 pct from 5.87 pct.",
];

fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

// ============================================================
// Chunker
// ============================================================

#[test]
fn chunking_round_trips_up_to_whitespace() {
    for text in SAMPLES {
        for max_sentences in 1..=4 {
            let chunks = chunk_text(text, max_sentences);
            let joined = chunks
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            assert_eq!(
                words(&joined),
                words(text),
                "round trip failed for {text:?} with max_sentences={max_sentences}"
            );
        }
    }
}

#[test]
fn three_sentences_two_per_chunk() {
    let chunks = chunk_text("A cat sat. A dog ran. The sun rose.", 2);
    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["A cat sat. A dog ran.", "The sun rose."]);
}

#[test]
fn chunk_ids_are_sequential() {
    let chunks = chunk_text(SAMPLES[1], 1);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.id, ChunkId(i));
    }
}

#[test]
fn no_chunk_exceeds_max_sentences() {
    for text in SAMPLES {
        for chunk in chunk_text(text, 2) {
            assert!(
                split_sentences(&chunk.text).len() <= 2,
                "chunk has too many sentences: {:?}",
                chunk.text
            );
        }
    }
}

#[test]
fn empty_text_has_no_chunks() {
    assert!(chunk_text("", 5).is_empty());
    assert!(chunk_text("   \n\t ", 5).is_empty());
}

#[test]
fn decimals_and_abbreviations_do_not_split() {
    let sentences = split_sentences(SAMPLES[4]);
    assert_eq!(sentences.len(), 2, "got {sentences:?}");
}

// ============================================================
// Normalization
// ============================================================

#[test]
fn stopword_removal_is_idempotent() {
    let set = StopwordSet::english();
    for text in SAMPLES {
        let once = remove_stopwords(text, &set);
        let twice = remove_stopwords(&once, &set);
        assert_eq!(once, twice, "not idempotent for {text:?}");
    }
}

#[test]
fn lemmatization_is_idempotent() {
    let lemmatizer = Lemmatizer::builtin();
    let extra = "dogs cats boxes churches cities wolves mice analyses bonuses glasses";
    for text in SAMPLES.iter().chain(std::iter::once(&extra)) {
        let once = lemmatizer.lemmatize_text(text);
        let twice = lemmatizer.lemmatize_text(&once);
        assert_eq!(once, twice, "not idempotent for {text:?}");
    }
}

#[test]
fn all_stopwords_normalize_to_empty() {
    let resources = Resources::builtin();
    let chunk = chunk_text("the the the", 5).remove(0);
    let processed = resources.normalizer().process(&chunk);
    assert_eq!(processed.text, "");
    assert!(processed.is_blank());
    assert_eq!(processed.chunk_id, chunk.id);
}

#[test]
fn normalizer_removes_stopwords_then_lemmatizes() {
    let resources = Resources::builtin();
    let normalized = resources
        .normalizer()
        .normalize("The ministers and the prices of the barrels");
    assert_eq!(normalized, "minister price barrel");
}
