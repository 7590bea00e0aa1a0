// TF-IDF document embedder.
//
// Uses the `keyword_extraction` crate to pick a vocabulary of the most
// distinctive words across all chunks, then represents each chunk as a
// vector of those words weighted by their TF-IDF score. Zero downloads and
// zero API calls, so it is always available, but it only sees shared
// vocabulary: two chunks about the same thing in different words land far
// apart. The sentence embedder doesn't have that problem.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use stop_words::{get, LANGUAGE};
use tracing::debug;

use super::ctfidf::tokenize;
use super::embeddings::l2_normalize;
use super::traits::DocumentEmbedder;

/// Floor for vocabulary weights. With very few documents every IDF can be
/// zero, and the vectors still need a direction.
const MIN_WEIGHT: f64 = 1e-3;

/// TF-IDF based document embedder.
pub struct TfIdfEmbedder {
    /// How many top-scoring words make up the vector dimensions
    pub vocabulary_size: usize,
}

impl Default for TfIdfEmbedder {
    fn default() -> Self {
        Self {
            vocabulary_size: 2000,
        }
    }
}

impl TfIdfEmbedder {
    /// Build one L2-normalized vector per document over a shared vocabulary.
    pub fn vectorize(&self, documents: &[String]) -> Vec<Vec<f64>> {
        if documents.is_empty() {
            return Vec::new();
        }

        let stop_words: Vec<String> = get(LANGUAGE::English);
        let params = TfIdfParams::UnprocessedDocuments(documents, &stop_words, None);
        let tfidf = TfIdf::new(params);
        let ranked: Vec<(String, f32)> = tfidf.get_ranked_word_scores(self.vocabulary_size);

        let vocabulary: HashMap<String, (usize, f64)> = ranked
            .iter()
            .enumerate()
            .map(|(i, (word, score))| (word.to_lowercase(), (i, (*score as f64).max(MIN_WEIGHT))))
            .collect();

        debug!(
            documents = documents.len(),
            vocabulary = vocabulary.len(),
            "Built TF-IDF vocabulary"
        );

        documents
            .iter()
            .map(|doc| {
                let mut vector = vec![0.0_f64; ranked.len()];
                for token in tokenize(doc) {
                    if let Some(&(index, weight)) = vocabulary.get(&token) {
                        vector[index] += weight;
                    }
                }
                l2_normalize(&mut vector);
                vector
            })
            .collect()
    }
}

#[async_trait]
impl DocumentEmbedder for TfIdfEmbedder {
    fn name(&self) -> &'static str {
        "tf-idf"
    }

    fn default_similarity_threshold(&self) -> f64 {
        0.2
    }

    async fn embed(&self, documents: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(self.vectorize(documents))
    }
}
