// Topic model seams — swap-ready abstractions for the two pluggable steps.
//
// DocumentEmbedder turns processed chunks into vectors for clustering. The
// default is a local sentence transformer (ONNX), with a TF-IDF embedder as
// the zero-download alternative.
//
// RepresentationModel turns a topic's c-TF-IDF keywords into the topic's
// final representation. The local strategy keeps the keywords; the hosted
// strategy asks a chat model for a readable label.

use anyhow::Result;
use async_trait::async_trait;

use super::model::{KeywordWeight, TopicId};

/// Converts documents into dense vectors. Implementations must return one
/// vector per input, in input order, all of the same dimension.
#[async_trait]
pub trait DocumentEmbedder: Send + Sync {
    /// Short name used in logs and status output.
    fn name(&self) -> &'static str;

    /// Cosine similarity above which clusters are merged when the caller
    /// doesn't choose a threshold. Depends on how spread out the vectors are.
    fn default_similarity_threshold(&self) -> f64;

    async fn embed(&self, documents: &[String]) -> Result<Vec<Vec<f64>>>;
}

/// What a representation strategy sees of one topic.
#[derive(Debug, Clone)]
pub struct TopicDraft {
    pub topic_id: TopicId,
    /// c-TF-IDF keywords, highest score first
    pub keywords: Vec<KeywordWeight>,
    /// Documents closest to the topic centroid
    pub representative_docs: Vec<String>,
}

/// Produces a topic's final representation from its draft.
#[async_trait]
pub trait RepresentationModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Return one representation per draft, in the same order.
    async fn represent(&self, topics: &[TopicDraft]) -> Result<Vec<Vec<KeywordWeight>>>;
}
