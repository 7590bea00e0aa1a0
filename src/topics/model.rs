// Topic model — embeds processed chunks, clusters them, and describes each
// cluster with keywords.
//
// Fitting runs in a fixed order:
//   1. drop blank documents (never an error)
//   2. embed with the injected DocumentEmbedder
//   3. agglomerative clustering; clusters below min_topic_size are outliers
//   4. topic ids by cluster size, largest first, starting at 0
//   5. c-TF-IDF keywords per topic (the outlier class included)
//   6. the injected RepresentationModel turns keywords into the final
//      representation of every non-outlier topic

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::cluster::agglomerative;
use super::ctfidf::class_keywords;
use super::embeddings::{cosine_similarity, mean_vector};
use super::traits::{DocumentEmbedder, RepresentationModel, TopicDraft};
use crate::text::{ChunkId, ProcessedChunk};

/// Topic identifier. Non-negative ids are real topics.
pub type TopicId = i64;

/// Reserved topic id for chunks that didn't fit any topic.
pub const OUTLIER_TOPIC: TopicId = -1;

/// A keyword (or generated label) and its weight.
pub type KeywordWeight = (String, f64);

/// Tuning knobs for fitting.
#[derive(Debug, Clone)]
pub struct FitParams {
    /// Clusters with fewer chunks than this become outliers
    pub min_topic_size: usize,
    /// Merge cutoff for clustering; `None` uses the embedder's default
    pub similarity_threshold: Option<f64>,
    /// Keywords kept per topic
    pub top_n_words: usize,
    /// Chunks per topic handed to the representation model
    pub representative_docs: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            min_topic_size: 2,
            similarity_threshold: None,
            top_n_words: 10,
            representative_docs: 3,
        }
    }
}

/// The topic assigned to one fitted chunk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DocumentTopic {
    pub chunk_id: ChunkId,
    pub topic_id: TopicId,
    /// Similarity to the topic centroid, 0.0 to 1.0 (0.0 for outliers)
    pub probability: f64,
}

/// A fitted topic.
#[derive(Debug, Clone, Serialize)]
pub struct Topic {
    pub id: TopicId,
    /// Number of chunks assigned to this topic
    pub count: usize,
    /// c-TF-IDF keywords, highest score first
    pub keywords: Vec<KeywordWeight>,
    /// Final representation (keywords, or a generated label)
    pub representation: Vec<KeywordWeight>,
    pub representative_docs: Vec<String>,
}

impl Topic {
    pub fn is_outlier(&self) -> bool {
        self.id == OUTLIER_TOPIC
    }

    /// Display name: the id followed by up to four representation words.
    pub fn name(&self) -> String {
        let words: Vec<&str> = self
            .representation
            .iter()
            .map(|(word, _)| word.as_str())
            .filter(|word| !word.is_empty())
            .take(4)
            .collect();
        if words.is_empty() {
            self.id.to_string()
        } else {
            format!("{}_{}", self.id, words.join("_"))
        }
    }
}

/// One row of the topic overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicInfo {
    #[serde(rename = "Topic")]
    pub topic: TopicId,
    #[serde(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Representation")]
    pub representation: Vec<String>,
}

/// A fitted topic model.
#[derive(Debug, Clone)]
pub struct TopicModel {
    /// Sorted by id; the outlier topic, if any, comes first
    topics: Vec<Topic>,
    documents: Vec<DocumentTopic>,
    by_chunk: HashMap<ChunkId, usize>,
}

impl TopicModel {
    fn new(topics: Vec<Topic>, documents: Vec<DocumentTopic>) -> Self {
        let by_chunk = documents
            .iter()
            .enumerate()
            .map(|(i, doc)| (doc.chunk_id, i))
            .collect();
        Self {
            topics,
            documents,
            by_chunk,
        }
    }

    /// Topic assignments for every chunk that took part in fitting.
    pub fn document_topics(&self) -> &[DocumentTopic] {
        &self.documents
    }

    /// The assignment for one chunk, if it took part in fitting.
    pub fn topic_of(&self, chunk_id: ChunkId) -> Option<&DocumentTopic> {
        self.by_chunk.get(&chunk_id).map(|&i| &self.documents[i])
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// The representation of a topic, or `None` for an unknown id.
    pub fn get_topic(&self, id: TopicId) -> Option<&[KeywordWeight]> {
        self.topics
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.representation.as_slice())
    }

    /// Number of real (non-outlier) topics.
    pub fn topic_count(&self) -> usize {
        self.topics.iter().filter(|t| !t.is_outlier()).count()
    }

    /// One row per topic, in id order.
    pub fn topic_info(&self) -> Vec<TopicInfo> {
        self.topics
            .iter()
            .map(|t| TopicInfo {
                topic: t.id,
                count: t.count,
                name: t.name(),
                representation: t.representation.iter().map(|(w, _)| w.clone()).collect(),
            })
            .collect()
    }
}

/// Fits topic models with an injected embedder and representation strategy.
pub struct TopicFitter {
    embedder: Arc<dyn DocumentEmbedder>,
    representation: Box<dyn RepresentationModel>,
    params: FitParams,
}

impl TopicFitter {
    pub fn new(
        embedder: Arc<dyn DocumentEmbedder>,
        representation: Box<dyn RepresentationModel>,
        params: FitParams,
    ) -> Self {
        Self {
            embedder,
            representation,
            params,
        }
    }

    pub fn representation_name(&self) -> &'static str {
        self.representation.name()
    }

    /// Fit a topic model over the non-blank processed chunks.
    ///
    /// Fails when no chunk has any text left, or when embedding or the
    /// representation step fails.
    pub async fn fit(&self, documents: &[ProcessedChunk]) -> Result<TopicModel> {
        let docs: Vec<&ProcessedChunk> = documents.iter().filter(|d| !d.is_blank()).collect();
        if docs.is_empty() {
            anyhow::bail!(
                "Cannot fit a topic model on zero documents ({} chunks, all empty after normalization)",
                documents.len()
            );
        }

        let texts: Vec<String> = docs.iter().map(|d| d.text.clone()).collect();
        let embeddings = self.embedder.embed(&texts).await?;
        if embeddings.len() != texts.len() {
            anyhow::bail!(
                "Embedder {} returned {} vectors for {} documents",
                self.embedder.name(),
                embeddings.len(),
                texts.len()
            );
        }

        let threshold = self
            .params
            .similarity_threshold
            .unwrap_or_else(|| self.embedder.default_similarity_threshold());
        let mut clusters: Vec<Vec<usize>> = agglomerative(&embeddings, threshold)
            .into_iter()
            .filter(|members| members.len() >= self.params.min_topic_size.max(1))
            .collect();
        clusters.sort_by_key(|members| (Reverse(members.len()), members[0]));

        let mut labels = vec![OUTLIER_TOPIC; docs.len()];
        let mut probabilities = vec![0.0_f64; docs.len()];
        for (topic_id, members) in clusters.iter().enumerate() {
            let vectors: Vec<&[f64]> = members.iter().map(|&m| embeddings[m].as_slice()).collect();
            let centroid = mean_vector(&vectors);
            for &m in members {
                labels[m] = topic_id as TopicId;
                probabilities[m] = cosine_similarity(&embeddings[m], &centroid).clamp(0.0, 1.0);
            }
        }

        // Class order: outliers first (if any), then topics by id
        let outliers: Vec<usize> = (0..docs.len())
            .filter(|&i| labels[i] == OUTLIER_TOPIC)
            .collect();
        let mut classes: Vec<(TopicId, Vec<usize>)> = Vec::new();
        if !outliers.is_empty() {
            classes.push((OUTLIER_TOPIC, outliers));
        }
        for (topic_id, members) in clusters.into_iter().enumerate() {
            classes.push((topic_id as TopicId, members));
        }

        let class_docs: Vec<Vec<&str>> = classes
            .iter()
            .map(|(_, members)| members.iter().map(|&m| texts[m].as_str()).collect())
            .collect();
        let keywords = class_keywords(&class_docs, self.params.top_n_words);

        let mut topics: Vec<Topic> = classes
            .iter()
            .zip(keywords)
            .map(|((id, members), keywords)| {
                let mut ranked = members.clone();
                ranked.sort_by(|&a, &b| {
                    probabilities[b]
                        .partial_cmp(&probabilities[a])
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                Topic {
                    id: *id,
                    count: members.len(),
                    representation: keywords.clone(),
                    keywords,
                    representative_docs: ranked
                        .iter()
                        .take(self.params.representative_docs)
                        .map(|&m| texts[m].clone())
                        .collect(),
                }
            })
            .collect();

        let drafts: Vec<TopicDraft> = topics
            .iter()
            .filter(|t| !t.is_outlier())
            .map(|t| TopicDraft {
                topic_id: t.id,
                keywords: t.keywords.clone(),
                representative_docs: t.representative_docs.clone(),
            })
            .collect();

        let representations = self.representation.represent(&drafts).await?;
        if representations.len() != drafts.len() {
            anyhow::bail!(
                "Representation model {} returned {} representations for {} topics",
                self.representation.name(),
                representations.len(),
                drafts.len()
            );
        }
        for (topic, representation) in topics
            .iter_mut()
            .filter(|t| !t.is_outlier())
            .zip(representations)
        {
            debug!(topic = topic.id, name = %topic.name(), "Represented topic");
            topic.representation = representation;
        }

        let documents: Vec<DocumentTopic> = docs
            .iter()
            .enumerate()
            .map(|(i, doc)| DocumentTopic {
                chunk_id: doc.chunk_id,
                topic_id: labels[i],
                probability: probabilities[i],
            })
            .collect();

        let model = TopicModel::new(topics, documents);
        info!(
            documents = docs.len(),
            topics = model.topic_count(),
            outliers = labels.iter().filter(|&&l| l == OUTLIER_TOPIC).count(),
            embedder = self.embedder.name(),
            representation = self.representation.name(),
            "Fitted topic model"
        );
        Ok(model)
    }
}
