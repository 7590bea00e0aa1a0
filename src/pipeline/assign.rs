// Joins fitted topics back onto the original chunks.
//
// The join is keyed by ChunkId, so chunks that were left out of fitting
// (blank after normalization) can't shift anyone else's topic. They come
// out as outliers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::text::{Chunk, ChunkId, ProcessedChunk};
use crate::topics::model::{KeywordWeight, TopicId, TopicModel, OUTLIER_TOPIC};

/// Name given to chunks that belong to no topic.
pub const OUTLIER_NAME: &str = "Outlier";

/// One output record: a chunk with its topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAssignment {
    #[serde(skip)]
    pub chunk_id: ChunkId,
    #[serde(rename = "Chunk")]
    pub chunk: String,
    #[serde(rename = "Processed Chunk")]
    pub processed_chunk: String,
    #[serde(rename = "Topic ID")]
    pub topic_id: TopicId,
    #[serde(rename = "Topic Name")]
    pub topic_name: String,
    #[serde(rename = "Topic Representation")]
    pub topic_representation: Vec<KeywordWeight>,
}

impl TopicAssignment {
    pub fn is_outlier(&self) -> bool {
        self.topic_id == OUTLIER_TOPIC
    }
}

/// One assignment per chunk, in chunk order.
pub fn assign_topics(
    chunks: &[Chunk],
    processed: &[ProcessedChunk],
    model: &TopicModel,
) -> Vec<TopicAssignment> {
    let processed_by_id: HashMap<ChunkId, &str> = processed
        .iter()
        .map(|p| (p.chunk_id, p.text.as_str()))
        .collect();

    chunks
        .iter()
        .map(|chunk| {
            let topic_id = model
                .topic_of(chunk.id)
                .map_or(OUTLIER_TOPIC, |doc| doc.topic_id);

            let (topic_name, topic_representation) = if topic_id == OUTLIER_TOPIC {
                (OUTLIER_NAME.to_string(), Vec::new())
            } else {
                let representation = model.get_topic(topic_id).unwrap_or_default().to_vec();
                (topic_name(topic_id, &representation), representation)
            };

            TopicAssignment {
                chunk_id: chunk.id,
                chunk: chunk.text.clone(),
                processed_chunk: processed_by_id
                    .get(&chunk.id)
                    .map(|text| text.to_string())
                    .unwrap_or_default(),
                topic_id,
                topic_name,
                topic_representation,
            }
        })
        .collect()
}

/// `"{id}_"` followed by the first representation entry's word and weight,
/// e.g. `3_oil_0.0412`. A topic without representation is named by its id.
pub fn topic_name(topic_id: TopicId, representation: &[KeywordWeight]) -> String {
    match representation.first() {
        Some((word, weight)) => format!("{topic_id}_{word}_{weight:?}"),
        None => topic_id.to_string(),
    }
}
