// Local keyword representation: a topic is described by its c-TF-IDF
// keywords as-is. No network, always available.

use anyhow::Result;
use async_trait::async_trait;

use super::model::KeywordWeight;
use super::traits::{RepresentationModel, TopicDraft};

pub struct KeywordRepresentation;

#[async_trait]
impl RepresentationModel for KeywordRepresentation {
    fn name(&self) -> &'static str {
        "keywords"
    }

    async fn represent(&self, topics: &[TopicDraft]) -> Result<Vec<Vec<KeywordWeight>>> {
        Ok(topics.iter().map(|t| t.keywords.clone()).collect())
    }
}
