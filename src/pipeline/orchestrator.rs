// Pipeline orchestrator — runs the four stages in order for one input text.
//
//   Idle -> Chunking -> Normalizing -> Fitting -> Assigning -> Done
//
// Any stage error moves the pipeline to Failed and remembers which stage
// failed. A pipeline instance runs once; build a new one for the next text.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::assign::{assign_topics, TopicAssignment};
use super::PipelineStage;
use crate::config::Config;
use crate::resources::Resources;
use crate::text::chunker::{chunk_text, DEFAULT_MAX_SENTENCES};
use crate::text::{Chunk, ProcessedChunk};
use crate::topics::model::{FitParams, KeywordWeight, TopicFitter, TopicId, TopicInfo, TopicModel};
use crate::topics::openai::{OpenAiRepresentation, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
use crate::topics::representation::KeywordRepresentation;
use crate::topics::traits::{DocumentEmbedder, RepresentationModel};

/// Settings for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Key for hosted representation; may be empty
    pub api_key: String,
    pub use_hosted_representation: bool,
    pub hosted_model_name: String,
    pub api_base_url: String,
    pub max_sentences: usize,
    pub fit: FitParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            use_hosted_representation: false,
            hosted_model_name: DEFAULT_OPENAI_MODEL.to_string(),
            api_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            max_sentences: DEFAULT_MAX_SENTENCES,
            fit: FitParams::default(),
        }
    }
}

impl PipelineConfig {
    /// Pipeline settings from the loaded configuration. Hosted
    /// representation stays off until the caller asks for it.
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            use_hosted_representation: false,
            hosted_model_name: config.openai_model.clone(),
            api_base_url: config.openai_base_url.clone(),
            max_sentences: config.max_sentences,
            fit: FitParams {
                min_topic_size: config.min_topic_size,
                similarity_threshold: config.similarity_threshold,
                ..FitParams::default()
            },
        }
    }

    pub fn with_hosted_representation(mut self, enabled: bool) -> Self {
        self.use_hosted_representation = enabled;
        self
    }
}

/// One run of the topic pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    resources: Arc<Resources>,
    fitter: TopicFitter,
    stage: PipelineStage,
    failed_stage: Option<PipelineStage>,
    model: Option<TopicModel>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        resources: Arc<Resources>,
        embedder: Arc<dyn DocumentEmbedder>,
    ) -> Self {
        let representation: Box<dyn RepresentationModel> = if config.use_hosted_representation {
            Box::new(OpenAiRepresentation::new(
                config.api_key.clone(),
                config.hosted_model_name.clone(),
                &config.api_base_url,
            ))
        } else {
            Box::new(KeywordRepresentation)
        };
        let fitter = TopicFitter::new(embedder, representation, config.fit.clone());

        Self {
            config,
            resources,
            fitter,
            stage: PipelineStage::Idle,
            failed_stage: None,
            model: None,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// The stage that was running when the pipeline failed.
    pub fn failed_stage(&self) -> Option<PipelineStage> {
        self.failed_stage
    }

    /// Run every stage on `text` and return one assignment per chunk.
    pub async fn process_text(&mut self, text: &str) -> Result<Vec<TopicAssignment>> {
        if self.stage != PipelineStage::Idle {
            anyhow::bail!(
                "Pipeline already ran (stage: {}); create a new pipeline for each text",
                self.stage
            );
        }

        let result = self.run(text).await;
        match &result {
            Ok(assignments) => {
                self.advance(PipelineStage::Done);
                info!(
                    chunks = assignments.len(),
                    topics = self.model.as_ref().map_or(0, TopicModel::topic_count),
                    "Pipeline finished"
                );
            }
            Err(_) => {
                self.failed_stage = Some(self.stage);
                self.stage = PipelineStage::Failed;
            }
        }
        result.with_context(|| {
            format!(
                "Pipeline failed during {}",
                self.failed_stage.unwrap_or(PipelineStage::Idle)
            )
        })
    }

    async fn run(&mut self, text: &str) -> Result<Vec<TopicAssignment>> {
        self.advance(PipelineStage::Chunking);
        let chunks: Vec<Chunk> = chunk_text(text, self.config.max_sentences);
        debug!(chunks = chunks.len(), max_sentences = self.config.max_sentences, "Chunked text");

        self.advance(PipelineStage::Normalizing);
        let normalizer = self.resources.normalizer();
        let processed: Vec<ProcessedChunk> = chunks.iter().map(|c| normalizer.process(c)).collect();
        let blank = processed.iter().filter(|p| p.is_blank()).count();
        debug!(chunks = processed.len(), blank = blank, "Normalized chunks");

        self.advance(PipelineStage::Fitting);
        let model = self.fitter.fit(&processed).await?;

        self.advance(PipelineStage::Assigning);
        let assignments = assign_topics(&chunks, &processed, &model);
        self.model = Some(model);
        Ok(assignments)
    }

    fn advance(&mut self, next: PipelineStage) {
        info!(from = %self.stage, to = %next, "Pipeline stage");
        self.stage = next;
    }

    /// Overview of the fitted topics.
    pub fn topic_info(&self) -> Result<Vec<TopicInfo>> {
        self.model
            .as_ref()
            .map(TopicModel::topic_info)
            .context("Topic model has not been fitted yet")
    }

    /// Representation of one topic, if the model is fitted and the id exists.
    pub fn get_topic(&self, id: TopicId) -> Option<&[KeywordWeight]> {
        self.model.as_ref()?.get_topic(id)
    }

    pub fn model(&self) -> Option<&TopicModel> {
        self.model.as_ref()
    }

    pub fn representation_name(&self) -> &'static str {
        self.fitter.representation_name()
    }
}
