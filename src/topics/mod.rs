// Topic modeling — embeddings, clustering, keywords and topic labels.
//
// DocumentEmbedder and RepresentationModel are the swap points: the fitter
// doesn't care whether vectors come from a local ONNX model or TF-IDF, or
// whether labels come from c-TF-IDF keywords or a hosted chat model.

pub mod cluster;
pub mod ctfidf;
pub mod embeddings;
pub mod model;
pub mod openai;
pub mod representation;
pub mod tfidf;
pub mod traits;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{Config, EmbedderBackend};
use crate::resources::download::{embedding_files_present, embedding_model_dir};
use embeddings::SentenceEmbedder;
use tfidf::TfIdfEmbedder;
use traits::DocumentEmbedder;

/// Build the embedder selected by the configuration.
///
/// `auto` prefers the ONNX model and falls back to TF-IDF when it hasn't been
/// downloaded or fails to load.
pub fn build_embedder(config: &Config) -> Result<Arc<dyn DocumentEmbedder>> {
    let model_dir = embedding_model_dir(&config.data_dir);
    match config.embedder {
        EmbedderBackend::TfIdf => Ok(Arc::new(TfIdfEmbedder::default())),
        EmbedderBackend::Onnx => Ok(Arc::new(SentenceEmbedder::load(&model_dir)?)),
        EmbedderBackend::Auto => {
            if !embedding_files_present(&config.data_dir) {
                info!(
                    "Embedding model not downloaded, using TF-IDF vectors \
                     (run `thematic download-resources` for sentence embeddings)"
                );
                return Ok(Arc::new(TfIdfEmbedder::default()));
            }
            match SentenceEmbedder::load(&model_dir) {
                Ok(embedder) => Ok(Arc::new(embedder)),
                Err(e) => {
                    warn!(error = %e, "Failed to load embedding model, falling back to TF-IDF");
                    Ok(Arc::new(TfIdfEmbedder::default()))
                }
            }
        }
    }
}
