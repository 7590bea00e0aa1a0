use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::text::chunker::DEFAULT_MAX_SENTENCES;
use crate::topics::openai::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};

/// Which document embedder the topic model uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmbedderBackend {
    /// ONNX sentence embeddings when the model is downloaded, TF-IDF otherwise
    Auto,
    /// Local ONNX all-MiniLM-L6-v2, fails if the model is missing
    Onnx,
    /// TF-IDF term vectors, no downloads needed
    TfIdf,
}

impl EmbedderBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedderBackend::Auto => "auto",
            EmbedderBackend::Onnx => "onnx",
            EmbedderBackend::TfIdf => "tfidf",
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// override individual values after loading.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    /// Downloaded models, WordNet and the Reuters corpus live here
    pub data_dir: PathBuf,
    /// Where `batch` writes its JSON files
    pub output_dir: PathBuf,
    pub max_sentences: usize,
    pub min_topic_size: usize,
    /// `None` uses the embedder's own default
    pub similarity_threshold: Option<f64>,
    pub embedder: EmbedderBackend,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default. Malformed numbers are an error rather than
    /// silently ignored.
    pub fn load() -> Result<Self> {
        let embedder = match env::var("THEMATIC_EMBEDDER").as_deref() {
            Ok("onnx") => EmbedderBackend::Onnx,
            Ok("tfidf") => EmbedderBackend::TfIdf,
            Ok("auto") | Ok("") | Err(_) => EmbedderBackend::Auto,
            Ok(other) => anyhow::bail!(
                "THEMATIC_EMBEDDER must be one of auto, onnx, tfidf (got {other:?})"
            ),
        };

        let data_dir = env::var("THEMATIC_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::resources::download::default_data_dir());

        let max_sentences = parse_var("THEMATIC_MAX_SENTENCES")?.unwrap_or(DEFAULT_MAX_SENTENCES);
        if max_sentences == 0 {
            anyhow::bail!("THEMATIC_MAX_SENTENCES must be at least 1");
        }

        Ok(Self {
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: env::var("THEMATIC_OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            data_dir,
            output_dir: env::var("THEMATIC_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            max_sentences,
            min_topic_size: parse_var("THEMATIC_MIN_TOPIC_SIZE")?.unwrap_or(2),
            similarity_threshold: parse_var("THEMATIC_SIMILARITY_THRESHOLD")?,
            embedder,
        })
    }

    /// Check that the OpenAI API key is configured.
    /// Call this before any operation that needs hosted topic labels.
    pub fn require_openai(&self) -> Result<()> {
        if self.openai_api_key.trim().is_empty() {
            anyhow::bail!(
                "OPENAI_API_KEY not set. Add it to your .env file to use OpenAI topic labels."
            );
        }
        Ok(())
    }
}

/// Parse an optional env var. Unset or empty means `None`.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid value for {name}: {value:?}")),
        _ => Ok(None),
    }
}
