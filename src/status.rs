// System status — which resources are downloaded and which backends a run
// would use.

use std::path::Path;

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::config::{Config, EmbedderBackend};
use crate::resources::download::{
    embedding_files_present, embedding_model_dir, reuters_dir, reuters_present, wordnet_dir,
    wordnet_present,
};

/// One downloadable resource.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceState {
    pub name: &'static str,
    pub path: String,
    pub present: bool,
    /// Last modification time, when present
    pub updated_at: Option<DateTime<Utc>>,
}

/// Snapshot of resource availability and configured backends.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub data_dir: String,
    pub embedder: &'static str,
    /// The embedder a run would actually use, after `auto` resolution
    pub effective_embedder: &'static str,
    pub lemmatizer: &'static str,
    pub openai_configured: bool,
    pub openai_model: String,
    pub resources_loaded: bool,
    pub resources: Vec<ResourceState>,
}

impl Status {
    pub fn collect(config: &Config) -> Self {
        let data_dir = &config.data_dir;
        let embedding = embedding_files_present(data_dir);
        let wordnet = wordnet_present(data_dir);

        let effective_embedder = match config.embedder {
            EmbedderBackend::Onnx => "onnx",
            EmbedderBackend::TfIdf => "tfidf",
            EmbedderBackend::Auto if embedding => "onnx",
            EmbedderBackend::Auto => "tfidf",
        };

        Self {
            data_dir: data_dir.display().to_string(),
            embedder: config.embedder.as_str(),
            effective_embedder,
            lemmatizer: if wordnet { "wordnet" } else { "builtin" },
            openai_configured: config.require_openai().is_ok(),
            openai_model: config.openai_model.clone(),
            resources_loaded: crate::resources::is_ready(),
            resources: vec![
                resource("Embedding model", &embedding_model_dir(data_dir), embedding),
                resource("WordNet", &wordnet_dir(data_dir), wordnet),
                resource(
                    "Reuters corpus",
                    &reuters_dir(data_dir),
                    reuters_present(data_dir),
                ),
            ],
        }
    }
}

fn resource(name: &'static str, path: &Path, present: bool) -> ResourceState {
    let updated_at = if present {
        std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from)
    } else {
        None
    };
    ResourceState {
        name,
        path: path.display().to_string(),
        present,
        updated_at,
    }
}

/// Display system status to the terminal.
pub fn show(config: &Config) {
    let status = Status::collect(config);

    println!("Data directory: {}", status.data_dir);
    println!(
        "Embedder: {} (using {})",
        status.embedder, status.effective_embedder
    );
    println!("Lemmatizer: {}", status.lemmatizer);
    if status.openai_configured {
        println!("OpenAI: configured ({})", status.openai_model);
    } else {
        println!("OpenAI: not configured");
        println!("  Set OPENAI_API_KEY to enable hosted topic labels");
    }

    println!();
    let mut missing = false;
    for res in &status.resources {
        match (res.present, res.updated_at) {
            (true, Some(at)) => println!(
                "  {} {} ({})",
                "✓".green(),
                res.name,
                at.format("%Y-%m-%d %H:%M")
            ),
            (true, None) => println!("  {} {}", "✓".green(), res.name),
            (false, _) => {
                missing = true;
                println!("  {} {} {}", "✗".red(), res.name, "(missing)".dimmed());
            }
        }
    }

    if missing {
        println!("\nRun `thematic download-resources` to fetch missing resources.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(data_dir: PathBuf) -> Config {
        Config {
            openai_api_key: String::new(),
            openai_base_url: "http://localhost".into(),
            openai_model: "gpt-4o-mini".into(),
            data_dir,
            output_dir: PathBuf::from("data"),
            max_sentences: 5,
            min_topic_size: 2,
            similarity_threshold: None,
            embedder: EmbedderBackend::Auto,
        }
    }

    #[test]
    fn test_empty_data_dir_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let status = Status::collect(&config(dir.path().to_path_buf()));
        assert_eq!(status.effective_embedder, "tfidf");
        assert_eq!(status.lemmatizer, "builtin");
        assert!(!status.openai_configured);
        assert!(status.resources.iter().all(|r| !r.present && r.updated_at.is_none()));
    }

    #[test]
    fn test_present_resource_has_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let reuters = reuters_dir(dir.path());
        std::fs::create_dir_all(reuters.join("test")).unwrap();
        std::fs::create_dir_all(reuters.join("training")).unwrap();

        let status = Status::collect(&config(dir.path().to_path_buf()));
        let corpus = status
            .resources
            .iter()
            .find(|r| r.name == "Reuters corpus")
            .unwrap();
        assert!(corpus.present);
        assert!(corpus.updated_at.is_some());
    }
}
