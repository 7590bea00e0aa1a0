use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use thematic::config::Config;
use thematic::output::{self, terminal};
use thematic::pipeline::assign::TopicAssignment;
use thematic::pipeline::orchestrator::{Pipeline, PipelineConfig};
use thematic::resources::{self, corpus};
use thematic::topics::model::TopicInfo;

/// Thematic: topic discovery for plain text.
///
/// Splits text into sentence chunks, clusters them into topics, and labels
/// each chunk with its topic. Optionally asks OpenAI for readable topic
/// names.
#[derive(Parser)]
#[command(name = "thematic", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find topics in a text and print the labeled chunks as JSON
    Process {
        /// Text to process
        #[arg(long, conflicts_with_all = ["file", "sample"])]
        text: Option<String>,

        /// Read the text from a file
        #[arg(long, conflicts_with = "sample")]
        file: Option<PathBuf>,

        /// Use the Reuters sample corpus (run download-resources first)
        #[arg(long)]
        sample: bool,

        /// Label topics with OpenAI (needs OPENAI_API_KEY)
        #[arg(long)]
        openai: bool,

        /// OpenAI model for topic labels (default: THEMATIC_OPENAI_MODEL or gpt-4o-mini)
        #[arg(long)]
        model: Option<String>,

        /// Sentences per chunk (default: THEMATIC_MAX_SENTENCES or 5)
        #[arg(long)]
        max_sentences: Option<usize>,

        /// Write the JSON here instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Process the sample corpus with and without OpenAI labels into the output directory
    Batch,

    /// Download the embedding model, WordNet and the Reuters corpus
    DownloadResources,

    /// Show which resources are present and which backends are configured
    Status,

    /// Start the web interface
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 3000)
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("thematic=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            text,
            file,
            sample,
            openai,
            model,
            max_sentences,
            output: output_path,
        } => {
            let mut config = Config::load()?;
            if let Some(model) = model {
                config.openai_model = model;
            }
            if let Some(n) = max_sentences {
                if n == 0 {
                    anyhow::bail!("--max-sentences must be at least 1");
                }
                config.max_sentences = n;
            }

            let input = read_input(&config, text, file, sample)?;
            if input.trim().is_empty() {
                anyhow::bail!("No text to process. Pass --text, --file or --sample.");
            }

            if openai {
                if let Err(e) = config.require_openai() {
                    warn!("{e}");
                }
            }

            let (assignments, topics) = run_pipeline(&config, &input, openai).await?;

            match output_path {
                Some(path) => {
                    output::write_json(&path, &assignments)?;
                    terminal::display_topic_info(&topics);
                    terminal::display_run_summary(&assignments);
                    println!("Labeled chunks saved to {}", path.display());
                }
                None => println!("{}", output::to_pretty_json(&assignments)?),
            }
        }

        Commands::Batch => {
            let config = Config::load()?;
            let text = corpus::load_sample(&config.data_dir, corpus::SAMPLE_DOCUMENTS)?;
            info!(chars = text.len(), "Loaded sample corpus");

            let path = config.output_dir.join("topics_without_openai.json");
            let (assignments, topics) = run_pipeline(&config, &text, false).await?;
            output::write_json(&path, &assignments)?;
            terminal::display_topic_info(&topics);
            println!("Labeled chunks saved to {}", path.display());

            if config.require_openai().is_ok() {
                println!("\nUsing OpenAI for topic representation...");
                let path = config.output_dir.join("topics_with_openai.json");
                let (assignments, topics) = run_pipeline(&config, &text, true).await?;
                output::write_json(&path, &assignments)?;
                terminal::display_topic_info(&topics);
                println!("Labeled chunks saved to {}", path.display());
            } else {
                println!(
                    "\n{}",
                    "OPENAI_API_KEY not set, skipping the OpenAI run.".dimmed()
                );
            }
        }

        Commands::DownloadResources => {
            let config = Config::load()?;
            thematic::resources::download::download_resources(&config.data_dir).await?;
            println!(
                "\n{}",
                format!("Resources ready in {}", config.data_dir.display()).bold()
            );
        }

        Commands::Status => {
            let config = Config::load()?;
            thematic::status::show(&config);
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            thematic::web::run_server(config, port, &bind).await?;
        }
    }

    Ok(())
}

/// Pick the input text from exactly one source.
fn read_input(
    config: &Config,
    text: Option<String>,
    file: Option<PathBuf>,
    sample: bool,
) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return read_file(&path);
    }
    if sample {
        return corpus::load_sample(&config.data_dir, corpus::SAMPLE_DOCUMENTS);
    }
    anyhow::bail!("No input given. Pass --text, --file or --sample.")
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Build a fresh pipeline and run it once.
async fn run_pipeline(
    config: &Config,
    text: &str,
    use_openai: bool,
) -> Result<(Vec<TopicAssignment>, Vec<TopicInfo>)> {
    let resources = resources::ensure_ready(&config.data_dir);
    let embedder = thematic::topics::build_embedder(config)?;
    let pipeline_config = PipelineConfig::from_config(config).with_hosted_representation(use_openai);

    let mut pipeline = Pipeline::new(pipeline_config, resources, embedder);
    let assignments = pipeline.process_text(text).await?;
    let topics = pipeline.topic_info()?;
    Ok((assignments, topics))
}
