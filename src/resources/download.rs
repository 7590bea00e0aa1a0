// Resource download helper.
//
// Fetches everything the pipeline can use but doesn't strictly need:
// 1. all-MiniLM-L6-v2: sentence embeddings for clustering (~90MB)
// 2. WordNet: noun lexicon for the lemmatizer (NLTK data package)
// 3. Reuters-21578: the sample news corpus (NLTK data package)
//
// Files live in a platform-appropriate data directory
// (~/.local/share/thematic/ on Linux) so they persist across runs.
// Anything already present is skipped, so re-running is cheap.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// HuggingFace repo for the sentence embedding model.
const EMBEDDING_HF_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main";

const EMBEDDING_MODEL_FILE: &str = "onnx/model.onnx";
const EMBEDDING_TOKENIZER_FILE: &str = "tokenizer.json";

/// NLTK data packages (zip archives with a single top-level directory).
const NLTK_CORPORA_URL: &str =
    "https://raw.githubusercontent.com/nltk/nltk_data/gh-pages/packages/corpora";

/// Returns the default data directory.
/// Uses the platform data directory: ~/.local/share/thematic/ on Linux.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("thematic")
}

/// Directory holding the sentence embedding model.
pub fn embedding_model_dir(base: &Path) -> PathBuf {
    base.join("models").join("all-MiniLM-L6-v2")
}

/// Directory holding the extracted WordNet package.
pub fn wordnet_dir(base: &Path) -> PathBuf {
    base.join("corpora").join("wordnet")
}

/// Directory holding the extracted Reuters package.
pub fn reuters_dir(base: &Path) -> PathBuf {
    base.join("corpora").join("reuters")
}

/// Check whether both embedding model files exist.
pub fn embedding_files_present(base: &Path) -> bool {
    let dir = embedding_model_dir(base);
    dir.join("model.onnx").exists() && dir.join("tokenizer.json").exists()
}

/// Check whether the WordNet noun files the lemmatizer reads exist.
pub fn wordnet_present(base: &Path) -> bool {
    let dir = wordnet_dir(base);
    dir.join("index.noun").exists() && dir.join("noun.exc").exists()
}

/// Check whether the Reuters corpus has been extracted.
pub fn reuters_present(base: &Path) -> bool {
    let dir = reuters_dir(base);
    dir.join("test").is_dir() && dir.join("training").is_dir()
}

/// Download the embedding model, WordNet and the Reuters corpus.
///
/// Shows progress bars for large files. Skips anything that already exists.
pub async fn download_resources(base: &Path) -> Result<()> {
    // --- Sentence embedding model (all-MiniLM-L6-v2) ---
    println!("\nSentence embedding model (all-MiniLM-L6-v2):");

    let embed_dir = embedding_model_dir(base);
    std::fs::create_dir_all(&embed_dir).with_context(|| {
        format!(
            "Failed to create embedding model directory: {}",
            embed_dir.display()
        )
    })?;

    let tokenizer_path = embed_dir.join("tokenizer.json");
    if tokenizer_path.exists() {
        info!("Embedding tokenizer already exists, skipping");
        println!("  tokenizer.json (already exists)");
    } else {
        println!("  Downloading tokenizer.json...");
        let bytes = download_bytes(
            &format!("{}/{}", EMBEDDING_HF_URL, EMBEDDING_TOKENIZER_FILE),
            false,
        )
        .await?;
        write_file(&tokenizer_path, &bytes)?;
    }

    let model_path = embed_dir.join("model.onnx");
    if model_path.exists() {
        info!("Embedding model already exists, skipping");
        println!("  model.onnx (already exists)");
    } else {
        println!("  Downloading model.onnx (~90 MB)...");
        let bytes = download_bytes(
            &format!("{}/{}", EMBEDDING_HF_URL, EMBEDDING_MODEL_FILE),
            true,
        )
        .await?;
        write_file(&model_path, &bytes)?;
    }

    // --- NLTK data packages ---
    let corpora_dir = base.join("corpora");

    println!("\nWordNet (lemmatizer lexicon):");
    if wordnet_present(base) {
        info!("WordNet already exists, skipping");
        println!("  wordnet (already exists)");
    } else {
        println!("  Downloading wordnet.zip (~10 MB)...");
        download_package("wordnet", &corpora_dir).await?;
    }

    println!("\nReuters-21578 (sample corpus):");
    if reuters_present(base) {
        info!("Reuters corpus already exists, skipping");
        println!("  reuters (already exists)");
    } else {
        println!("  Downloading reuters.zip (~6 MB)...");
        download_package("reuters", &corpora_dir).await?;
    }

    Ok(())
}

/// Download an NLTK data package and unpack it under `dest`.
async fn download_package(name: &str, dest: &Path) -> Result<()> {
    let url = format!("{}/{}.zip", NLTK_CORPORA_URL, name);
    let bytes = download_bytes(&url, true).await?;

    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create directory: {}", dest.display()))?;

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .with_context(|| format!("{} is not a valid zip archive", url))?;
    archive
        .extract(dest)
        .with_context(|| format!("Failed to extract {} into {}", name, dest.display()))?;

    info!(package = name, dest = %dest.display(), "Extracted data package");
    Ok(())
}

/// Download a URL into memory.
/// If `show_progress` is true, display a progress bar while streaming.
async fn download_bytes(url: &str, show_progress: bool) -> Result<Vec<u8>> {
    let client = reqwest::Client::new();
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let total_size = response.content_length();

    let pb = if show_progress {
        let pb = match total_size {
            Some(size) => {
                let pb = ProgressBar::new(size);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                        .expect("valid template")
                        .progress_chars("=> "),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("    {spinner} {bytes}")
                        .expect("valid template"),
                );
                pb
            }
        };
        Some(pb)
    } else {
        None
    };

    let mut bytes = Vec::with_capacity(total_size.unwrap_or(0) as usize);
    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        bytes.extend_from_slice(&chunk);
        if let Some(ref pb) = pb {
            pb.set_position(bytes.len() as u64);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!(url = url, bytes = bytes.len(), "Downloaded");
    Ok(bytes)
}

fn write_file(dest: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(dest, bytes).with_context(|| format!("Failed to write {}", dest.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_dir_is_under_thematic() {
        let dir = default_data_dir();
        assert!(
            dir.to_string_lossy().contains("thematic"),
            "Expected path containing thematic, got: {}",
            dir.display()
        );
    }

    #[test]
    fn test_resource_dirs_are_subdirectories() {
        let base = PathBuf::from("/tmp/thematic-test");
        assert_eq!(
            embedding_model_dir(&base),
            base.join("models").join("all-MiniLM-L6-v2")
        );
        assert_eq!(wordnet_dir(&base), base.join("corpora").join("wordnet"));
        assert_eq!(reuters_dir(&base), base.join("corpora").join("reuters"));
    }

    #[test]
    fn test_nothing_present_in_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!embedding_files_present(dir.path()));
        assert!(!wordnet_present(dir.path()));
        assert!(!reuters_present(dir.path()));
    }

    #[test]
    fn test_presence_checks_see_files() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();

        let embed = embedding_model_dir(base);
        std::fs::create_dir_all(&embed).unwrap();
        std::fs::write(embed.join("model.onnx"), b"fake").unwrap();
        std::fs::write(embed.join("tokenizer.json"), b"fake").unwrap();

        let wn = wordnet_dir(base);
        std::fs::create_dir_all(&wn).unwrap();
        std::fs::write(wn.join("index.noun"), b"dog n 1").unwrap();
        std::fs::write(wn.join("noun.exc"), b"").unwrap();

        let reuters = reuters_dir(base);
        std::fs::create_dir_all(reuters.join("test")).unwrap();
        std::fs::create_dir_all(reuters.join("training")).unwrap();

        assert!(embedding_files_present(base));
        assert!(wordnet_present(base));
        assert!(reuters_present(base));
    }
}
