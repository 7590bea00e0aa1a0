// Sample corpus — the first documents of the Reuters-21578 news collection.
//
// File ids follow the NLTK convention ("test/14826", "training/1") and are
// ordered as plain strings, so all test documents come before training ones.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use super::download::{reuters_dir, reuters_present};

/// How many documents make up the sample text.
pub const SAMPLE_DOCUMENTS: usize = 50;

/// List the corpus file ids, sorted.
pub fn file_ids(data_dir: &Path) -> Result<Vec<String>> {
    let root = reuters_dir(data_dir);
    let mut ids = Vec::new();

    for split in ["test", "training"] {
        let dir = root.join(split);
        let entries = std::fs::read_dir(&dir)
            .with_context(|| format!("Failed to list {}", dir.display()))?;
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                ids.push(format!("{}/{}", split, entry.file_name().to_string_lossy()));
            }
        }
    }

    ids.sort();
    Ok(ids)
}

/// Read the first `count` documents and join them with single spaces.
pub fn load_sample(data_dir: &Path, count: usize) -> Result<String> {
    if !reuters_present(data_dir) {
        anyhow::bail!(
            "Reuters corpus not found in {}\n\
             Run `thematic download-resources` to download it.",
            reuters_dir(data_dir).display()
        );
    }

    let root = reuters_dir(data_dir);
    let mut documents = Vec::with_capacity(count);
    for id in file_ids(data_dir)?.into_iter().take(count) {
        let path = root.join(&id);
        let bytes =
            std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        documents.push(String::from_utf8_lossy(&bytes).into_owned());
    }

    debug!(documents = documents.len(), "Loaded sample corpus");
    Ok(documents.join(" "))
}
