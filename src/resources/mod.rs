// Process-wide text resources: the stopword set and the lemmatizer.
//
// Loading happens once per process through `ensure_ready`. The first call
// builds the resources (reading WordNet from the data directory if it has
// been downloaded); every later call returns the same instance.

pub mod corpus;
pub mod download;

use std::path::Path;
use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use crate::text::lemmatizer::Lemmatizer;
use crate::text::stopwords::StopwordSet;
use crate::text::TextNormalizer;

static RESOURCES: OnceLock<Arc<Resources>> = OnceLock::new();

/// Everything the normalizer needs, loaded once.
#[derive(Debug)]
pub struct Resources {
    pub stopwords: StopwordSet,
    pub lemmatizer: Lemmatizer,
}

impl Resources {
    /// Load resources from the data directory. Falls back to the built-in
    /// lemmatizer when WordNet is missing or unreadable.
    pub fn load(data_dir: &Path) -> Self {
        let lemmatizer = if download::wordnet_present(data_dir) {
            match Lemmatizer::from_wordnet_dir(&download::wordnet_dir(data_dir)) {
                Ok(lemmatizer) => {
                    info!("Using WordNet lemmatizer");
                    lemmatizer
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load WordNet, using built-in lemmatizer");
                    Lemmatizer::builtin()
                }
            }
        } else {
            info!("WordNet not downloaded, using built-in lemmatizer");
            Lemmatizer::builtin()
        };

        Self {
            stopwords: StopwordSet::english(),
            lemmatizer,
        }
    }

    /// English stopwords and the built-in lemmatizer, no filesystem access.
    pub fn builtin() -> Self {
        Self {
            stopwords: StopwordSet::english(),
            lemmatizer: Lemmatizer::builtin(),
        }
    }

    pub fn normalizer(&self) -> TextNormalizer<'_> {
        TextNormalizer::new(&self.stopwords, &self.lemmatizer)
    }
}

/// Initialize the process-wide resources. Repeated calls are no-ops that
/// return the instance built by the first call.
pub fn ensure_ready(data_dir: &Path) -> Arc<Resources> {
    RESOURCES
        .get_or_init(|| Arc::new(Resources::load(data_dir)))
        .clone()
}

/// Whether `ensure_ready` has run in this process.
pub fn is_ready() -> bool {
    RESOURCES.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_ready_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let first = ensure_ready(dir.path());
        assert!(is_ready());

        let other = tempfile::tempdir().unwrap();
        let second = ensure_ready(other.path());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_load_falls_back_without_wordnet() {
        let dir = tempfile::tempdir().unwrap();
        let resources = Resources::load(dir.path());
        assert!(!resources.lemmatizer.is_wordnet());
        assert!(!resources.stopwords.is_empty());
    }

    #[test]
    fn test_load_uses_wordnet_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let wn = download::wordnet_dir(dir.path());
        std::fs::create_dir_all(&wn).unwrap();
        std::fs::write(wn.join("index.noun"), "dog n 1 1 @ 1 0 02084071\n").unwrap();
        std::fs::write(wn.join("noun.exc"), "").unwrap();

        let resources = Resources::load(dir.path());
        assert!(resources.lemmatizer.is_wordnet());
        assert_eq!(resources.lemmatizer.lemmatize("dogs"), "dog");
    }
}
