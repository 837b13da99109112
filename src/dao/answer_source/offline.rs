use std::{collections::HashMap, path::Path};

use tracing::{info, warn};

/// Index shape of the offline dataset file: category -> letter -> terms.
type OfflineIndex = HashMap<String, HashMap<String, Vec<String>>>;

/// Pre-indexed offline answer dataset.
///
/// The deterministic fallback behind the PetScan provider and the sole
/// source for `offline` categories. A missing file, category, or letter
/// yields an empty candidate list, never an error.
#[derive(Debug, Clone, Default)]
pub struct OfflineAnswers {
    index: OfflineIndex,
}

impl OfflineAnswers {
    /// Build a dataset from an in-memory index.
    pub fn new(index: OfflineIndex) -> Self {
        Self { index }
    }

    /// Load the dataset from disk, degrading to an empty dataset with a
    /// log entry when the file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<OfflineIndex>(&contents) {
                Ok(index) => {
                    info!(
                        path = %path.display(),
                        categories = index.len(),
                        "loaded offline answer dataset"
                    );
                    Self { index }
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse offline answers; offline lookups will be empty"
                    );
                    Self::default()
                }
            },
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read offline answers; offline lookups will be empty"
                );
                Self::default()
            }
        }
    }

    /// Valid terms for a category and letter. The letter key is stored
    /// lowercase in the dataset.
    pub fn lookup(&self, category: &str, letter: char) -> Vec<String> {
        let Some(letters) = self.index.get(category) else {
            warn!(category, "no offline data for category");
            return Vec::new();
        };

        let key: String = letter.to_lowercase().collect();
        letters.get(&key).cloned().unwrap_or_default()
    }
}
