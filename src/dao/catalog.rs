//! Category reference dataset, loaded once at startup.

use std::path::Path;

use rand::seq::IndexedRandom;
use thiserror::Error;

use crate::state::game::Category;

/// Letters a round challenge can be drawn from.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Failures while loading the category dataset. Unlike the best-effort
/// stores, missing reference data is fatal: the game cannot run without
/// categories.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The dataset file could not be read.
    #[error("failed to read category dataset at `{path}`")]
    Read {
        /// Path the dataset was expected at.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The dataset file is not a valid category array.
    #[error("failed to parse category dataset at `{path}`")]
    Parse {
        /// Path the dataset was read from.
        path: String,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// The dataset contains no categories.
    #[error("category dataset at `{path}` is empty")]
    Empty {
        /// Path the dataset was read from.
        path: String,
    },
}

/// In-memory category dataset with lookup and random selection.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// Load the dataset from a JSON array file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: display.clone(),
            source,
        })?;
        let categories: Vec<Category> =
            serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
                path: display.clone(),
                source,
            })?;

        Self::from_categories(categories).ok_or(CatalogError::Empty { path: display })
    }

    /// Build a catalog from an already-parsed category list. Returns `None`
    /// when the list is empty.
    pub fn from_categories(categories: Vec<Category>) -> Option<Self> {
        if categories.is_empty() {
            return None;
        }
        Some(Self { categories })
    }

    /// All categories in dataset order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Number of categories in the dataset.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the dataset is empty (never true for a loaded catalog).
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Look a category up by its dataset identifier.
    pub fn find_by_id(&self, id: u32) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Look a category up by the query key used on the answer-check wire.
    pub fn find_by_search_word(&self, search_word: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.search_word == search_word)
    }

    /// Pick a category uniformly at random.
    pub fn random(&self) -> &Category {
        let mut rng = rand::rng();
        self.categories
            .choose(&mut rng)
            .expect("catalog is never constructed empty")
    }
}

/// Pick a letter uniformly over a-z, lowercase.
pub fn random_letter() -> char {
    let mut rng = rand::rng();
    let byte = ALPHABET
        .choose(&mut rng)
        .expect("alphabet is non-empty");
    char::from(*byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::SearchProvider;

    fn category(id: u32, search_word: &str) -> Category {
        Category {
            id,
            name: search_word.into(),
            search_word: search_word.into(),
            key: search_word.to_lowercase(),
            search_provider: SearchProvider::Offline,
            additional_data: None,
            letter: None,
        }
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert!(CategoryCatalog::from_categories(Vec::new()).is_none());
    }

    #[test]
    fn lookups_by_id_and_search_word() {
        let catalog =
            CategoryCatalog::from_categories(vec![category(1, "Tiere"), category(2, "Städte")])
                .unwrap();

        assert_eq!(catalog.find_by_id(2).unwrap().search_word, "Städte");
        assert_eq!(catalog.find_by_search_word("Tiere").unwrap().id, 1);
        assert!(catalog.find_by_search_word("Berge").is_none());
    }

    #[test]
    fn random_letter_is_lowercase_ascii() {
        for _ in 0..64 {
            let letter = random_letter();
            assert!(letter.is_ascii_lowercase());
        }
    }

    #[test]
    fn random_pick_comes_from_the_dataset() {
        let catalog =
            CategoryCatalog::from_categories(vec![category(1, "Tiere"), category(2, "Städte")])
                .unwrap();
        for _ in 0..16 {
            let picked = catalog.random();
            assert!(catalog.find_by_id(picked.id).is_some());
        }
    }
}
