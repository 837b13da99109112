//! DTOs for the answer-check and category endpoints. Field names keep the
//! original dataset/wire shape (camelCase query keys).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    services::verification::VerificationResult,
    state::game::{Category, SearchProvider},
};

/// Payload of an answer-check request.
///
/// Fields are optional on the wire so that missing input maps to a 400
/// with an explicit message instead of a deserialization rejection; empty
/// strings count as missing, like the original endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckAnswerRequest {
    /// Query key identifying the category.
    #[serde(rename = "searchWord")]
    pub search_word: Option<String>,
    /// Single letter the answer must start with.
    pub letter: Option<String>,
    /// The submitted term to verify.
    pub term: Option<String>,
}

/// Result of an answer-check call.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckAnswerResponse {
    /// Whether the submitted term is a valid answer.
    pub found: bool,
    /// Up to 4 alternative valid answers.
    pub other: Vec<String>,
}

impl From<VerificationResult> for CheckAnswerResponse {
    fn from(result: VerificationResult) -> Self {
        Self {
            found: result.found,
            other: result.other,
        }
    }
}

/// Public projection of a category record.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// Stable identifier inside the dataset.
    pub id: u32,
    /// Human readable category name.
    pub name: String,
    /// Query key passed to `/check-answer`.
    pub search_word: String,
    /// Short machine key.
    pub key: String,
    /// Backing data source for the category.
    pub search_provider: SearchProvider,
    /// Extra valid terms, when the dataset declares any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<Vec<String>>,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            search_word: category.search_word.clone(),
            key: category.key.clone(),
            search_provider: category.search_provider,
            additional_data: category.additional_data.clone(),
        }
    }
}

/// A category handed out for a round, together with the drawn letter.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    /// The category record.
    #[serde(flatten)]
    pub category: CategorySummary,
    /// Letter drawn uniformly over a-z.
    pub letter: String,
}

impl From<(&Category, char)> for CategoryResponse {
    fn from((category, letter): (&Category, char)) -> Self {
        Self {
            category: category.into(),
            letter: letter.to_string(),
        }
    }
}
