//! Answer verification: decide whether a submitted term is a valid member
//! of the target category for the active letter.

use crate::{
    dao::{answer_source::{offline::OfflineAnswers, petscan::PetScanClient}, catalog::random_letter},
    dto::answers::{CategoryResponse, CategorySummary, CheckAnswerRequest, CheckAnswerResponse},
    error::ServiceError,
    state::{
        SharedState,
        game::{Category, SearchProvider},
    },
};

/// Cap on the alternative answers surfaced next to a verification result.
pub const MAX_SUGGESTIONS: usize = 4;

/// Outcome of a single verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether the submitted term is a valid answer.
    pub found: bool,
    /// Up to [`MAX_SUGGESTIONS`] alternative valid answers, in source order.
    pub other: Vec<String>,
}

/// Verify `term` against the category's word list for `letter`.
///
/// Candidate resolution is dispatched on the category's provider; the
/// PetScan path answers from the offline dataset when `offline_mode` is
/// set. Source failures surface as an empty candidate list (the sources
/// swallow them), so verification itself only fails for an unsupported
/// provider.
pub async fn verify(
    petscan: &PetScanClient,
    offline: &OfflineAnswers,
    offline_mode: bool,
    category: &Category,
    letter: char,
    term: &str,
) -> Result<VerificationResult, ServiceError> {
    let candidates = match category.search_provider {
        SearchProvider::Petscan => {
            if offline_mode {
                offline.lookup(&category.search_word, letter)
            } else {
                petscan.search(&category.search_word).await
            }
        }
        SearchProvider::Offline => offline.lookup(&category.search_word, letter),
        SearchProvider::Wikipedia => {
            return Err(ServiceError::Unsupported(
                "wikipedia search provider is not implemented".into(),
            ));
        }
    };

    Ok(generate_result(candidates, letter, term, category))
}

/// Answer-check endpoint operation: resolve the category by its query key
/// and verify the submitted term.
///
/// Any missing or empty field is rejected up front; an unknown search word
/// is a not-found failure, mirroring the original endpoint contract.
pub async fn check_answer(
    state: &SharedState,
    request: CheckAnswerRequest,
) -> Result<CheckAnswerResponse, ServiceError> {
    let (Some(search_word), Some(letter), Some(term)) = (
        request.search_word.filter(|s| !s.is_empty()),
        request.letter.filter(|s| !s.is_empty()),
        request.term.filter(|s| !s.is_empty()),
    ) else {
        return Err(ServiceError::InvalidInput(
            "Missing required fields: searchWord, letter, term".into(),
        ));
    };

    let letter = parse_single_letter(&letter)?;
    let category = state
        .catalog()
        .find_by_search_word(&search_word)
        .ok_or_else(|| ServiceError::NotFound(format!("category `{search_word}` not found")))?;

    let result = verify(
        state.petscan(),
        state.offline_answers(),
        state.config().offline_mode,
        category,
        letter,
        &term,
    )
    .await?;

    Ok(result.into())
}

/// Category endpoint operation: a uniformly random category paired with a
/// uniformly random letter.
pub async fn random_category(state: &SharedState) -> CategoryResponse {
    (state.catalog().random(), random_letter()).into()
}

/// All categories in dataset order.
pub async fn list_categories(state: &SharedState) -> Vec<CategorySummary> {
    state.catalog().categories().iter().map(Into::into).collect()
}

/// Parse a wire letter field into a single lowercase alphabetic character.
pub(crate) fn parse_single_letter(raw: &str) -> Result<char, ServiceError> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_alphabetic() => {
            Ok(letter.to_lowercase().next().unwrap_or(letter))
        }
        _ => Err(ServiceError::InvalidInput(
            "letter must be a single alphabetic character".into(),
        )),
    }
}

/// Merge category extras into the candidate list, keep candidates starting
/// with the target letter (case-insensitive), and derive the result.
///
/// `found` is an exact match of the raw term against the filtered list;
/// the fuzzy-similarity helper is deliberately not applied here.
pub fn generate_result(
    candidates: Vec<String>,
    letter: char,
    term: &str,
    category: &Category,
) -> VerificationResult {
    let mut items = candidates;
    if let Some(extra) = &category.additional_data {
        items.extend(extra.iter().cloned());
    }

    let prefix: String = letter.to_uppercase().collect();
    let filtered: Vec<String> = items
        .into_iter()
        .filter(|candidate| candidate.to_uppercase().starts_with(&prefix))
        .collect();

    let found = filtered.iter().any(|candidate| candidate == term);
    let other = filtered
        .iter()
        .filter(|candidate| candidate.as_str() != term)
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect();

    VerificationResult { found, other }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use super::*;
    use crate::config::PetScanConfig;

    fn category(provider: SearchProvider) -> Category {
        Category {
            id: 1,
            name: "Tier".into(),
            search_word: "Tiere".into(),
            key: "animals".into(),
            search_provider: provider,
            additional_data: None,
            letter: None,
        }
    }

    fn offline_dataset() -> OfflineAnswers {
        let mut letters = HashMap::new();
        letters.insert("k".to_string(), vec!["Katze".to_string(), "Kuh".to_string()]);
        let mut index = HashMap::new();
        index.insert("Tiere".to_string(), letters);
        OfflineAnswers::new(index)
    }

    fn unreachable_petscan() -> PetScanClient {
        // Nothing listens on this port; connection failures must degrade
        // to an empty result, never an error.
        PetScanClient::new(&PetScanConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(1),
            ..PetScanConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn offline_verification_finds_exact_term() {
        let result = verify(
            &unreachable_petscan(),
            &offline_dataset(),
            false,
            &category(SearchProvider::Offline),
            'k',
            "Katze",
        )
        .await
        .unwrap();

        assert_eq!(
            result,
            VerificationResult {
                found: true,
                other: vec!["Kuh".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn offline_verification_misses_unknown_term() {
        let result = verify(
            &unreachable_petscan(),
            &offline_dataset(),
            false,
            &category(SearchProvider::Offline),
            'k',
            "Hund",
        )
        .await
        .unwrap();

        assert_eq!(
            result,
            VerificationResult {
                found: false,
                other: vec!["Katze".to_string(), "Kuh".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn petscan_failure_degrades_to_not_found() {
        let result = verify(
            &unreachable_petscan(),
            &offline_dataset(),
            false,
            &category(SearchProvider::Petscan),
            'k',
            "Katze",
        )
        .await
        .unwrap();

        assert_eq!(
            result,
            VerificationResult {
                found: false,
                other: Vec::new(),
            }
        );
    }

    #[tokio::test]
    async fn offline_mode_redirects_petscan_to_the_dataset() {
        let result = verify(
            &unreachable_petscan(),
            &offline_dataset(),
            true,
            &category(SearchProvider::Petscan),
            'k',
            "Katze",
        )
        .await
        .unwrap();

        assert!(result.found);
        assert_eq!(result.other, vec!["Kuh".to_string()]);
    }

    #[tokio::test]
    async fn wikipedia_provider_fails_fast() {
        let err = verify(
            &unreachable_petscan(),
            &offline_dataset(),
            false,
            &category(SearchProvider::Wikipedia),
            'k',
            "Katze",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::Unsupported(_)));
    }

    #[test]
    fn parse_single_letter_accepts_one_alphabetic_char() {
        assert_eq!(parse_single_letter("K").unwrap(), 'k');
        assert_eq!(parse_single_letter(" ü ").unwrap(), 'ü');
        assert!(parse_single_letter("").is_err());
        assert!(parse_single_letter("ab").is_err());
        assert!(parse_single_letter("7").is_err());
    }

    #[test]
    fn letter_prefix_filter_is_case_insensitive() {
        let result = generate_result(
            vec!["apple".into(), "Banana".into()],
            'a',
            "apple",
            &category(SearchProvider::Offline),
        );

        assert!(result.found);
        assert!(result.other.is_empty());

        let result = generate_result(
            vec!["apple".into(), "Banana".into()],
            'A',
            "apple",
            &category(SearchProvider::Offline),
        );
        assert!(result.found);
    }

    #[test]
    fn additional_data_terms_are_merged_before_filtering() {
        let mut category = category(SearchProvider::Offline);
        category.additional_data = Some(vec!["Kakadu".into(), "Adler".into()]);

        let result = generate_result(vec!["Katze".into()], 'k', "Kakadu", &category);
        assert!(result.found);
        assert_eq!(result.other, vec!["Katze".to_string()]);
    }

    #[test]
    fn found_is_exact_and_case_sensitive() {
        let result = generate_result(
            vec!["Katze".into()],
            'k',
            "katze",
            &category(SearchProvider::Offline),
        );
        assert!(!result.found);
        assert_eq!(result.other, vec!["Katze".to_string()]);
    }

    #[test]
    fn other_is_capped_at_four_in_list_order() {
        let candidates = vec![
            "Katze".to_string(),
            "Kuh".to_string(),
            "Kamel".to_string(),
            "Krokodil".to_string(),
            "Kolibri".to_string(),
            "Kranich".to_string(),
        ];
        let result = generate_result(
            candidates,
            'k',
            "Katze",
            &category(SearchProvider::Offline),
        );

        assert_eq!(result.other, vec!["Kuh", "Kamel", "Krokodil", "Kolibri"]);
    }
}
