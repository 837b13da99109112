//! Client for the PetScan Wikipedia category-search API.

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::PetScanConfig;

/// Failures that can occur while querying PetScan. These never cross the
/// service boundary: the public [`PetScanClient::search`] degrades every
/// failure to an empty candidate list.
#[derive(Debug, Error)]
pub enum PetScanError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build PetScan client")]
    ClientBuilder {
        /// Builder failure.
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or timed out.
    #[error("failed to send PetScan request for `{category}`")]
    RequestSend {
        /// Category the request was for.
        category: String,
        /// Transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// PetScan returned an unexpected status code.
    #[error("unexpected PetScan response status {status} for `{category}`")]
    RequestStatus {
        /// Category the request was for.
        category: String,
        /// Returned status code.
        status: StatusCode,
    },
    /// The response payload could not be parsed.
    #[error("failed to decode PetScan response for `{category}`")]
    DecodeResponse {
        /// Category the request was for.
        category: String,
        /// Decode failure.
        #[source]
        source: reqwest::Error,
    },
}

/// HTTP client for PetScan category-membership queries.
#[derive(Clone)]
pub struct PetScanClient {
    client: Client,
    base_url: Arc<str>,
    language: String,
    project: String,
    max_results: u32,
}

impl PetScanClient {
    /// Build a client with the configured endpoint and a bounded request
    /// timeout so verification can never hang the caller.
    pub fn new(config: &PetScanConfig) -> Result<Self, PetScanError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| PetScanError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            language: config.language.clone(),
            project: config.project.clone(),
            max_results: config.max_results,
        })
    }

    /// All member titles of the given category, normalized for display.
    ///
    /// Network, status, and decode failures are logged and collapse to an
    /// empty list: for verification an unreachable PetScan only ever means
    /// "no match found".
    pub async fn search(&self, category: &str) -> Vec<String> {
        debug!(category, "requesting PetScan category members");
        match self.request_members(category).await {
            Ok(titles) => titles,
            Err(err) => {
                warn!(error = %err, category, "PetScan lookup failed; treating as empty result");
                Vec::new()
            }
        }
    }

    async fn request_members(&self, category: &str) -> Result<Vec<String>, PetScanError> {
        let max_results = self.max_results.to_string();
        let query: [(&str, &str); 14] = [
            ("max_sitelink_count", "9999"),
            ("categories", category),
            ("project", &self.project),
            ("language", &self.language),
            ("cb_labels_yes_l", "1"),
            ("edits[flagged]", "both"),
            ("edits[bots]", "both"),
            ("search_max_results", &max_results),
            ("cb_labels_any_l", "1"),
            ("cb_labels_no_l", "1"),
            ("format", "json"),
            ("interface_language", &self.language),
            ("ns[0]", "1"),
            ("doit", ""),
        ];

        let response = self
            .client
            .get(self.base_url.as_ref())
            .query(&query)
            .send()
            .await
            .map_err(|source| PetScanError::RequestSend {
                category: category.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PetScanError::RequestStatus {
                category: category.to_owned(),
                status,
            });
        }

        let payload: PetScanResponse =
            response
                .json()
                .await
                .map_err(|source| PetScanError::DecodeResponse {
                    category: category.to_owned(),
                    source,
                })?;

        Ok(extract_titles(payload, category))
    }
}

/// Top-level PetScan payload; member pages live under `*[0].a.*`.
#[derive(Debug, Deserialize)]
struct PetScanResponse {
    #[serde(rename = "*", default)]
    batches: Vec<PetScanBatch>,
}

#[derive(Debug, Deserialize)]
struct PetScanBatch {
    a: PetScanPages,
}

#[derive(Debug, Deserialize)]
struct PetScanPages {
    #[serde(rename = "*", default)]
    pages: Vec<PetScanPage>,
}

#[derive(Debug, Deserialize)]
struct PetScanPage {
    title: String,
}

/// Normalize member titles: keep the segment before the first underscore
/// (dropping disambiguation suffixes) and exclude the category itself.
fn extract_titles(response: PetScanResponse, category: &str) -> Vec<String> {
    let pages = response
        .batches
        .into_iter()
        .next()
        .map(|batch| batch.a.pages)
        .unwrap_or_default();

    pages
        .into_iter()
        .filter_map(|page| page.title.split('_').next().map(str::to_owned))
        .filter(|title| title != category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> PetScanResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn titles_are_split_on_underscore_and_category_excluded() {
        let response = parse(
            r#"{"*":[{"a":{"*":[
                {"title":"Katze_(Haustier)"},
                {"title":"Kuh"},
                {"title":"Tiere"}
            ]}}]}"#,
        );

        assert_eq!(extract_titles(response, "Tiere"), vec!["Katze", "Kuh"]);
    }

    #[test]
    fn empty_or_missing_result_path_yields_no_titles() {
        let response = parse(r#"{"*":[]}"#);
        assert!(extract_titles(response, "Tiere").is_empty());

        let response = parse(r#"{"*":[{"a":{"*":[]}}]}"#);
        assert!(extract_titles(response, "Tiere").is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let response = parse(
            r#"{"n":"result","a":{"query":"x"},"*":[{"n":"combination","a":{"type":"subset","*":[{"id":1,"title":"Katze","namespace":0}]}}]}"#,
        );
        assert_eq!(extract_titles(response, "Tiere"), vec!["Katze"]);
    }
}
