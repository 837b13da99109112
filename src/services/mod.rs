/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Scoring, ranking, and fuzzy answer-similarity helpers.
pub mod scoring;
/// Core session lifecycle and roster management.
pub mod session_service;
/// Aggregate statistics folding.
pub mod statistics;
/// Answer verification against category word lists.
pub mod verification;
