/// Answer candidate sources backing the verification service.
pub mod answer_source;
/// Category reference dataset.
pub mod catalog;
/// Persisted model definitions.
pub mod models;
/// Typed repository over the key-value port.
pub mod session;
/// Key-value store implementations.
pub mod session_store;
/// Storage abstraction layer.
pub mod storage;
