use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with the backend health, probing the persistence port.
///
/// Persistence is best-effort, so a failing store only degrades the
/// report; gameplay keeps working in-memory either way.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if !state.is_persistent() {
        return HealthResponse::degraded();
    }

    match state.repository().health_check().await {
        Ok(()) => HealthResponse::ok(),
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            HealthResponse::degraded()
        }
    }
}
