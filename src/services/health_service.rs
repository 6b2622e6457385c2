use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the storage backend answers.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let store = state.store();
    match store.health_check().await {
        Ok(()) => HealthResponse::ok(store.backend()),
        Err(err) => {
            warn!(backend = store.backend(), error = %err, "storage health check failed");
            HealthResponse::degraded(store.backend())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::seeded_state;

    #[tokio::test]
    async fn failing_store_degrades_health() {
        let (state, store) = seeded_state().await;
        assert_eq!(health_status(&state).await.status, "ok");

        store.fail(true);
        let health = health_status(&state).await;
        assert_eq!(health.status, "degraded");
        assert_eq!(health.backend, "flaky");
    }
}
