use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Storage backend in use.
    pub backend: String,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(backend: &str) -> Self {
        Self {
            status: "ok".to_string(),
            backend: backend.to_string(),
        }
    }

    /// Create a health response indicating the storage backend is failing.
    pub fn degraded(backend: &str) -> Self {
        Self {
            status: "degraded".to_string(),
            backend: backend.to_string(),
        }
    }
}
