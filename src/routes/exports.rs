use axum::{Extension, Json, Router, extract::State, middleware, routing::get};

use crate::{
    dto::export::{ScoreExportRow, VoteExportRow},
    error::AppError,
    routes::auth::require_caller,
    services::export_service,
    state::{SharedState, identity::Caller},
};

/// Flat exports for spreadsheet reporting; admin only.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/exports/scores", get(export_scores))
        .route("/exports/votes", get(export_votes))
        .route_layer(middleware::from_fn_with_state(state, require_caller))
}

/// Every recorded score with the player's name.
#[utoipa::path(
    get,
    path = "/exports/scores",
    tag = "exports",
    params(("X-User-Id" = String, Header, description = "Account id returned by /auth/login")),
    responses((status = 200, description = "Score rows", body = [ScoreExportRow]))
)]
pub async fn export_scores(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<ScoreExportRow>>, AppError> {
    Ok(Json(export_service::export_scores(&state, &caller).await?))
}

/// Every ballot with voter and nominee names.
#[utoipa::path(
    get,
    path = "/exports/votes",
    tag = "exports",
    params(("X-User-Id" = String, Header, description = "Account id returned by /auth/login")),
    responses((status = 200, description = "Ballot rows", body = [VoteExportRow]))
)]
pub async fn export_votes(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<VoteExportRow>>, AppError> {
    Ok(Json(export_service::export_votes(&state, &caller).await?))
}
