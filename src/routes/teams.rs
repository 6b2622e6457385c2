use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::{
        game::GameSummary,
        roster::{PlayerSummary, TeamRequest, TeamSummary},
    },
    error::AppError,
    routes::auth::require_caller,
    services::roster_service,
    state::{SharedState, identity::Caller},
};

/// Team routes. Reads are public, edits need an admin caller.
pub fn router(state: SharedState) -> Router<SharedState> {
    let public = Router::new()
        .route("/teams", get(list_teams))
        .route("/teams/{id}", get(get_team))
        .route("/teams/{id}/players", get(team_players))
        .route("/teams/{id}/games", get(team_games));

    let protected = Router::new()
        .route("/teams", post(create_team))
        .route("/teams/{id}", put(update_team).delete(delete_team))
        .route_layer(middleware::from_fn_with_state(state, require_caller));

    public.merge(protected)
}

/// List every team.
#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    responses((status = 200, description = "Teams in creation order", body = [TeamSummary]))
)]
pub async fn list_teams(State(state): State<SharedState>) -> Json<Vec<TeamSummary>> {
    Json(roster_service::list_teams(&state).await)
}

/// Fetch a team.
#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = String, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Team found", body = TeamSummary),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn get_team(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<TeamSummary>, AppError> {
    Ok(Json(roster_service::get_team(&state, &id).await?))
}

/// Members of a team.
#[utoipa::path(
    get,
    path = "/teams/{id}/players",
    tag = "teams",
    params(("id" = String, Path, description = "Team identifier")),
    responses((status = 200, description = "Team members", body = [PlayerSummary]))
)]
pub async fn team_players(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PlayerSummary>>, AppError> {
    Ok(Json(roster_service::team_players(&state, &id).await?))
}

/// Games scheduled for a team.
#[utoipa::path(
    get,
    path = "/teams/{id}/games",
    tag = "teams",
    params(("id" = String, Path, description = "Team identifier")),
    responses((status = 200, description = "Team schedule", body = [GameSummary]))
)]
pub async fn team_games(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<GameSummary>>, AppError> {
    Ok(Json(roster_service::team_games(&state, &id).await?))
}

/// Create a team.
#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    params(("X-User-Id" = String, Header, description = "Account id returned by /auth/login")),
    request_body = TeamRequest,
    responses((status = 200, description = "Team created", body = TeamSummary))
)]
pub async fn create_team(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Valid(Json(payload)): Valid<Json<TeamRequest>>,
) -> Result<Json<TeamSummary>, AppError> {
    Ok(Json(
        roster_service::create_team(&state, &caller, payload).await?,
    ))
}

/// Replace a team's profile.
#[utoipa::path(
    put,
    path = "/teams/{id}",
    tag = "teams",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Team identifier")
    ),
    request_body = TeamRequest,
    responses((status = 200, description = "Team updated", body = TeamSummary))
)]
pub async fn update_team(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<TeamRequest>>,
) -> Result<Json<TeamSummary>, AppError> {
    Ok(Json(
        roster_service::update_team(&state, &caller, &id, payload).await?,
    ))
}

/// Delete a team that no game refers to.
#[utoipa::path(
    delete,
    path = "/teams/{id}",
    tag = "teams",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Team identifier")
    ),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 409, description = "Games still reference the team")
    )
)]
pub async fn delete_team(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    roster_service::delete_team(&state, &caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
