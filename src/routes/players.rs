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
        roster::{ImportPlayersRequest, PlayerRequest, PlayerSummary, PlayerTeamsRequest},
    },
    error::AppError,
    routes::auth::require_caller,
    services::roster_service,
    state::{SharedState, identity::Caller},
};

/// Player routes. Reads are public, edits need an admin caller.
pub fn router(state: SharedState) -> Router<SharedState> {
    let public = Router::new()
        .route("/players", get(list_players))
        .route("/players/{id}", get(get_player))
        .route("/players/{id}/games", get(player_games));

    let protected = Router::new()
        .route("/players", post(create_player))
        .route("/players/import", post(import_players))
        .route("/players/{id}", put(update_player).delete(delete_player))
        .route("/players/{id}/teams", put(update_player_teams))
        .route(
            "/players/{id}/teams/{team_id}",
            post(add_player_to_team).delete(remove_player_from_team),
        )
        .route_layer(middleware::from_fn_with_state(state, require_caller));

    public.merge(protected)
}

/// List every player with their points and vote counters.
#[utoipa::path(
    get,
    path = "/players",
    tag = "players",
    responses((status = 200, description = "Players in creation order", body = [PlayerSummary]))
)]
pub async fn list_players(State(state): State<SharedState>) -> Json<Vec<PlayerSummary>> {
    Json(roster_service::list_players(&state).await)
}

/// Fetch a player.
#[utoipa::path(
    get,
    path = "/players/{id}",
    tag = "players",
    params(("id" = String, Path, description = "Player identifier")),
    responses(
        (status = 200, description = "Player found", body = PlayerSummary),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn get_player(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerSummary>, AppError> {
    Ok(Json(roster_service::get_player(&state, &id).await?))
}

/// Games a player took part in.
#[utoipa::path(
    get,
    path = "/players/{id}/games",
    tag = "players",
    params(("id" = String, Path, description = "Player identifier")),
    responses((status = 200, description = "Games played", body = [GameSummary]))
)]
pub async fn player_games(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<GameSummary>>, AppError> {
    Ok(Json(roster_service::player_games(&state, &id).await?))
}

/// Create a player.
#[utoipa::path(
    post,
    path = "/players",
    tag = "players",
    params(("X-User-Id" = String, Header, description = "Account id returned by /auth/login")),
    request_body = PlayerRequest,
    responses((status = 200, description = "Player created", body = PlayerSummary))
)]
pub async fn create_player(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Valid(Json(payload)): Valid<Json<PlayerRequest>>,
) -> Result<Json<PlayerSummary>, AppError> {
    Ok(Json(
        roster_service::create_player(&state, &caller, payload).await?,
    ))
}

/// Import a batch of players.
#[utoipa::path(
    post,
    path = "/players/import",
    tag = "players",
    params(("X-User-Id" = String, Header, description = "Account id returned by /auth/login")),
    request_body = ImportPlayersRequest,
    responses((status = 200, description = "Players imported", body = [PlayerSummary]))
)]
pub async fn import_players(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Valid(Json(payload)): Valid<Json<ImportPlayersRequest>>,
) -> Result<Json<Vec<PlayerSummary>>, AppError> {
    Ok(Json(
        roster_service::import_players(&state, &caller, payload).await?,
    ))
}

/// Replace a player's profile.
#[utoipa::path(
    put,
    path = "/players/{id}",
    tag = "players",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Player identifier")
    ),
    request_body = PlayerRequest,
    responses((status = 200, description = "Player updated", body = PlayerSummary))
)]
pub async fn update_player(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<PlayerRequest>>,
) -> Result<Json<PlayerSummary>, AppError> {
    Ok(Json(
        roster_service::update_player(&state, &caller, &id, payload).await?,
    ))
}

/// Delete a player together with their participations, scores and nominations.
#[utoipa::path(
    delete,
    path = "/players/{id}",
    tag = "players",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Player identifier")
    ),
    responses((status = 204, description = "Player deleted"))
)]
pub async fn delete_player(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    roster_service::delete_player(&state, &caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace every team membership of a player.
#[utoipa::path(
    put,
    path = "/players/{id}/teams",
    tag = "players",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Player identifier")
    ),
    request_body = PlayerTeamsRequest,
    responses((status = 200, description = "Memberships replaced", body = PlayerSummary))
)]
pub async fn update_player_teams(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<PlayerTeamsRequest>>,
) -> Result<Json<PlayerSummary>, AppError> {
    Ok(Json(
        roster_service::update_player_teams(&state, &caller, &id, payload).await?,
    ))
}

/// Add a player to a team.
#[utoipa::path(
    post,
    path = "/players/{id}/teams/{team_id}",
    tag = "players",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Player identifier"),
        ("team_id" = String, Path, description = "Team identifier")
    ),
    responses((status = 200, description = "Membership added", body = PlayerSummary))
)]
pub async fn add_player_to_team(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path((id, team_id)): Path<(String, String)>,
) -> Result<Json<PlayerSummary>, AppError> {
    Ok(Json(
        roster_service::add_player_to_team(&state, &caller, &id, &team_id).await?,
    ))
}

/// Remove a player from a team.
#[utoipa::path(
    delete,
    path = "/players/{id}/teams/{team_id}",
    tag = "players",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Player identifier"),
        ("team_id" = String, Path, description = "Team identifier")
    ),
    responses((status = 200, description = "Membership removed", body = PlayerSummary))
)]
pub async fn remove_player_from_team(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path((id, team_id)): Path<(String, String)>,
) -> Result<Json<PlayerSummary>, AppError> {
    Ok(Json(
        roster_service::remove_player_from_team(&state, &caller, &id, &team_id).await?,
    ))
}
