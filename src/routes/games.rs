use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::game::{
        AssignPointsRequest, BallotRequest, CreateGameRequest, GameListQuery, GameSummary,
        ImportGamesRequest, MyVoteResponse, ParticipantsPayload, ScoreSummary, UpdateGameRequest,
        VoteSummary,
    },
    error::AppError,
    routes::auth::require_caller,
    services::{game_service, vote_service},
    state::{SharedState, identity::Caller},
};

/// Schedule, match-day and ballot routes.
pub fn router(state: SharedState) -> Router<SharedState> {
    let public = Router::new()
        .route("/games", get(list_games))
        .route("/games/{id}", get(get_game))
        .route("/games/{id}/participants", get(participants))
        .route("/games/{id}/points", get(scores));

    let protected = Router::new()
        .route("/games", post(create_game))
        .route("/games/import", post(import_games))
        .route("/games/{id}", put(update_game).delete(delete_game))
        .route("/games/{id}/complete", post(complete_game))
        .route("/games/{id}/voting/open", post(open_voting))
        .route("/games/{id}/voting/close", post(close_voting))
        .route("/games/{id}/participants", put(update_participants))
        .route("/games/{id}/points", put(assign_points))
        .route("/games/{id}/votes", get(list_votes).post(submit_vote))
        .route("/games/{id}/votes/mine", get(my_vote))
        .route_layer(middleware::from_fn_with_state(state, require_caller));

    public.merge(protected)
}

/// List games, optionally filtered by team and/or participant.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    params(
        ("team_id" = Option<String>, Query, description = "Only games of this team"),
        ("player_id" = Option<String>, Query, description = "Only games this player took part in")
    ),
    responses((status = 200, description = "Games in schedule order", body = [GameSummary]))
)]
pub async fn list_games(
    State(state): State<SharedState>,
    Query(query): Query<GameListQuery>,
) -> Json<Vec<GameSummary>> {
    Json(game_service::list_games(&state, &query).await)
}

/// Fetch a game.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game found", body = GameSummary),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::get_game(&state, &id).await?))
}

/// Schedule a game.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    params(("X-User-Id" = String, Header, description = "Account id returned by /auth/login")),
    request_body = CreateGameRequest,
    responses(
        (status = 200, description = "Game scheduled", body = GameSummary),
        (status = 403, description = "Caller cannot edit the schedule")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Valid(Json(payload)): Valid<Json<CreateGameRequest>>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(
        game_service::create_game(&state, &caller, payload).await?,
    ))
}

/// Import a batch of games; every imported game starts upcoming.
#[utoipa::path(
    post,
    path = "/games/import",
    tag = "games",
    params(("X-User-Id" = String, Header, description = "Account id returned by /auth/login")),
    request_body = ImportGamesRequest,
    responses((status = 200, description = "Games imported", body = [GameSummary]))
)]
pub async fn import_games(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Valid(Json(payload)): Valid<Json<ImportGamesRequest>>,
) -> Result<Json<Vec<GameSummary>>, AppError> {
    Ok(Json(
        game_service::import_games(&state, &caller, payload).await?,
    ))
}

/// Edit the schedule fields of a game.
#[utoipa::path(
    put,
    path = "/games/{id}",
    tag = "games",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = UpdateGameRequest,
    responses((status = 200, description = "Game updated", body = GameSummary))
)]
pub async fn update_game(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<UpdateGameRequest>>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(
        game_service::update_game(&state, &caller, &id, payload).await?,
    ))
}

/// Delete a game with its scores and ballots.
#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "games",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Game identifier")
    ),
    responses(
        (status = 204, description = "Game deleted"),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    game_service::delete_game(&state, &caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a game as played.
#[utoipa::path(
    post,
    path = "/games/{id}/complete",
    tag = "games",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Game identifier")
    ),
    responses((status = 200, description = "Game completed", body = GameSummary))
)]
pub async fn complete_game(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(
        game_service::complete_game(&state, &caller, &id).await?,
    ))
}

/// Open voting on a completed game.
#[utoipa::path(
    post,
    path = "/games/{id}/voting/open",
    tag = "games",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Game identifier")
    ),
    responses(
        (status = 200, description = "Voting opened", body = GameSummary),
        (status = 409, description = "Game not completed yet")
    )
)]
pub async fn open_voting(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::open_voting(&state, &caller, &id).await?))
}

/// Close voting on a game.
#[utoipa::path(
    post,
    path = "/games/{id}/voting/close",
    tag = "games",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Game identifier")
    ),
    responses((status = 200, description = "Voting closed", body = GameSummary))
)]
pub async fn close_voting(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(
        game_service::close_voting(&state, &caller, &id).await?,
    ))
}

/// Participants of a game.
#[utoipa::path(
    get,
    path = "/games/{id}/participants",
    tag = "games",
    params(("id" = String, Path, description = "Game identifier")),
    responses((status = 200, description = "Participants in selection order", body = ParticipantsPayload))
)]
pub async fn participants(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ParticipantsPayload>, AppError> {
    Ok(Json(game_service::participants(&state, &id).await?))
}

/// Replace the participants of a game.
#[utoipa::path(
    put,
    path = "/games/{id}/participants",
    tag = "games",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = ParticipantsPayload,
    responses((status = 200, description = "Participants replaced", body = GameSummary))
)]
pub async fn update_participants(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<ParticipantsPayload>>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(
        game_service::update_participants(&state, &caller, &id, payload).await?,
    ))
}

/// Placement points of a game.
#[utoipa::path(
    get,
    path = "/games/{id}/points",
    tag = "games",
    params(("id" = String, Path, description = "Game identifier")),
    responses((status = 200, description = "Scores, best placement first", body = [ScoreSummary]))
)]
pub async fn scores(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ScoreSummary>>, AppError> {
    Ok(Json(game_service::scores(&state, &id).await?))
}

/// Replace the placement points of a completed game.
#[utoipa::path(
    put,
    path = "/games/{id}/points",
    tag = "games",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = AssignPointsRequest,
    responses(
        (status = 200, description = "Points assigned", body = [ScoreSummary]),
        (status = 409, description = "Game not completed or placements clash")
    )
)]
pub async fn assign_points(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<AssignPointsRequest>>,
) -> Result<Json<Vec<ScoreSummary>>, AppError> {
    let entries = payload.entries.into_iter().map(Into::into).collect();
    Ok(Json(
        game_service::assign_points(&state, &caller, &id, entries).await?,
    ))
}

/// Every ballot of a game.
#[utoipa::path(
    get,
    path = "/games/{id}/votes",
    tag = "votes",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Game identifier")
    ),
    responses((status = 200, description = "Ballots", body = [VoteSummary]))
)]
pub async fn list_votes(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<Vec<VoteSummary>>, AppError> {
    Ok(Json(vote_service::list_votes(&state, &caller, &id).await?))
}

/// Submit or edit the caller's ballot.
#[utoipa::path(
    post,
    path = "/games/{id}/votes",
    tag = "votes",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = BallotRequest,
    responses(
        (status = 200, description = "Ballot recorded", body = VoteSummary),
        (status = 409, description = "Voting closed or nominee not eligible")
    )
)]
pub async fn submit_vote(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(payload): Json<BallotRequest>,
) -> Result<Json<VoteSummary>, AppError> {
    Ok(Json(
        vote_service::submit_vote(&state, &caller, &id, payload).await?,
    ))
}

/// The caller's own ballot.
#[utoipa::path(
    get,
    path = "/games/{id}/votes/mine",
    tag = "votes",
    params(
        ("X-User-Id" = String, Header, description = "Account id returned by /auth/login"),
        ("id" = String, Path, description = "Game identifier")
    ),
    responses((status = 200, description = "Caller's ballot, if any", body = MyVoteResponse))
)]
pub async fn my_vote(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<MyVoteResponse>, AppError> {
    Ok(Json(vote_service::my_vote(&state, &caller, &id).await?))
}
