use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::standings::{LeaderboardEntry, LeaderboardQuery},
    services::standings_service,
    state::SharedState,
};

/// Ranked player leaderboard.
#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "standings",
    params(("metric" = Option<String>, Query, description = "`points` (default), `fielder` or `batter`")),
    responses(
        (status = 200, description = "Players ranked by the metric", body = [LeaderboardEntry]),
        (status = 400, description = "Unknown metric")
    )
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<Vec<LeaderboardEntry>> {
    Json(standings_service::leaderboard(&state, query.metric).await)
}

/// Configure the standings routes.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/leaderboard", get(leaderboard))
}
