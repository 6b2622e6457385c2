use axum::Router;

use crate::state::SharedState;

pub mod auth;
pub mod docs;
pub mod exports;
pub mod games;
pub mod health;
pub mod players;
pub mod sse;
pub mod standings;
pub mod teams;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(standings::router())
        .merge(auth::router(state.clone()))
        .merge(teams::router(state.clone()))
        .merge(players::router(state.clone()))
        .merge(games::router(state.clone()))
        .merge(exports::router(state.clone()));

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::state::tests::seeded_state;

    async fn send(state: SharedState, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: &str, uri: &str, user: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn reads_are_public() {
        let (state, _store) = seeded_state().await;
        let request = Request::get("/games?team_id=4").body(Body::empty()).unwrap();
        let (status, body) = send(state, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn writes_need_a_known_caller() {
        let (state, _store) = seeded_state().await;
        let body = serde_json::json!({ "name": "U9", "color": "#112233" });

        let (status, _) = send(state.clone(), json_request("POST", "/teams", None, body.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) =
            send(state.clone(), json_request("POST", "/teams", Some("999"), body.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(state.clone(), json_request("POST", "/teams", Some("2"), body.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, created) = send(state, json_request("POST", "/teams", Some("1"), body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["name"], "U9");
    }

    #[tokio::test]
    async fn invalid_payloads_are_rejected_before_the_engine() {
        let (state, _store) = seeded_state().await;
        let body = serde_json::json!({ "name": "U9", "color": "teal" });
        let (status, _) = send(state, json_request("POST", "/teams", Some("1"), body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn voting_flow_over_http() {
        let (state, _store) = seeded_state().await;

        let (status, _) = send(
            state.clone(),
            json_request("POST", "/games/4/voting/open", Some("2"), Value::Null),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let ballot = serde_json::json!({ "best_fielder_id": "3", "best_batter_id": "5" });
        let (status, vote) = send(
            state.clone(),
            json_request("POST", "/games/3/votes", Some("3"), ballot),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(vote["voter_id"], "1");

        let request = Request::get("/games/3/votes/mine")
            .header("x-user-id", "3")
            .body(Body::empty())
            .unwrap();
        let (status, mine) = send(state, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mine["has_voted"], true);
    }

    #[tokio::test]
    async fn unknown_login_is_unauthorized() {
        let (state, _store) = seeded_state().await;
        let body = serde_json::json!({ "email": "ghost@baseball.com" });
        let (status, body) = send(state, json_request("POST", "/auth/login", None, body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["message"].as_str().unwrap().starts_with("unauthorized"));
    }

    #[tokio::test]
    async fn leaderboard_rejects_unknown_metrics() {
        let (state, _store) = seeded_state().await;
        let request = Request::get("/leaderboard?metric=speed").body(Body::empty()).unwrap();
        let (status, _) = send(state.clone(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = Request::get("/leaderboard?metric=fielder").body(Body::empty()).unwrap();
        let (status, body) = send(state, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["player_id"], "3");
    }

    #[tokio::test]
    async fn accounts_read_and_edit_their_own_profile() {
        let (state, _store) = seeded_state().await;

        let request = Request::get("/users/3")
            .header("x-user-id", "3")
            .body(Body::empty())
            .unwrap();
        let (status, me) = send(state.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "mike@baseball.com");

        let request = Request::get("/users/4")
            .header("x-user-id", "3")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(state.clone(), request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let edit = serde_json::json!({ "email": "not-an-email" });
        let (status, _) = send(state.clone(), json_request("PUT", "/users/3", Some("3"), edit)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let edit = serde_json::json!({ "email": "aaron@baseball.com" });
        let (status, _) = send(state.clone(), json_request("PUT", "/users/3", Some("3"), edit)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let edit = serde_json::json!({ "phone": "555-0101" });
        let (status, updated) = send(state, json_request("PUT", "/users/3", Some("3"), edit)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["phone"], "555-0101");
        assert_eq!(updated["email"], "mike@baseball.com");
    }

    #[tokio::test]
    async fn deleted_players_lose_their_ballot() {
        let (state, _store) = seeded_state().await;

        // Account 4 is linked to player 2, a participant of game 3.
        let request = Request::delete("/players/2")
            .header("x-user-id", "1")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(state.clone(), request).await;
        assert!(status.is_success());
        assert_eq!(state.resolve_caller("4").await.unwrap().linked_player_id, None);

        let ballot = serde_json::json!({ "best_fielder_id": "3" });
        let (status, _) = send(
            state,
            json_request("POST", "/games/3/votes", Some("4"), ballot),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn empty_imports_are_rejected() {
        let (state, _store) = seeded_state().await;
        let (status, _) = send(
            state.clone(),
            json_request("POST", "/games/import", Some("1"), serde_json::json!({ "games": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            state,
            json_request("POST", "/players/import", Some("1"), serde_json::json!({ "players": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
