//! Schedule and match-day commands.

use tracing::info;

use crate::{
    dto::{
        game::{
            CreateGameRequest, GameListQuery, GameSummary, ImportGamesRequest, ParticipantsPayload,
            ScoreSummary, UpdateGameRequest,
        },
        now_rfc3339,
    },
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        games::PointsEntry,
        identity::{Caller, Capability},
    },
};

/// List games in schedule order, optionally filtered by team and/or participant.
pub async fn list_games(state: &SharedState, query: &GameListQuery) -> Vec<GameSummary> {
    state
        .read_league(|league| {
            league
                .games()
                .filter(|game| {
                    query
                        .team_id
                        .as_deref()
                        .is_none_or(|team_id| game.team_id == team_id)
                })
                .filter(|game| {
                    query
                        .player_id
                        .as_deref()
                        .is_none_or(|player_id| game.participants.contains(player_id))
                })
                .map(GameSummary::from)
                .collect()
        })
        .await
}

/// Fetch one game.
pub async fn get_game(state: &SharedState, game_id: &str) -> Result<GameSummary, ServiceError> {
    state
        .read_league(|league| league.game(game_id).map(GameSummary::from))
        .await
        .map_err(Into::into)
}

/// Schedule a new upcoming game.
pub async fn create_game(
    state: &SharedState,
    caller: &Caller,
    request: CreateGameRequest,
) -> Result<GameSummary, ServiceError> {
    caller.authorize(Capability::EditSchedule)?;
    let game = state
        .mutate_league("create_game", |league| league.add_game(request.into()))
        .await?;

    info!(game_id = %game.id, team_id = %game.team_id, "game scheduled");
    let summary = GameSummary::from(game);
    sse_events::broadcast_game(state, sse_events::EVENT_GAME_CREATED, summary.clone());
    Ok(summary)
}

/// Replace the schedule fields of a game.
pub async fn update_game(
    state: &SharedState,
    caller: &Caller,
    game_id: &str,
    request: UpdateGameRequest,
) -> Result<GameSummary, ServiceError> {
    caller.authorize(Capability::EditSchedule)?;
    let game = state
        .mutate_league("update_game", |league| {
            league.update_game(game_id, request.into())
        })
        .await?;

    info!(game_id, "game updated");
    Ok(announce(state, GameSummary::from(game)))
}

/// Delete a game together with its scores and ballots.
pub async fn delete_game(
    state: &SharedState,
    caller: &Caller,
    game_id: &str,
) -> Result<(), ServiceError> {
    caller.authorize(Capability::EditSchedule)?;
    state
        .mutate_league("delete_game", |league| league.delete_game(game_id))
        .await?;

    info!(game_id, "game deleted");
    sse_events::broadcast_game_deleted(state, game_id);
    Ok(())
}

/// Append a batch of spreadsheet rows as upcoming games.
pub async fn import_games(
    state: &SharedState,
    caller: &Caller,
    request: ImportGamesRequest,
) -> Result<Vec<GameSummary>, ServiceError> {
    caller.authorize(Capability::EditSchedule)?;
    let rows = request.games.into_iter().map(Into::into).collect();
    let placeholders = state.config().import_placeholders().clone();
    let now = now_rfc3339();

    let games = state
        .mutate_league("import_games", |league| {
            league.bulk_import_games(rows, &placeholders, &now)
        })
        .await?;

    info!(count = games.len(), "games imported");
    let summaries: Vec<GameSummary> = games.into_iter().map(GameSummary::from).collect();
    sse_events::broadcast_games_imported(
        state,
        summaries.iter().map(|game| game.id.clone()).collect(),
    );
    Ok(summaries)
}

/// Mark a game as played.
pub async fn complete_game(
    state: &SharedState,
    caller: &Caller,
    game_id: &str,
) -> Result<GameSummary, ServiceError> {
    caller.authorize(Capability::RunGame)?;
    let game = state
        .mutate_league("complete_game", |league| league.complete_game(game_id))
        .await?;

    info!(game_id, "game completed");
    Ok(announce(state, GameSummary::from(game)))
}

/// Open the voting window of a completed game.
pub async fn open_voting(
    state: &SharedState,
    caller: &Caller,
    game_id: &str,
) -> Result<GameSummary, ServiceError> {
    caller.authorize(Capability::RunGame)?;
    let game = state
        .mutate_league("open_voting", |league| league.open_voting(game_id))
        .await?;

    info!(game_id, "voting opened");
    Ok(announce(state, GameSummary::from(game)))
}

/// Close the voting window of a game.
pub async fn close_voting(
    state: &SharedState,
    caller: &Caller,
    game_id: &str,
) -> Result<GameSummary, ServiceError> {
    caller.authorize(Capability::RunGame)?;
    let game = state
        .mutate_league("close_voting", |league| league.close_voting(game_id))
        .await?;

    info!(game_id, "voting closed");
    Ok(announce(state, GameSummary::from(game)))
}

/// Participants recorded for a game, in insertion order.
pub async fn participants(
    state: &SharedState,
    game_id: &str,
) -> Result<ParticipantsPayload, ServiceError> {
    let player_ids = state
        .read_league(|league| league.participants(game_id))
        .await?;
    Ok(ParticipantsPayload { player_ids })
}

/// Replace the participant list of a game.
pub async fn update_participants(
    state: &SharedState,
    caller: &Caller,
    game_id: &str,
    payload: ParticipantsPayload,
) -> Result<GameSummary, ServiceError> {
    caller.authorize(Capability::RunGame)?;
    let game = state
        .mutate_league("update_participants", |league| {
            league.update_participants(game_id, payload.player_ids)
        })
        .await?;

    info!(game_id, participants = game.participants.len(), "participants updated");
    Ok(announce(state, GameSummary::from(game)))
}

/// Scores of a game, best placement first.
pub async fn scores(state: &SharedState, game_id: &str) -> Result<Vec<ScoreSummary>, ServiceError> {
    state
        .read_league(|league| {
            league
                .scores_for_game(game_id)
                .map(|scores| scores.into_iter().map(ScoreSummary::from).collect())
        })
        .await
        .map_err(Into::into)
}

/// Replace the placement points of a completed game.
pub async fn assign_points(
    state: &SharedState,
    caller: &Caller,
    game_id: &str,
    entries: Vec<PointsEntry>,
) -> Result<Vec<ScoreSummary>, ServiceError> {
    caller.authorize(Capability::RunGame)?;
    let (scores, game) = state
        .mutate_league("assign_points", |league| {
            let scores = league.assign_points(game_id, entries)?;
            let game = league.game(game_id)?.clone();
            Ok((scores, game))
        })
        .await?;

    info!(game_id, awarded = scores.len(), "points assigned");
    let summaries: Vec<ScoreSummary> = scores.iter().map(ScoreSummary::from).collect();
    sse_events::broadcast_points_assigned(state, game_id, summaries.clone());
    announce(state, GameSummary::from(game));
    Ok(summaries)
}

fn announce(state: &SharedState, summary: GameSummary) -> GameSummary {
    sse_events::broadcast_game(state, sse_events::EVENT_GAME_UPDATED, summary.clone());
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dto::game::ImportGameRow,
        state::{phase::GamePhase, tests::seeded_state},
    };

    async fn caller(state: &SharedState, user_id: &str) -> Caller {
        state.resolve_caller(user_id).await.unwrap()
    }

    #[tokio::test]
    async fn filters_combine() {
        let (state, _store) = seeded_state().await;
        let query = GameListQuery {
            team_id: Some("1".into()),
            player_id: Some("2".into()),
        };
        let ids: Vec<String> = list_games(&state, &query)
            .await
            .into_iter()
            .map(|game| game.id)
            .collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[tokio::test]
    async fn managers_run_games_but_cannot_schedule() {
        let (state, _store) = seeded_state().await;
        let manager = caller(&state, "2").await;

        let game = complete_game(&state, &manager, "4").await.unwrap();
        assert_eq!(game.phase, GamePhase::Completed);

        let request = CreateGameRequest {
            team_id: "1".into(),
            opponent: "Mets".into(),
            date: "2023-07-06".into(),
            location: "Home".into(),
        };
        let err = create_game(&state, &manager, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn lifecycle_changes_are_broadcast() {
        let (state, _store) = seeded_state().await;
        let admin = caller(&state, "1").await;
        let mut events = state.public_sse().subscribe();

        open_voting(&state, &admin, "1").await.unwrap();
        let event = events.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("game.updated"));
        assert!(event.data.contains(r#""phase":"voting_open""#));
    }

    #[tokio::test]
    async fn imports_use_configured_placeholders() {
        let (state, _store) = seeded_state().await;
        let admin = caller(&state, "1").await;
        let request = ImportGamesRequest {
            games: vec![ImportGameRow {
                team_id: Some("2".into()),
                ..ImportGameRow::default()
            }],
        };

        let games = import_games(&state, &admin, request).await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].opponent, "Unknown Opponent");
        assert_eq!(games[0].phase, GamePhase::Upcoming);
    }

    #[tokio::test]
    async fn assigning_points_replaces_previous_scores() {
        let (state, _store) = seeded_state().await;
        let manager = caller(&state, "2").await;
        let entries = vec![PointsEntry {
            player_id: "2".into(),
            points: 3,
        }];

        let scores = assign_points(&state, &manager, "1", entries).await.unwrap();
        assert_eq!(scores.len(), 1);
        let listed = super::scores(&state, "1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].player_id, "2");
    }
}
