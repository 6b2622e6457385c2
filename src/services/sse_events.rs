use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        game::{GameSummary, ScoreSummary},
        roster::{PlayerSummary, TeamSummary},
        sse::{
            GameChangedEvent, GameDeletedEvent, GamesImportedEvent, PlayerDeletedEvent,
            PlayersChangedEvent, PointsAssignedEvent, ServerEvent, TeamChangedEvent,
            TeamDeletedEvent, VoteSubmittedEvent,
        },
    },
    state::SharedState,
};

pub const EVENT_GAME_CREATED: &str = "game.created";
pub const EVENT_GAME_UPDATED: &str = "game.updated";
const EVENT_GAME_DELETED: &str = "game.deleted";
const EVENT_GAMES_IMPORTED: &str = "games.imported";
const EVENT_VOTE_SUBMITTED: &str = "vote.submitted";
const EVENT_POINTS_ASSIGNED: &str = "points.assigned";
const EVENT_TEAM_CREATED: &str = "team.created";
const EVENT_TEAM_UPDATED: &str = "team.updated";
const EVENT_TEAM_DELETED: &str = "team.deleted";
pub const EVENT_PLAYER_CREATED: &str = "player.created";
pub const EVENT_PLAYER_UPDATED: &str = "player.updated";
const EVENT_PLAYER_DELETED: &str = "player.deleted";

/// Broadcast a new or changed game under the given event name.
pub fn broadcast_game(state: &SharedState, event: &str, game: GameSummary) {
    send_public_event(state, event, &GameChangedEvent { game });
}

/// Broadcast that a game has been deleted.
pub fn broadcast_game_deleted(state: &SharedState, game_id: &str) {
    let payload = GameDeletedEvent {
        game_id: game_id.to_string(),
    };
    send_public_event(state, EVENT_GAME_DELETED, &payload);
}

/// Broadcast the identifiers of freshly imported games.
pub fn broadcast_games_imported(state: &SharedState, game_ids: Vec<String>) {
    send_public_event(state, EVENT_GAMES_IMPORTED, &GamesImportedEvent { game_ids });
}

/// Broadcast that a ballot was recorded, without its content.
pub fn broadcast_vote_submitted(state: &SharedState, game_id: &str, vote_count: usize) {
    let payload = VoteSubmittedEvent {
        game_id: game_id.to_string(),
        vote_count,
    };
    send_public_event(state, EVENT_VOTE_SUBMITTED, &payload);
}

/// Broadcast the new placement points of a game.
pub fn broadcast_points_assigned(state: &SharedState, game_id: &str, scores: Vec<ScoreSummary>) {
    let payload = PointsAssignedEvent {
        game_id: game_id.to_string(),
        scores,
    };
    send_public_event(state, EVENT_POINTS_ASSIGNED, &payload);
}

/// Broadcast the creation of a new team.
pub fn broadcast_team_created(state: &SharedState, team: TeamSummary) {
    send_public_event(state, EVENT_TEAM_CREATED, &TeamChangedEvent { team });
}

/// Broadcast that a team has been updated.
pub fn broadcast_team_updated(state: &SharedState, team: TeamSummary) {
    send_public_event(state, EVENT_TEAM_UPDATED, &TeamChangedEvent { team });
}

/// Broadcast that a team has been deleted.
pub fn broadcast_team_deleted(state: &SharedState, team_id: &str) {
    let payload = TeamDeletedEvent {
        team_id: team_id.to_string(),
    };
    send_public_event(state, EVENT_TEAM_DELETED, &payload);
}

/// Broadcast created or edited players under the given event name.
pub fn broadcast_players(state: &SharedState, event: &str, players: Vec<PlayerSummary>) {
    if players.is_empty() {
        return;
    }
    send_public_event(state, event, &PlayersChangedEvent { players });
}

/// Broadcast that a player has been deleted.
pub fn broadcast_player_deleted(state: &SharedState, player_id: &str) {
    let payload = PlayerDeletedEvent {
        player_id: player_id.to_string(),
    };
    send_public_event(state, EVENT_PLAYER_DELETED, &payload);
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
