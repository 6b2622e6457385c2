use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::{
    game::{GameSummary, ScoreSummary},
    roster::{PlayerSummary, TeamSummary},
};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already serialised payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the SSE stream.
    pub stream: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when a game is scheduled, edited or moves through its lifecycle.
pub struct GameChangedEvent {
    pub game: GameSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when a game and its scores and ballots were deleted.
pub struct GameDeletedEvent {
    pub game_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when a batch of games was imported.
pub struct GamesImportedEvent {
    pub game_ids: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when a ballot is recorded. Ballot content stays private.
pub struct VoteSubmittedEvent {
    pub game_id: String,
    pub vote_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when placement points were (re)assigned.
pub struct PointsAssignedEvent {
    pub game_id: String,
    pub scores: Vec<ScoreSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when a team is created or updated.
pub struct TeamChangedEvent {
    pub team: TeamSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when a team has been deleted.
pub struct TeamDeletedEvent {
    pub team_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when players are created, edited, imported or change teams.
pub struct PlayersChangedEvent {
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when a player has been deleted.
pub struct PlayerDeletedEvent {
    pub player_id: String,
}
