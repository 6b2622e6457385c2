use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::validation::validate_identifier,
    state::{
        games::{GameDetails, ImportedGame, NewGame, PointsEntry},
        league::{Game, Score, Vote},
        phase::GamePhase,
        votes::Ballot,
    },
};

/// Payload used to schedule a game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateGameRequest {
    #[validate(custom(function = "validate_identifier"))]
    pub team_id: String,
    #[validate(length(min = 1, max = 120))]
    pub opponent: String,
    /// ISO 8601 date, e.g. `2024-05-01`.
    #[validate(length(min = 1, max = 64))]
    pub date: String,
    #[validate(length(min = 1, max = 120))]
    pub location: String,
}

impl From<CreateGameRequest> for NewGame {
    fn from(value: CreateGameRequest) -> Self {
        Self {
            team_id: value.team_id,
            opponent: value.opponent,
            date: value.date,
            location: value.location,
        }
    }
}

/// Schedule fields of an existing game. Lifecycle flags are driven by dedicated endpoints.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateGameRequest {
    #[validate(custom(function = "validate_identifier"))]
    pub team_id: String,
    #[validate(length(min = 1, max = 120))]
    pub opponent: String,
    #[validate(length(min = 1, max = 64))]
    pub date: String,
    #[validate(length(min = 1, max = 120))]
    pub location: String,
    /// Free-form result such as `W 5-3`; omitted or blank clears it.
    #[serde(default)]
    #[validate(length(max = 64))]
    pub result: Option<String>,
}

impl From<UpdateGameRequest> for GameDetails {
    fn from(value: UpdateGameRequest) -> Self {
        Self {
            team_id: value.team_id,
            opponent: value.opponent,
            date: value.date,
            location: value.location,
            result: value.result,
        }
    }
}

/// Batch of games parsed from a spreadsheet by the client.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ImportGamesRequest {
    #[validate(length(min = 1, max = 500))]
    pub games: Vec<ImportGameRow>,
}

/// One imported row. Lifecycle columns, when present, are ignored: imported games always start
/// upcoming.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ImportGameRow {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub opponent: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl From<ImportGameRow> for ImportedGame {
    fn from(value: ImportGameRow) -> Self {
        Self {
            team_id: value.team_id,
            opponent: value.opponent,
            date: value.date,
            location: value.location,
        }
    }
}

/// Optional filters of the game list.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GameListQuery {
    /// Only games of this team.
    pub team_id: Option<String>,
    /// Only games this player took part in.
    pub player_id: Option<String>,
}

/// Public projection of a game.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct GameSummary {
    pub id: String,
    pub team_id: String,
    pub opponent: String,
    pub date: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub is_completed: bool,
    pub voting_open: bool,
    pub points_assigned: bool,
    /// Phase derived from the three flags above.
    pub phase: GamePhase,
    pub participants: Vec<String>,
}

impl From<&Game> for GameSummary {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id.clone(),
            team_id: game.team_id.clone(),
            opponent: game.opponent.clone(),
            date: game.date.clone(),
            location: game.location.clone(),
            result: game.result.clone(),
            is_completed: game.flags.is_completed,
            voting_open: game.flags.voting_open,
            points_assigned: game.flags.points_assigned,
            phase: game.phase(),
            participants: game.participants.iter().cloned().collect(),
        }
    }
}

impl From<Game> for GameSummary {
    fn from(game: Game) -> Self {
        Self::from(&game)
    }
}

/// Full replacement of a game's participant list.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ParticipantsPayload {
    #[validate(length(max = 100))]
    pub player_ids: Vec<String>,
}

/// Placement points for the top performers of a game; replaces any previous assignment.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AssignPointsRequest {
    #[validate(length(max = 3), nested)]
    pub entries: Vec<PointsEntryInput>,
}

/// One awarded player.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct PointsEntryInput {
    #[validate(custom(function = "validate_identifier"))]
    pub player_id: String,
    /// 3 for the best performer, 2 for the runner-up, 1 for third place.
    #[validate(range(min = 1, max = 3))]
    pub points: u8,
}

impl From<PointsEntryInput> for PointsEntry {
    fn from(value: PointsEntryInput) -> Self {
        Self {
            player_id: value.player_id,
            points: value.points,
        }
    }
}

/// Points awarded to one player for one game.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ScoreSummary {
    pub id: String,
    pub game_id: String,
    pub player_id: String,
    pub points: u8,
}

impl From<&Score> for ScoreSummary {
    fn from(score: &Score) -> Self {
        Self {
            id: score.id.clone(),
            game_id: score.game_id.clone(),
            player_id: score.player_id.clone(),
            points: score.placement.points(),
        }
    }
}

/// Best fielder / best batter nominations submitted by the calling player.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BallotRequest {
    #[serde(default)]
    pub best_fielder_id: Option<String>,
    #[serde(default)]
    pub best_batter_id: Option<String>,
}

impl From<BallotRequest> for Ballot {
    fn from(value: BallotRequest) -> Self {
        Self {
            best_fielder_id: value.best_fielder_id,
            best_batter_id: value.best_batter_id,
        }
    }
}

/// A ballot as stored.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct VoteSummary {
    pub id: String,
    pub game_id: String,
    pub voter_id: String,
    pub best_fielder_id: Option<String>,
    pub best_batter_id: Option<String>,
}

impl From<&Vote> for VoteSummary {
    fn from(vote: &Vote) -> Self {
        Self {
            id: vote.id.clone(),
            game_id: vote.game_id.clone(),
            voter_id: vote.voter_id.clone(),
            best_fielder_id: vote.best_fielder_id.clone(),
            best_batter_id: vote.best_batter_id.clone(),
        }
    }
}

/// The calling player's ballot for a game, if any.
#[derive(Debug, Serialize, ToSchema)]
pub struct MyVoteResponse {
    pub has_voted: bool,
    pub vote: Option<VoteSummary>,
}
