//! Team and player payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::validation::validate_hex_color,
    state::{
        roster::{ImportedPlayer, PlayerDraft, Team, TeamDraft},
        standings::PlayerStanding,
    },
};

/// Payload used to create or replace a team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TeamRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    /// Hex color, e.g. `#1E5CB3`.
    #[validate(custom(function = "validate_hex_color"))]
    pub color: String,
    #[serde(default)]
    #[validate(length(max = 280))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(url)]
    pub image: Option<String>,
}

impl From<TeamRequest> for TeamDraft {
    fn from(value: TeamRequest) -> Self {
        Self {
            name: value.name,
            color: value.color,
            description: value.description,
            image: value.image,
        }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
/// Public projection of a team.
pub struct TeamSummary {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&Team> for TeamSummary {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.clone(),
            name: team.name.clone(),
            color: team.color.clone(),
            description: team.description.clone(),
            image: team.image.clone(),
        }
    }
}

/// Payload used to create a player or replace their profile.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PlayerRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 60))]
    pub position: String,
    #[serde(default)]
    #[validate(range(max = 999))]
    pub number: Option<u32>,
    #[serde(default)]
    #[validate(url)]
    pub image: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

impl From<PlayerRequest> for PlayerDraft {
    fn from(value: PlayerRequest) -> Self {
        Self {
            name: value.name,
            position: value.position,
            number: value.number,
            image: value.image,
            email: value.email,
            phone: value.phone,
        }
    }
}

/// Player profile with the counters computed from recorded scores and ballots.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    pub id: String,
    pub name: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub team_ids: Vec<String>,
    pub total_points: u32,
    pub best_fielder: u32,
    pub best_batter: u32,
}

impl From<PlayerStanding<'_>> for PlayerSummary {
    fn from(standing: PlayerStanding<'_>) -> Self {
        let player = standing.player;
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            position: player.position.clone(),
            number: player.number,
            image: player.image.clone(),
            email: player.email.clone(),
            phone: player.phone.clone(),
            team_ids: player.team_ids.iter().cloned().collect(),
            total_points: standing.total_points,
            best_fielder: standing.best_fielder,
            best_batter: standing.best_batter,
        }
    }
}

/// Full replacement of a player's team memberships.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PlayerTeamsRequest {
    #[validate(length(max = 20))]
    pub team_ids: Vec<String>,
}

/// Batch of players parsed from a spreadsheet by the client.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ImportPlayersRequest {
    #[validate(length(min = 1, max = 500))]
    pub players: Vec<ImportPlayerRow>,
}

/// One imported player row; missing names and positions get placeholders.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ImportPlayerRow {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub team_ids: Vec<String>,
}

impl From<ImportPlayerRow> for ImportedPlayer {
    fn from(value: ImportPlayerRow) -> Self {
        Self {
            name: value.name,
            position: value.position,
            number: value.number,
            email: value.email,
            phone: value.phone,
            team_ids: value.team_ids,
        }
    }
}
