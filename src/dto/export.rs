//! Flat rows returned by the export endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// One score line of the points export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ScoreExportRow {
    pub game_id: String,
    pub player_id: String,
    pub player_name: String,
    pub points: u8,
}

/// One ballot line of the votes export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct VoteExportRow {
    pub game_id: String,
    pub voter_id: String,
    pub voter_name: String,
    pub best_fielder_id: Option<String>,
    pub best_fielder_name: Option<String>,
    pub best_batter_id: Option<String>,
    pub best_batter_name: Option<String>,
}
