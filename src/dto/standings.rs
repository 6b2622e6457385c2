use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::standings::{Metric, PlayerStanding};

/// Query string of the leaderboard route.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub metric: Metric,
}

/// A ranked leaderboard line.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based position; tied players keep roster order and get distinct ranks.
    pub rank: usize,
    pub player_id: String,
    pub name: String,
    /// Value of the requested metric.
    pub value: u32,
    pub total_points: u32,
    pub best_fielder: u32,
    pub best_batter: u32,
}

impl LeaderboardEntry {
    /// Build the entry at zero-based `index` of a leaderboard sorted by `metric`.
    pub fn new(index: usize, metric: Metric, standing: &PlayerStanding<'_>) -> Self {
        Self {
            rank: index + 1,
            player_id: standing.player.id.clone(),
            name: standing.player.name.clone(),
            value: standing.value(metric),
            total_points: standing.total_points,
            best_fielder: standing.best_fielder,
            best_batter: standing.best_batter,
        }
    }
}
