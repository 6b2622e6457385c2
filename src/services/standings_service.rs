use tracing::debug;

use crate::{
    dto::standings::LeaderboardEntry,
    state::{SharedState, standings::Metric},
};

/// Players ranked by `metric`, highest first.
pub async fn leaderboard(state: &SharedState, metric: Metric) -> Vec<LeaderboardEntry> {
    debug!(?metric, "computing leaderboard");
    state
        .read_league(|league| {
            league
                .leaderboard(metric)
                .iter()
                .enumerate()
                .map(|(index, standing)| LeaderboardEntry::new(index, metric, standing))
                .collect()
        })
        .await
}
