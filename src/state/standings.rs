//! Player aggregates computed from live scores and votes.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::state::{
    league::{League, Vote},
    roster::Player,
};

/// Ranking criterion of the leaderboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Total placement points.
    #[default]
    Points,
    /// Best fielder nominations.
    Fielder,
    /// Best batter nominations.
    Batter,
}

/// A player together with their computed counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStanding<'a> {
    /// Roster entry.
    pub player: &'a Player,
    /// Sum of placement points.
    pub total_points: u32,
    /// Times nominated best fielder.
    pub best_fielder: u32,
    /// Times nominated best batter.
    pub best_batter: u32,
}

impl PlayerStanding<'_> {
    /// Value of the counter selected by `metric`.
    pub fn value(&self, metric: Metric) -> u32 {
        match metric {
            Metric::Points => self.total_points,
            Metric::Fielder => self.best_fielder,
            Metric::Batter => self.best_batter,
        }
    }
}

impl League {
    /// Sum of the points awarded to a player, over every game or a single one.
    pub fn total_points_for(&self, player_id: &str, game_id: Option<&str>) -> u32 {
        self.scores()
            .filter(|score| score.player_id == player_id)
            .filter(|score| game_id.is_none_or(|game_id| score.game_id == game_id))
            .map(|score| u32::from(score.placement.points()))
            .sum()
    }

    /// Number of ballots naming the player best fielder.
    pub fn fielder_vote_count_for(&self, player_id: &str, game_id: Option<&str>) -> u32 {
        self.count_nominations(game_id, |vote| vote.best_fielder_id.as_deref() == Some(player_id))
    }

    /// Number of ballots naming the player best batter.
    pub fn batter_vote_count_for(&self, player_id: &str, game_id: Option<&str>) -> u32 {
        self.count_nominations(game_id, |vote| vote.best_batter_id.as_deref() == Some(player_id))
    }

    /// Counters of every roster player, in roster order.
    pub fn standings(&self) -> Vec<PlayerStanding<'_>> {
        self.players()
            .map(|player| self.standing(player))
            .collect()
    }

    /// Counters of a single player.
    pub fn standing<'a>(&'a self, player: &'a Player) -> PlayerStanding<'a> {
        PlayerStanding {
            player,
            total_points: self.total_points_for(&player.id, None),
            best_fielder: self.fielder_vote_count_for(&player.id, None),
            best_batter: self.batter_vote_count_for(&player.id, None),
        }
    }

    /// Players ranked by `metric`, highest first. Ties keep roster order.
    pub fn leaderboard(&self, metric: Metric) -> Vec<PlayerStanding<'_>> {
        let mut standings = self.standings();
        standings.sort_by_key(|standing| std::cmp::Reverse(standing.value(metric)));
        standings
    }

    fn count_nominations(
        &self,
        game_id: Option<&str>,
        names: impl Fn(&Vote) -> bool,
    ) -> u32 {
        let count = self
            .votes()
            .filter(|vote| game_id.is_none_or(|game_id| vote.game_id == game_id))
            .filter(|vote| names(vote))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        games::{NewGame, PointsEntry},
        league::tests::seeded,
    };

    #[test]
    fn counters_follow_live_data() {
        let league = seeded();
        // Player 3: 3 points in game 1, 2 points in game 2.
        assert_eq!(league.total_points_for("3", None), 5);
        assert_eq!(league.total_points_for("3", Some("2")), 2);
        assert_eq!(league.fielder_vote_count_for("3", None), 4);
        assert_eq!(league.batter_vote_count_for("1", None), 4);
        assert_eq!(league.batter_vote_count_for("2", Some("2")), 4);
        assert_eq!(league.total_points_for("10", None), 0);
    }

    #[test]
    fn points_for_a_single_game() {
        let mut league = seeded();
        let g1 = league
            .add_game(NewGame {
                team_id: "1".into(),
                opponent: "Rivals".into(),
                date: "2024-05-01".into(),
                location: "Home".into(),
            })
            .unwrap()
            .id;
        league.complete_game(&g1).unwrap();
        league
            .assign_points(
                &g1,
                vec![
                    PointsEntry {
                        player_id: "1".into(),
                        points: 3,
                    },
                    PointsEntry {
                        player_id: "2".into(),
                        points: 2,
                    },
                ],
            )
            .unwrap();

        assert_eq!(league.total_points_for("1", Some(&g1)), 3);
        assert_eq!(league.total_points_for("2", Some(&g1)), 2);
    }

    #[test]
    fn leaderboard_is_descending_and_stable() {
        let league = seeded();
        let ids = |metric: Metric| -> Vec<String> {
            league
                .leaderboard(metric)
                .iter()
                .map(|s| s.player.id.clone())
                .collect()
        };

        let by_points = ids(Metric::Points);
        assert_eq!(&by_points[..5], &["3", "2", "1", "4", "5"]);
        assert_eq!(&by_points[5..], &["6", "7", "8", "9", "10"]);

        // Players 3 and 4 both have four nominations.
        let by_fielder = ids(Metric::Fielder);
        assert_eq!(&by_fielder[..3], &["3", "4", "1"]);

        let board = league.leaderboard(Metric::Batter);
        assert!(board.windows(2).all(|w| w[0].best_batter >= w[1].best_batter));
    }
}
