//! Best fielder / best batter ballots.

use tracing::debug;

use crate::{
    dao::models::StoreMutation,
    state::{
        identity::{Caller, Capability},
        league::{League, LeagueError, LeagueResult, PlayerId, Vote},
    },
};

/// Nominations submitted by a voter for one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ballot {
    /// Nominee for best fielder.
    pub best_fielder_id: Option<PlayerId>,
    /// Nominee for best batter.
    pub best_batter_id: Option<PlayerId>,
}

impl League {
    /// Record or overwrite the caller's ballot for a game.
    ///
    /// Only player accounts linked to a roster entry may vote, while voting is open, for
    /// eligible team mates other than themselves. A second submission edits the existing
    /// ballot in place and keeps its id.
    pub fn submit_vote(&mut self, caller: &Caller, game_id: &str, ballot: Ballot) -> LeagueResult<Vote> {
        caller.authorize(Capability::CastVote)?;
        let voter_id = caller.linked_player_id.clone().ok_or_else(|| {
            LeagueError::Forbidden("account is not linked to a player".into())
        })?;
        if self.player(&voter_id).is_err() {
            return Err(LeagueError::Forbidden(format!(
                "linked player `{voter_id}` is no longer on the roster"
            )));
        }

        let game = self.game(game_id)?;
        if !game.flags.voting_open {
            return Err(LeagueError::Conflict(format!(
                "voting is closed for game `{game_id}`"
            )));
        }

        let Ballot {
            best_fielder_id,
            best_batter_id,
        } = ballot;
        if best_fielder_id.is_none() && best_batter_id.is_none() {
            return Err(LeagueError::Validation(
                "a ballot needs at least one nominee".into(),
            ));
        }
        for nominee in best_fielder_id.iter().chain(best_batter_id.iter()) {
            if *nominee == voter_id {
                return Err(LeagueError::Conflict("players cannot vote for themselves".into()));
            }
            self.ensure_eligible(game, nominee)?;
        }

        let key = (game_id.to_string(), voter_id.clone());
        let vote = match self.ballots.get(&key).and_then(|id| self.votes.get(id)) {
            Some(existing) => Vote {
                best_fielder_id,
                best_batter_id,
                ..existing.clone()
            },
            None => Vote {
                id: format!("{game_id}-{voter_id}"),
                game_id: game_id.to_string(),
                voter_id,
                best_fielder_id,
                best_batter_id,
            },
        };

        debug!(game_id = %game_id, vote_id = %vote.id, "ballot recorded");
        self.record(StoreMutation::UpsertVote(vote.clone().into()));
        self.insert_vote(vote.clone());
        Ok(vote)
    }

    /// Whether `player_id` already voted on the game.
    pub fn has_player_voted(&self, game_id: &str, player_id: &str) -> bool {
        self.player_vote(game_id, player_id).is_some()
    }

    /// Ballot cast by `player_id` on the game, if any.
    pub fn player_vote(&self, game_id: &str, player_id: &str) -> Option<&Vote> {
        self.ballots
            .get(&(game_id.to_string(), player_id.to_string()))
            .and_then(|id| self.votes.get(id))
    }

    /// Every ballot cast on a game.
    pub fn votes_for_game(&self, game_id: &str) -> LeagueResult<Vec<&Vote>> {
        self.game(game_id)?;
        Ok(self
            .votes
            .values()
            .filter(|vote| vote.game_id == game_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{games::NewGame, identity::Role, league::tests::seeded};

    fn player(id: &str) -> Caller {
        Caller {
            user_id: format!("user-{id}"),
            role: Role::Player,
            linked_player_id: Some(id.into()),
        }
    }

    fn ballot(fielder: Option<&str>, batter: Option<&str>) -> Ballot {
        Ballot {
            best_fielder_id: fielder.map(Into::into),
            best_batter_id: batter.map(Into::into),
        }
    }

    fn open_game(league: &mut League) -> String {
        let game = league
            .add_game(NewGame {
                team_id: "1".into(),
                opponent: "Rivals".into(),
                date: "2024-05-01".into(),
                location: "Home".into(),
            })
            .unwrap();
        league.complete_game(&game.id).unwrap();
        league.open_voting(&game.id).unwrap();
        game.id
    }

    #[test]
    fn resubmission_edits_the_same_ballot() {
        let mut league = seeded();
        let g1 = open_game(&mut league);
        let p3 = player("3");

        let first = league
            .submit_vote(&p3, &g1, ballot(Some("1"), Some("2")))
            .unwrap();
        let vote = league.player_vote(&g1, "3").unwrap();
        assert_eq!(vote.best_fielder_id.as_deref(), Some("1"));
        assert_eq!(vote.best_batter_id.as_deref(), Some("2"));

        let second = league
            .submit_vote(&p3, &g1, ballot(Some("5"), Some("2")))
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(
            league.player_vote(&g1, "3").unwrap().best_fielder_id.as_deref(),
            Some("5")
        );
        assert!(league.has_player_voted(&g1, "3"));
        assert_eq!(league.votes_for_game(&g1).unwrap().len(), 1);
    }

    #[test]
    fn seeded_ballot_keeps_its_id_on_edit() {
        let mut league = seeded();
        league.open_voting("1").unwrap();
        let vote = league
            .submit_vote(&player("3"), "1", ballot(Some("4"), None))
            .unwrap();
        assert_eq!(vote.id, "1-3");
        assert_eq!(vote.best_batter_id, None);
        assert_eq!(league.votes_for_game("1").unwrap().len(), 5);
    }

    #[test]
    fn voters_do_not_interfere() {
        let mut league = seeded();
        let g1 = open_game(&mut league);
        league
            .submit_vote(&player("3"), &g1, ballot(Some("1"), None))
            .unwrap();
        league
            .submit_vote(&player("4"), &g1, ballot(None, Some("1")))
            .unwrap();

        assert_eq!(league.votes_for_game(&g1).unwrap().len(), 2);
        assert_eq!(
            league.player_vote(&g1, "3").unwrap().best_fielder_id.as_deref(),
            Some("1")
        );
    }

    #[test]
    fn only_linked_players_vote() {
        let mut league = seeded();
        let g1 = open_game(&mut league);

        let manager = Caller {
            user_id: "2".into(),
            role: Role::Manager,
            linked_player_id: Some("4".into()),
        };
        let unlinked = Caller {
            linked_player_id: None,
            ..player("9")
        };
        for caller in [manager, unlinked] {
            let err = league
                .submit_vote(&caller, &g1, ballot(Some("1"), None))
                .unwrap_err();
            assert!(matches!(err, LeagueError::Forbidden(_)));
        }
        assert!(league.votes_for_game(&g1).unwrap().is_empty());
    }

    #[test]
    fn voting_must_be_open() {
        let mut league = seeded();
        let err = league
            .submit_vote(&player("3"), "1", ballot(Some("1"), None))
            .unwrap_err();
        assert!(matches!(err, LeagueError::Conflict(_)));

        let err = league
            .submit_vote(&player("3"), "missing", ballot(Some("1"), None))
            .unwrap_err();
        assert!(matches!(err, LeagueError::NotFound { .. }));
    }

    #[test]
    fn ballot_rules() {
        let mut league = seeded();
        // Game 3 is seeded with voting open and participants 1, 2, 3 and 5.
        let p1 = player("1");

        assert!(matches!(
            league.submit_vote(&p1, "3", Ballot::default()),
            Err(LeagueError::Validation(_))
        ));
        assert!(matches!(
            league.submit_vote(&p1, "3", ballot(Some("1"), None)),
            Err(LeagueError::Conflict(_))
        ));
        assert!(matches!(
            league.submit_vote(&p1, "3", ballot(Some("4"), None)),
            Err(LeagueError::Conflict(_))
        ));
        assert!(matches!(
            league.submit_vote(&p1, "3", ballot(None, Some("ghost"))),
            Err(LeagueError::NotFound { .. })
        ));
        assert!(!league.has_player_voted("3", "1"));

        league
            .submit_vote(&p1, "3", ballot(Some("2"), Some("5")))
            .unwrap();
        assert!(league.has_player_voted("3", "1"));
    }

    #[test]
    fn unknown_ballot_is_none() {
        let league = seeded();
        assert!(league.player_vote("4", "1").is_none());
        assert!(!league.has_player_voted("4", "1"));
    }

    #[test]
    fn removed_players_can_no_longer_vote() {
        let mut league = seeded();
        league.delete_player("4").unwrap();

        let err = league
            .submit_vote(&player("4"), "3", ballot(Some("1"), None))
            .unwrap_err();
        assert!(matches!(err, LeagueError::Forbidden(_)));
        assert!(!league.has_player_voted("3", "4"));
    }
}
