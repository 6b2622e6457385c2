//! Ballot commands and queries.

use tracing::info;

use crate::{
    dto::game::{BallotRequest, MyVoteResponse, VoteSummary},
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        identity::{Caller, Capability},
        league::LeagueResult,
    },
};

/// Record or edit the caller's ballot for a game.
pub async fn submit_vote(
    state: &SharedState,
    caller: &Caller,
    game_id: &str,
    request: BallotRequest,
) -> Result<VoteSummary, ServiceError> {
    let (vote, vote_count) = state
        .mutate_league("submit_vote", |league| {
            let vote = league.submit_vote(caller, game_id, request.into())?;
            let count = league.votes_for_game(game_id)?.len();
            Ok((vote, count))
        })
        .await?;

    info!(game_id, voter_id = %vote.voter_id, "ballot recorded");
    sse_events::broadcast_vote_submitted(state, game_id, vote_count);
    Ok(VoteSummary::from(&vote))
}

/// Every ballot of a game. Ballots are not public, only game runners can read them.
pub async fn list_votes(
    state: &SharedState,
    caller: &Caller,
    game_id: &str,
) -> Result<Vec<VoteSummary>, ServiceError> {
    caller.authorize(Capability::RunGame)?;
    state
        .read_league(|league| {
            league
                .votes_for_game(game_id)
                .map(|votes| votes.into_iter().map(VoteSummary::from).collect())
        })
        .await
        .map_err(Into::into)
}

/// The caller's own ballot for a game.
pub async fn my_vote(
    state: &SharedState,
    caller: &Caller,
    game_id: &str,
) -> Result<MyVoteResponse, ServiceError> {
    state
        .read_league(|league| -> LeagueResult<MyVoteResponse> {
            league.game(game_id)?;
            let vote = league
                .player_vote(game_id, caller.voter_id())
                .map(VoteSummary::from);
            Ok(MyVoteResponse {
                has_voted: vote.is_some(),
                vote,
            })
        })
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::league_store::LeagueStore, state::tests::seeded_state};

    fn ballot(fielder: Option<&str>, batter: Option<&str>) -> BallotRequest {
        BallotRequest {
            best_fielder_id: fielder.map(Into::into),
            best_batter_id: batter.map(Into::into),
        }
    }

    #[tokio::test]
    async fn linked_player_votes_then_edits() {
        let (state, _store) = seeded_state().await;
        let mike = state.resolve_caller("3").await.unwrap();

        let first = submit_vote(&state, &mike, "3", ballot(Some("2"), None))
            .await
            .unwrap();
        let second = submit_vote(&state, &mike, "3", ballot(Some("3"), Some("5")))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);

        let mine = my_vote(&state, &mike, "3").await.unwrap();
        assert!(mine.has_voted);
        assert_eq!(mine.vote.unwrap().best_batter_id.as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn votes_are_broadcast_without_their_content() {
        let (state, _store) = seeded_state().await;
        let aaron = state.resolve_caller("4").await.unwrap();
        let mut events = state.public_sse().subscribe();

        submit_vote(&state, &aaron, "3", ballot(Some("1"), Some("3")))
            .await
            .unwrap();
        let event = events.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("vote.submitted"));
        assert_eq!(event.data, r#"{"game_id":"3","vote_count":1}"#);
    }

    #[tokio::test]
    async fn closed_voting_is_rejected() {
        let (state, _store) = seeded_state().await;
        let mike = state.resolve_caller("3").await.unwrap();
        let err = submit_vote(&state, &mike, "1", ballot(Some("2"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn only_game_runners_list_ballots() {
        let (state, _store) = seeded_state().await;
        let mike = state.resolve_caller("3").await.unwrap();
        let manager = state.resolve_caller("2").await.unwrap();

        assert!(matches!(
            list_votes(&state, &mike, "1").await.unwrap_err(),
            ServiceError::Forbidden(_)
        ));
        assert_eq!(list_votes(&state, &manager, "1").await.unwrap().len(), 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_ballots_from_different_voters_both_land() {
        let (state, store) = seeded_state().await;
        let mike = state.resolve_caller("3").await.unwrap();
        let aaron = state.resolve_caller("4").await.unwrap();

        let (mikes, aarons) = tokio::join!(
            submit_vote(&state, &mike, "3", ballot(Some("2"), Some("5"))),
            submit_vote(&state, &aaron, "3", ballot(Some("1"), Some("3"))),
        );
        let (mikes, aarons) = (mikes.unwrap(), aarons.unwrap());
        assert_ne!(mikes.id, aarons.id);

        let ballots = state
            .read_league(|league| league.votes_for_game("3").map(|votes| votes.len()))
            .await
            .unwrap();
        assert_eq!(ballots, 2);
        for (caller, fielder) in [(&mike, "2"), (&aaron, "1")] {
            let mine = my_vote(&state, caller, "3").await.unwrap().vote.unwrap();
            assert_eq!(mine.best_fielder_id.as_deref(), Some(fielder));
        }

        let persisted = store.load().await.unwrap();
        assert_eq!(persisted.votes.iter().filter(|v| v.game_id == "3").count(), 2);
    }
}
