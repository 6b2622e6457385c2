//! Flat score and ballot exports for spreadsheet reporting.

use tracing::info;

use crate::{
    dto::export::{ScoreExportRow, VoteExportRow},
    error::ServiceError,
    state::{
        SharedState,
        identity::{Caller, Capability},
        league::League,
    },
};

const UNKNOWN_PLAYER: &str = "Unknown Player";
const UNKNOWN_VOTER: &str = "Unknown Voter";

/// One row per recorded score.
pub async fn export_scores(
    state: &SharedState,
    caller: &Caller,
) -> Result<Vec<ScoreExportRow>, ServiceError> {
    caller.authorize(Capability::ExportData)?;
    let rows: Vec<ScoreExportRow> = state
        .read_league(|league| {
            league
                .scores()
                .map(|score| ScoreExportRow {
                    game_id: score.game_id.clone(),
                    player_id: score.player_id.clone(),
                    player_name: player_name(league, &score.player_id)
                        .unwrap_or_else(|| UNKNOWN_PLAYER.into()),
                    points: score.placement.points(),
                })
                .collect()
        })
        .await;

    info!(rows = rows.len(), by = %caller.user_id, "scores exported");
    Ok(rows)
}

/// One row per ballot, nominee names resolved against the roster.
pub async fn export_votes(
    state: &SharedState,
    caller: &Caller,
) -> Result<Vec<VoteExportRow>, ServiceError> {
    caller.authorize(Capability::ExportData)?;
    let rows: Vec<VoteExportRow> = state
        .read_league(|league| {
            league
                .votes()
                .map(|vote| VoteExportRow {
                    game_id: vote.game_id.clone(),
                    voter_id: vote.voter_id.clone(),
                    voter_name: player_name(league, &vote.voter_id)
                        .unwrap_or_else(|| UNKNOWN_VOTER.into()),
                    best_fielder_name: nominee_name(league, vote.best_fielder_id.as_deref()),
                    best_fielder_id: vote.best_fielder_id.clone(),
                    best_batter_name: nominee_name(league, vote.best_batter_id.as_deref()),
                    best_batter_id: vote.best_batter_id.clone(),
                })
                .collect()
        })
        .await;

    info!(rows = rows.len(), by = %caller.user_id, "votes exported");
    Ok(rows)
}

fn player_name(league: &League, player_id: &str) -> Option<String> {
    league.player(player_id).ok().map(|player| player.name.clone())
}

fn nominee_name(league: &League, player_id: Option<&str>) -> Option<String> {
    player_id.map(|id| player_name(league, id).unwrap_or_else(|| UNKNOWN_PLAYER.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::seeded_state;

    #[tokio::test]
    async fn score_rows_carry_player_names() {
        let (state, _store) = seeded_state().await;
        let admin = state.resolve_caller("1").await.unwrap();

        let rows = export_scores(&state, &admin).await.unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(
            rows[0],
            ScoreExportRow {
                game_id: "1".into(),
                player_id: "3".into(),
                player_name: "Shohei Ohtani".into(),
                points: 3,
            }
        );
    }

    #[tokio::test]
    async fn deleted_voters_render_as_unknown() {
        let (state, _store) = seeded_state().await;
        let admin = state.resolve_caller("1").await.unwrap();
        state
            .mutate_league("delete_player", |league| league.delete_player("4"))
            .await
            .unwrap();

        let rows = export_votes(&state, &admin).await.unwrap();
        let by_four = rows
            .iter()
            .find(|row| row.game_id == "1" && row.voter_id == "4")
            .unwrap();
        assert_eq!(by_four.voter_name, "Unknown Voter");
        assert_eq!(by_four.best_fielder_name.as_deref(), Some("Shohei Ohtani"));

        let nominating_four = rows
            .iter()
            .find(|row| row.game_id == "2" && row.voter_id == "1")
            .unwrap();
        assert_eq!(nominating_four.best_fielder_id, None);
        assert_eq!(nominating_four.best_fielder_name, None);
    }

    #[tokio::test]
    async fn managers_cannot_export() {
        let (state, _store) = seeded_state().await;
        let manager = state.resolve_caller("2").await.unwrap();
        assert!(matches!(
            export_votes(&state, &manager).await.unwrap_err(),
            ServiceError::Forbidden(_)
        ));
    }
}
