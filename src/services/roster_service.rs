//! Team and player commands.

use tracing::{debug, info};

use crate::{
    dto::{
        game::GameSummary,
        roster::{
            ImportPlayersRequest, PlayerRequest, PlayerSummary, PlayerTeamsRequest, TeamRequest,
            TeamSummary,
        },
    },
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        identity::{Caller, Capability},
        league::{League, LeagueResult},
        roster::Player,
    },
};

/// Every team in creation order.
pub async fn list_teams(state: &SharedState) -> Vec<TeamSummary> {
    state
        .read_league(|league| league.teams().map(TeamSummary::from).collect())
        .await
}

/// Fetch one team.
pub async fn get_team(state: &SharedState, team_id: &str) -> Result<TeamSummary, ServiceError> {
    state
        .read_league(|league| league.team(team_id).map(TeamSummary::from))
        .await
        .map_err(Into::into)
}

/// Create a team.
pub async fn create_team(
    state: &SharedState,
    caller: &Caller,
    request: TeamRequest,
) -> Result<TeamSummary, ServiceError> {
    caller.authorize(Capability::ManageRoster)?;
    let team = state
        .mutate_league("create_team", |league| league.add_team(request.into()))
        .await?;

    info!(team_id = %team.id, name = %team.name, "team created");
    let summary = TeamSummary::from(&team);
    sse_events::broadcast_team_created(state, summary.clone());
    Ok(summary)
}

/// Replace the profile of a team.
pub async fn update_team(
    state: &SharedState,
    caller: &Caller,
    team_id: &str,
    request: TeamRequest,
) -> Result<TeamSummary, ServiceError> {
    caller.authorize(Capability::ManageRoster)?;
    let team = state
        .mutate_league("update_team", |league| {
            league.update_team(team_id, request.into())
        })
        .await?;

    info!(team_id, "team updated");
    let summary = TeamSummary::from(&team);
    sse_events::broadcast_team_updated(state, summary.clone());
    Ok(summary)
}

/// Delete a team no game refers to.
pub async fn delete_team(
    state: &SharedState,
    caller: &Caller,
    team_id: &str,
) -> Result<(), ServiceError> {
    caller.authorize(Capability::ManageRoster)?;
    state
        .mutate_league("delete_team", |league| league.delete_team(team_id))
        .await?;

    info!(team_id, "team deleted");
    sse_events::broadcast_team_deleted(state, team_id);
    Ok(())
}

/// Players belonging to a team.
pub async fn team_players(
    state: &SharedState,
    team_id: &str,
) -> Result<Vec<PlayerSummary>, ServiceError> {
    state
        .read_league(|league| -> LeagueResult<Vec<PlayerSummary>> {
            league.team(team_id)?;
            Ok(league
                .players_by_team(team_id)
                .into_iter()
                .map(|player| summarize(league, player))
                .collect())
        })
        .await
        .map_err(Into::into)
}

/// Games scheduled for a team.
pub async fn team_games(
    state: &SharedState,
    team_id: &str,
) -> Result<Vec<GameSummary>, ServiceError> {
    state
        .read_league(|league| -> LeagueResult<Vec<GameSummary>> {
            league.team(team_id)?;
            Ok(league
                .games_by_team(team_id)
                .into_iter()
                .map(GameSummary::from)
                .collect())
        })
        .await
        .map_err(Into::into)
}

/// Every player with their computed counters.
pub async fn list_players(state: &SharedState) -> Vec<PlayerSummary> {
    state
        .read_league(|league| {
            league
                .standings()
                .into_iter()
                .map(PlayerSummary::from)
                .collect()
        })
        .await
}

/// Fetch one player with their computed counters.
pub async fn get_player(
    state: &SharedState,
    player_id: &str,
) -> Result<PlayerSummary, ServiceError> {
    debug!(player_id, "fetching player");
    state
        .read_league(|league| league.player(player_id).map(|player| summarize(league, player)))
        .await
        .map_err(Into::into)
}

/// Games a player took part in.
pub async fn player_games(
    state: &SharedState,
    player_id: &str,
) -> Result<Vec<GameSummary>, ServiceError> {
    state
        .read_league(|league| -> LeagueResult<Vec<GameSummary>> {
            league.player(player_id)?;
            Ok(league
                .games_by_player(player_id)
                .into_iter()
                .map(GameSummary::from)
                .collect())
        })
        .await
        .map_err(Into::into)
}

/// Create a player without team memberships.
pub async fn create_player(
    state: &SharedState,
    caller: &Caller,
    request: PlayerRequest,
) -> Result<PlayerSummary, ServiceError> {
    caller.authorize(Capability::ManageRoster)?;
    let summary = state
        .mutate_league("create_player", |league| {
            let player = league.add_player(request.into())?;
            Ok(summarize(league, &player))
        })
        .await?;

    info!(player_id = %summary.id, "player created");
    sse_events::broadcast_players(state, sse_events::EVENT_PLAYER_CREATED, vec![summary.clone()]);
    Ok(summary)
}

/// Replace the profile of a player; memberships are kept.
pub async fn update_player(
    state: &SharedState,
    caller: &Caller,
    player_id: &str,
    request: PlayerRequest,
) -> Result<PlayerSummary, ServiceError> {
    caller.authorize(Capability::ManageRoster)?;
    let summary = state
        .mutate_league("update_player", |league| {
            let player = league.update_player(player_id, request.into())?;
            Ok(summarize(league, &player))
        })
        .await?;

    info!(player_id, "player updated");
    Ok(announce(state, summary))
}

/// Delete a player, removing them from games, scores and nominations and unlinking their
/// accounts.
pub async fn delete_player(
    state: &SharedState,
    caller: &Caller,
    player_id: &str,
) -> Result<(), ServiceError> {
    caller.authorize(Capability::ManageRoster)?;
    let unlinked = state
        .mutate_league_and_directory("delete_player", |league, directory| {
            league.delete_player(player_id)?;
            let accounts = directory.unlink_player(player_id);
            Ok((accounts.len(), accounts))
        })
        .await?;

    info!(player_id, unlinked, "player deleted");
    sse_events::broadcast_player_deleted(state, player_id);
    Ok(())
}

/// Add a team membership.
pub async fn add_player_to_team(
    state: &SharedState,
    caller: &Caller,
    player_id: &str,
    team_id: &str,
) -> Result<PlayerSummary, ServiceError> {
    caller.authorize(Capability::ManageRoster)?;
    let summary = state
        .mutate_league("add_player_to_team", |league| {
            let player = league.add_player_to_team(player_id, team_id)?;
            Ok(summarize(league, &player))
        })
        .await?;

    info!(player_id, team_id, "membership added");
    Ok(announce(state, summary))
}

/// Drop a team membership.
pub async fn remove_player_from_team(
    state: &SharedState,
    caller: &Caller,
    player_id: &str,
    team_id: &str,
) -> Result<PlayerSummary, ServiceError> {
    caller.authorize(Capability::ManageRoster)?;
    let summary = state
        .mutate_league("remove_player_from_team", |league| {
            let player = league.remove_player_from_team(player_id, team_id)?;
            Ok(summarize(league, &player))
        })
        .await?;

    info!(player_id, team_id, "membership removed");
    Ok(announce(state, summary))
}

/// Replace every team membership of a player.
pub async fn update_player_teams(
    state: &SharedState,
    caller: &Caller,
    player_id: &str,
    request: PlayerTeamsRequest,
) -> Result<PlayerSummary, ServiceError> {
    caller.authorize(Capability::ManageRoster)?;
    let summary = state
        .mutate_league("update_player_teams", |league| {
            let player = league.update_player_teams(player_id, request.team_ids)?;
            Ok(summarize(league, &player))
        })
        .await?;

    info!(player_id, teams = summary.team_ids.len(), "memberships replaced");
    Ok(announce(state, summary))
}

/// Append a batch of spreadsheet rows as players.
pub async fn import_players(
    state: &SharedState,
    caller: &Caller,
    request: ImportPlayersRequest,
) -> Result<Vec<PlayerSummary>, ServiceError> {
    caller.authorize(Capability::ManageRoster)?;
    let rows = request.players.into_iter().map(Into::into).collect();
    let placeholders = state.config().import_placeholders().clone();

    let summaries = state
        .mutate_league("import_players", |league| {
            let players = league.bulk_import_players(rows, &placeholders)?;
            Ok(players
                .iter()
                .map(|player| summarize(league, player))
                .collect::<Vec<_>>())
        })
        .await?;

    info!(count = summaries.len(), "players imported");
    sse_events::broadcast_players(state, sse_events::EVENT_PLAYER_CREATED, summaries.clone());
    Ok(summaries)
}

fn summarize(league: &League, player: &Player) -> PlayerSummary {
    PlayerSummary::from(league.standing(player))
}

fn announce(state: &SharedState, summary: PlayerSummary) -> PlayerSummary {
    sse_events::broadcast_players(state, sse_events::EVENT_PLAYER_UPDATED, vec![summary.clone()]);
    summary
}
