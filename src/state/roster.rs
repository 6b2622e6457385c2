//! Teams, players and team membership.

use indexmap::IndexSet;
use tracing::debug;

use crate::{
    dao::models::{PlayerEntity, StoreMutation, TeamEntity},
    state::{
        games::ImportPlaceholders,
        league::{League, LeagueError, LeagueResult, PlayerId, TeamId, new_id, require},
    },
};

/// A club team (1st team, U17, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Primary key.
    pub id: TeamId,
    /// Display name.
    pub name: String,
    /// Hex color used by clients.
    pub color: String,
    /// Short description.
    pub description: Option<String>,
    /// Image URL.
    pub image: Option<String>,
}

/// Editable team fields.
#[derive(Debug, Clone, Default)]
pub struct TeamDraft {
    /// Display name; required.
    pub name: String,
    /// Hex color; required.
    pub color: String,
    /// Short description.
    pub description: Option<String>,
    /// Image URL.
    pub image: Option<String>,
}

/// A club member who can play for several teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Primary key.
    pub id: PlayerId,
    /// Full name.
    pub name: String,
    /// Field position.
    pub position: String,
    /// Shirt number.
    pub number: Option<u32>,
    /// Portrait URL.
    pub image: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Teams the player belongs to, in assignment order.
    pub team_ids: IndexSet<TeamId>,
}

/// Editable player profile fields. Membership is edited separately.
#[derive(Debug, Clone, Default)]
pub struct PlayerDraft {
    /// Full name; required.
    pub name: String,
    /// Field position; required.
    pub position: String,
    /// Shirt number.
    pub number: Option<u32>,
    /// Portrait URL.
    pub image: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
}

/// A row of a bulk player import.
#[derive(Debug, Clone, Default)]
pub struct ImportedPlayer {
    /// Full name.
    pub name: Option<String>,
    /// Field position.
    pub position: Option<String>,
    /// Shirt number.
    pub number: Option<u32>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Initial memberships.
    pub team_ids: Vec<TeamId>,
}

impl League {
    /// Every team in creation order.
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    /// Look a team up by id.
    pub fn team(&self, id: &str) -> LeagueResult<&Team> {
        self.teams
            .get(id)
            .ok_or_else(|| LeagueError::not_found("team", id))
    }

    /// Teams matching `ids`; unknown ids are skipped.
    pub fn teams_by_ids<'a>(&'a self, ids: &'a [TeamId]) -> impl Iterator<Item = &'a Team> + 'a {
        ids.iter().filter_map(|id| self.teams.get(id))
    }

    /// Create a team.
    pub fn add_team(&mut self, draft: TeamDraft) -> LeagueResult<Team> {
        let team = build_team(new_id(), draft)?;
        self.save_team(team.clone());
        Ok(team)
    }

    /// Replace a team's fields.
    pub fn update_team(&mut self, id: &str, draft: TeamDraft) -> LeagueResult<Team> {
        self.team(id)?;
        let team = build_team(id.to_string(), draft)?;
        self.save_team(team.clone());
        Ok(team)
    }

    /// Delete a team that no game references, dropping it from every player's memberships.
    pub fn delete_team(&mut self, id: &str) -> LeagueResult<Team> {
        self.team(id)?;
        let scheduled = self.games().filter(|game| game.team_id == id).count();
        if scheduled > 0 {
            return Err(LeagueError::Conflict(format!(
                "team `{id}` still has {scheduled} scheduled game(s)"
            )));
        }

        let members: Vec<Player> = self
            .players
            .values()
            .filter(|player| player.team_ids.contains(id))
            .cloned()
            .collect();
        for mut player in members {
            player.team_ids.shift_remove(id);
            self.save_player(player);
        }

        let team = self
            .teams
            .shift_remove(id)
            .ok_or_else(|| LeagueError::not_found("team", id))?;
        self.record(StoreMutation::DeleteTeam(id.to_string()));
        Ok(team)
    }

    /// Every player in creation order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Look a player up by id.
    pub fn player(&self, id: &str) -> LeagueResult<&Player> {
        self.players
            .get(id)
            .ok_or_else(|| LeagueError::not_found("player", id))
    }

    /// Members of a team.
    pub fn players_by_team(&self, team_id: &str) -> Vec<&Player> {
        self.players
            .values()
            .filter(|player| player.team_ids.contains(team_id))
            .collect()
    }

    /// Create a player without any team membership.
    pub fn add_player(&mut self, draft: PlayerDraft) -> LeagueResult<Player> {
        let player = build_player(new_id(), draft, IndexSet::new())?;
        self.save_player(player.clone());
        Ok(player)
    }

    /// Replace a player's profile, keeping memberships.
    pub fn update_player(&mut self, id: &str, draft: PlayerDraft) -> LeagueResult<Player> {
        let team_ids = self.player(id)?.team_ids.clone();
        let player = build_player(id.to_string(), draft, team_ids)?;
        self.save_player(player.clone());
        Ok(player)
    }

    /// Delete a player and every reference to them: participations, scores and the
    /// nominations naming them. Ballots they cast are kept.
    pub fn delete_player(&mut self, id: &str) -> LeagueResult<Player> {
        let player = self
            .players
            .shift_remove(id)
            .ok_or_else(|| LeagueError::not_found("player", id))?;
        self.record(StoreMutation::DeletePlayer(id.to_string()));

        let played: Vec<_> = self
            .games()
            .filter(|game| game.participants.contains(id))
            .cloned()
            .collect();
        for mut game in played {
            game.participants.shift_remove(id);
            self.save_game(game);
        }

        let scores: Vec<_> = self
            .scores()
            .filter(|score| score.player_id == id)
            .map(|score| score.id.clone())
            .collect();
        for score_id in &scores {
            self.remove_score(score_id);
        }

        let nominating: Vec<_> = self
            .votes()
            .filter(|vote| {
                vote.best_fielder_id.as_deref() == Some(id)
                    || vote.best_batter_id.as_deref() == Some(id)
            })
            .cloned()
            .collect();
        let nominations = nominating.len();
        for mut vote in nominating {
            if vote.best_fielder_id.as_deref() == Some(id) {
                vote.best_fielder_id = None;
            }
            if vote.best_batter_id.as_deref() == Some(id) {
                vote.best_batter_id = None;
            }
            self.record(StoreMutation::UpsertVote(vote.clone().into()));
            self.insert_vote(vote);
        }

        debug!(player_id = %id, scores = scores.len(), nominations, "cascaded player deletion");
        Ok(player)
    }

    /// Add a membership; adding an existing one changes nothing.
    pub fn add_player_to_team(&mut self, player_id: &str, team_id: &str) -> LeagueResult<Player> {
        self.team(team_id)?;
        let mut player = self.player(player_id)?.clone();
        if player.team_ids.insert(team_id.to_string()) {
            self.save_player(player.clone());
        }
        Ok(player)
    }

    /// Drop a membership; dropping a missing one changes nothing.
    pub fn remove_player_from_team(
        &mut self,
        player_id: &str,
        team_id: &str,
    ) -> LeagueResult<Player> {
        let mut player = self.player(player_id)?.clone();
        if player.team_ids.shift_remove(team_id) {
            self.save_player(player.clone());
        }
        Ok(player)
    }

    /// Replace every membership of a player.
    pub fn update_player_teams(
        &mut self,
        player_id: &str,
        team_ids: Vec<TeamId>,
    ) -> LeagueResult<Player> {
        let mut player = self.player(player_id)?.clone();
        for team_id in &team_ids {
            self.team(team_id)?;
        }
        player.team_ids = team_ids.into_iter().collect();
        self.save_player(player.clone());
        Ok(player)
    }

    /// Append imported players, filling missing names and positions with placeholders.
    pub fn bulk_import_players(
        &mut self,
        rows: Vec<ImportedPlayer>,
        placeholders: &ImportPlaceholders,
    ) -> LeagueResult<Vec<Player>> {
        if rows.is_empty() {
            return Err(LeagueError::Validation("import batch is empty".into()));
        }
        let mut players = Vec::with_capacity(rows.len());
        for row in rows {
            for team_id in &row.team_ids {
                self.team(team_id)?;
            }
            players.push(Player {
                id: new_id(),
                name: filled(row.name).unwrap_or_else(|| placeholders.player_name.clone()),
                position: filled(row.position).unwrap_or_else(|| placeholders.position.clone()),
                number: row.number,
                image: None,
                email: filled(row.email),
                phone: filled(row.phone),
                team_ids: row.team_ids.into_iter().collect(),
            });
        }

        for player in &players {
            self.save_player(player.clone());
        }
        Ok(players)
    }

    fn save_team(&mut self, team: Team) {
        self.record(StoreMutation::UpsertTeam(team.clone().into()));
        self.teams.insert(team.id.clone(), team);
    }

    fn save_player(&mut self, player: Player) {
        self.record(StoreMutation::UpsertPlayer(player.clone().into()));
        self.players.insert(player.id.clone(), player);
    }
}

fn build_team(id: TeamId, draft: TeamDraft) -> LeagueResult<Team> {
    require("team name", &draft.name)?;
    require("team color", &draft.color)?;
    Ok(Team {
        id,
        name: draft.name,
        color: draft.color,
        description: filled(draft.description),
        image: filled(draft.image),
    })
}

fn build_player(id: PlayerId, draft: PlayerDraft, team_ids: IndexSet<TeamId>) -> LeagueResult<Player> {
    require("player name", &draft.name)?;
    require("position", &draft.position)?;
    Ok(Player {
        id,
        name: draft.name,
        position: draft.position,
        number: draft.number,
        image: filled(draft.image),
        email: filled(draft.email),
        phone: filled(draft.phone),
        team_ids,
    })
}

fn filled(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl From<TeamEntity> for Team {
    fn from(value: TeamEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            color: value.color,
            description: value.description,
            image: value.image,
        }
    }
}

impl From<Team> for TeamEntity {
    fn from(value: Team) -> Self {
        Self {
            id: value.id,
            name: value.name,
            color: value.color,
            description: value.description,
            image: value.image,
        }
    }
}

impl From<PlayerEntity> for Player {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            position: value.position,
            number: value.number,
            image: value.image,
            email: value.email,
            phone: value.phone,
            team_ids: value.team_ids.into_iter().collect(),
        }
    }
}

impl From<Player> for PlayerEntity {
    fn from(value: Player) -> Self {
        Self {
            id: value.id,
            name: value.name,
            position: value.position,
            number: value.number,
            image: value.image,
            email: value.email,
            phone: value.phone,
            team_ids: value.team_ids.into_iter().collect(),
        }
    }
}
