//! Game lifecycle commands: scheduling, completion, voting window, participants and points.

use std::collections::HashSet;

use indexmap::IndexSet;
use tracing::debug;

use crate::{
    dao::models::StoreMutation,
    state::{
        league::{
            Game, League, LeagueError, LeagueResult, Placement, PlayerId, Score, TeamId,
            new_id, require,
        },
        phase::{GameEvent, PhaseFlags},
    },
};

/// Fields required to schedule a game.
#[derive(Debug, Clone)]
pub struct NewGame {
    /// Club team playing.
    pub team_id: TeamId,
    /// Opponent name.
    pub opponent: String,
    /// Game date.
    pub date: String,
    /// Venue.
    pub location: String,
}

/// Editable schedule fields of an existing game.
#[derive(Debug, Clone)]
pub struct GameDetails {
    /// Club team playing.
    pub team_id: TeamId,
    /// Opponent name.
    pub opponent: String,
    /// Game date.
    pub date: String,
    /// Venue.
    pub location: String,
    /// Free-form result.
    pub result: Option<String>,
}

/// A row of a bulk game import; every field is optional.
#[derive(Debug, Clone, Default)]
pub struct ImportedGame {
    /// Club team playing; required.
    pub team_id: Option<TeamId>,
    /// Opponent name.
    pub opponent: Option<String>,
    /// Game date.
    pub date: Option<String>,
    /// Venue.
    pub location: Option<String>,
}

/// Placeholder values used when an import row omits a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlaceholders {
    /// Opponent used for rows without one.
    pub opponent: String,
    /// Location used for rows without one.
    pub location: String,
    /// Name used for player rows without one.
    pub player_name: String,
    /// Position used for player rows without one.
    pub position: String,
}

impl Default for ImportPlaceholders {
    fn default() -> Self {
        Self {
            opponent: "Unknown Opponent".into(),
            location: "Unknown Location".into(),
            player_name: "Unknown Player".into(),
            position: "Unknown Position".into(),
        }
    }
}

/// One line of a points assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsEntry {
    /// Awarded player.
    pub player_id: PlayerId,
    /// Raw points value; must be 1, 2 or 3.
    pub points: u8,
}

impl League {
    /// Schedule a new game in the upcoming phase with no participants.
    pub fn add_game(&mut self, input: NewGame) -> LeagueResult<Game> {
        let NewGame {
            team_id,
            opponent,
            date,
            location,
        } = input;

        require("team id", &team_id)?;
        require("opponent", &opponent)?;
        require("date", &date)?;
        require("location", &location)?;
        self.team(&team_id)?;

        let game = Game {
            id: new_id(),
            team_id,
            opponent,
            date,
            location,
            result: None,
            flags: PhaseFlags::default(),
            participants: IndexSet::new(),
        };
        self.save_game(game.clone());
        Ok(game)
    }

    /// Edit the schedule fields of a game. Lifecycle flags are left untouched.
    pub fn update_game(&mut self, id: &str, details: GameDetails) -> LeagueResult<Game> {
        let GameDetails {
            team_id,
            opponent,
            date,
            location,
            result,
        } = details;

        require("team id", &team_id)?;
        require("opponent", &opponent)?;
        require("date", &date)?;
        require("location", &location)?;
        self.team(&team_id)?;

        let mut game = self.game(id)?.clone();
        game.team_id = team_id;
        game.opponent = opponent;
        game.date = date;
        game.location = location;
        game.result = result.filter(|value| !value.trim().is_empty());

        self.save_game(game.clone());
        Ok(game)
    }

    /// Delete a game together with all of its scores and votes.
    pub fn delete_game(&mut self, id: &str) -> LeagueResult<Game> {
        let game = self
            .games
            .shift_remove(id)
            .ok_or_else(|| LeagueError::not_found("game", id))?;

        let scores = self.clear_scores(id).len();
        let votes = self.clear_votes(id);
        self.record(StoreMutation::DeleteGame(id.to_string()));
        debug!(game_id = %id, scores, votes, "cascaded game deletion");

        Ok(game)
    }

    /// Mark a game as played. Completing an already completed game changes nothing.
    pub fn complete_game(&mut self, id: &str) -> LeagueResult<Game> {
        self.transition(id, GameEvent::Complete)
    }

    /// Open the voting window of a completed game.
    pub fn open_voting(&mut self, id: &str) -> LeagueResult<Game> {
        self.transition(id, GameEvent::OpenVoting)
    }

    /// Close the voting window.
    pub fn close_voting(&mut self, id: &str) -> LeagueResult<Game> {
        self.transition(id, GameEvent::CloseVoting)
    }

    /// Replace the participant list. Duplicates collapse onto their first occurrence.
    pub fn update_participants(
        &mut self,
        id: &str,
        player_ids: Vec<PlayerId>,
    ) -> LeagueResult<Game> {
        let mut game = self.game(id)?.clone();
        for player_id in &player_ids {
            self.player(player_id)?;
        }

        game.participants = player_ids.into_iter().collect();
        self.save_game(game.clone());
        Ok(game)
    }

    /// Participants of a game in selection order.
    pub fn participants(&self, id: &str) -> LeagueResult<Vec<PlayerId>> {
        Ok(self.game(id)?.participants.iter().cloned().collect())
    }

    /// Replace every score of a completed game with `entries` and flag points as assigned.
    ///
    /// Each placement can be held by one player and each player can hold one placement.
    /// An empty list is accepted and still marks the game as scored.
    pub fn assign_points(&mut self, id: &str, entries: Vec<PointsEntry>) -> LeagueResult<Vec<Score>> {
        let mut game = self.game(id)?.clone();
        game.flags = game.flags.apply(GameEvent::AssignPoints)?;

        let mut placements = HashSet::new();
        let mut awarded = HashSet::new();
        let mut scores = Vec::with_capacity(entries.len());
        for PointsEntry { player_id, points } in entries {
            let placement = Placement::try_from(points)?;
            if !placements.insert(placement) {
                return Err(LeagueError::Conflict(format!(
                    "{points} points can only be awarded to one player"
                )));
            }
            if !awarded.insert(player_id.clone()) {
                return Err(LeagueError::Conflict(format!(
                    "player `{player_id}` is listed more than once"
                )));
            }
            self.ensure_eligible(&game, &player_id)?;

            scores.push(Score {
                id: format!("{id}-{player_id}"),
                game_id: id.to_string(),
                player_id,
                placement,
            });
        }

        self.clear_scores(id);
        for score in &scores {
            self.record(StoreMutation::UpsertScore(score.clone().into()));
            self.insert_score(score.clone());
        }
        self.save_game(game);

        Ok(scores)
    }

    /// Scores recorded for a game, best placement first.
    pub fn scores_for_game(&self, id: &str) -> LeagueResult<Vec<&Score>> {
        self.game(id)?;
        let mut scores: Vec<&Score> = self
            .scores_by_game
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|score_id| self.scores.get(score_id))
            .collect();
        scores.sort_by_key(|score| std::cmp::Reverse(score.placement.points()));
        Ok(scores)
    }

    /// Games scheduled for a team.
    pub fn games_by_team(&self, team_id: &str) -> Vec<&Game> {
        self.games
            .values()
            .filter(|game| game.team_id == team_id)
            .collect()
    }

    /// Games a player took part in.
    pub fn games_by_player(&self, player_id: &str) -> Vec<&Game> {
        self.games
            .values()
            .filter(|game| game.participants.contains(player_id))
            .collect()
    }

    /// Append imported games. Every imported game starts upcoming with no participants,
    /// whatever the source row says; rows without a team reject the whole batch.
    pub fn bulk_import_games(
        &mut self,
        rows: Vec<ImportedGame>,
        placeholders: &ImportPlaceholders,
        now: &str,
    ) -> LeagueResult<Vec<Game>> {
        if rows.is_empty() {
            return Err(LeagueError::Validation("import batch is empty".into()));
        }
        let mut games = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let team_id = non_empty(row.team_id).ok_or_else(|| {
                LeagueError::Validation(format!("import row {} has no team id", index + 1))
            })?;
            self.team(&team_id)?;

            games.push(Game {
                id: new_id(),
                team_id,
                opponent: non_empty(row.opponent).unwrap_or_else(|| placeholders.opponent.clone()),
                date: non_empty(row.date).unwrap_or_else(|| now.to_string()),
                location: non_empty(row.location)
                    .unwrap_or_else(|| placeholders.location.clone()),
                result: None,
                flags: PhaseFlags::default(),
                participants: IndexSet::new(),
            });
        }

        for game in &games {
            self.save_game(game.clone());
        }
        Ok(games)
    }

    fn transition(&mut self, id: &str, event: GameEvent) -> LeagueResult<Game> {
        let game = self.game_mut(id)?;
        let next = game.flags.apply(event)?;
        if next == game.flags {
            return Ok(game.clone());
        }

        game.flags = next;
        let game = game.clone();
        self.save_game(game.clone());
        Ok(game)
    }

    /// Players eligible for points or nominations: the participants when any were recorded,
    /// the whole roster otherwise.
    pub(super) fn ensure_eligible(&self, game: &Game, player_id: &str) -> LeagueResult<()> {
        self.player(player_id)?;
        if !game.participants.is_empty() && !game.participants.contains(player_id) {
            return Err(LeagueError::Conflict(format!(
                "player `{player_id}` did not take part in game `{}`",
                game.id
            )));
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
