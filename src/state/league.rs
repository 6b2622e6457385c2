//! In-memory league engine owning every team, player, game, score and vote.
//!
//! Commands live in the sibling modules (`games`, `votes`, `roster`, `standings`) as further
//! `impl League` blocks. Each mutating command appends the storage mutations it performed to
//! an internal journal; the service layer drains it with [`League::take_changes`] and commits
//! the whole changeset in one storage call.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    dao::models::{GameEntity, LeagueSnapshot, ScoreEntity, StoreMutation, VoteEntity},
    state::{
        phase::{GamePhase, InvalidTransition, PhaseFlags},
        roster::{Player, Team},
    },
};

/// Identifier of a team.
pub type TeamId = String;
/// Identifier of a player.
pub type PlayerId = String;
/// Identifier of a game.
pub type GameId = String;
/// Identifier of a score row (`{game_id}-{player_id}`).
pub type ScoreId = String;
/// Identifier of a vote row (`{game_id}-{voter_id}` when created by the engine).
pub type VoteId = String;

/// Result alias for engine commands.
pub type LeagueResult<T> = Result<T, LeagueError>;

/// Errors raised by engine commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeagueError {
    /// A required field is missing or malformed.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A referenced entity does not exist.
    #[error("{kind} `{id}` not found")]
    NotFound {
        /// Entity kind (`game`, `player`, ...).
        kind: &'static str,
        /// Identifier that failed to resolve.
        id: String,
    },
    /// The command is illegal in the current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The caller's role does not allow the command.
    #[error("forbidden: {0}")]
    Forbidden(String),
}

impl LeagueError {
    /// Shorthand for [`LeagueError::NotFound`].
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        LeagueError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl From<InvalidTransition> for LeagueError {
    fn from(err: InvalidTransition) -> Self {
        LeagueError::Conflict(err.to_string())
    }
}

/// A scheduled or played match against an opponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// Primary key.
    pub id: GameId,
    /// Club team playing the game.
    pub team_id: TeamId,
    /// Opponent name.
    pub opponent: String,
    /// Game date as entered by the admin (ISO 8601).
    pub date: String,
    /// Venue.
    pub location: String,
    /// Free-form result such as `W 5-3`.
    pub result: Option<String>,
    /// Lifecycle flags.
    pub flags: PhaseFlags,
    /// Players who took part, in selection order.
    pub participants: IndexSet<PlayerId>,
}

impl Game {
    /// Current lifecycle phase.
    pub fn phase(&self) -> GamePhase {
        self.flags.phase()
    }
}

/// Placement points awarded to the top three performers of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Best performer, 3 points.
    First,
    /// Runner-up, 2 points.
    Second,
    /// Third place, 1 point.
    Third,
}

impl Placement {
    /// Points carried by this placement.
    pub fn points(self) -> u8 {
        match self {
            Placement::First => 3,
            Placement::Second => 2,
            Placement::Third => 1,
        }
    }
}

impl TryFrom<u8> for Placement {
    type Error = LeagueError;

    fn try_from(points: u8) -> Result<Self, Self::Error> {
        match points {
            3 => Ok(Placement::First),
            2 => Ok(Placement::Second),
            1 => Ok(Placement::Third),
            other => Err(LeagueError::Validation(format!(
                "points must be 1, 2 or 3 (got {other})"
            ))),
        }
    }
}

/// Points awarded to one player for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Primary key.
    pub id: ScoreId,
    /// Game the points belong to.
    pub game_id: GameId,
    /// Awarded player.
    pub player_id: PlayerId,
    /// Placement (3/2/1 points).
    pub placement: Placement,
}

/// A player's ballot for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    /// Primary key, preserved across edits.
    pub id: VoteId,
    /// Game voted on.
    pub game_id: GameId,
    /// Voting player (or account for identity-only callers).
    pub voter_id: String,
    /// Nominee for best fielder.
    pub best_fielder_id: Option<PlayerId>,
    /// Nominee for best batter.
    pub best_batter_id: Option<PlayerId>,
}

/// Aggregate state of the club: roster plus every game, score and vote.
#[derive(Debug, Clone, Default)]
pub struct League {
    pub(super) teams: IndexMap<TeamId, Team>,
    pub(super) players: IndexMap<PlayerId, Player>,
    pub(super) games: IndexMap<GameId, Game>,
    pub(super) scores: IndexMap<ScoreId, Score>,
    pub(super) scores_by_game: HashMap<GameId, IndexSet<ScoreId>>,
    pub(super) votes: IndexMap<VoteId, Vote>,
    pub(super) ballots: HashMap<(GameId, String), VoteId>,
    journal: Vec<StoreMutation>,
}

impl League {
    /// Create an empty league.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the engine from persisted collections.
    pub fn restore(snapshot: LeagueSnapshot) -> LeagueResult<Self> {
        let LeagueSnapshot {
            teams,
            players,
            games,
            scores,
            votes,
            users: _,
        } = snapshot;

        let mut league = League::new();
        league.teams = teams
            .into_iter()
            .map(|team| (team.id.clone(), team.into()))
            .collect();
        league.players = players
            .into_iter()
            .map(|player| (player.id.clone(), player.into()))
            .collect();
        league.games = games
            .into_iter()
            .map(|game| (game.id.clone(), game.into()))
            .collect();
        for score in scores {
            let score = Score::try_from(score)?;
            league.insert_score(score);
        }
        for vote in votes {
            league.insert_vote(vote.into());
        }

        Ok(league)
    }

    /// Drain the mutations recorded since the last call.
    pub fn take_changes(&mut self) -> Vec<StoreMutation> {
        std::mem::take(&mut self.journal)
    }

    /// Every game in insertion order.
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.games.values()
    }

    /// Look a game up by id.
    pub fn game(&self, id: &str) -> LeagueResult<&Game> {
        self.games
            .get(id)
            .ok_or_else(|| LeagueError::not_found("game", id))
    }

    /// Every score row.
    pub fn scores(&self) -> impl Iterator<Item = &Score> {
        self.scores.values()
    }

    /// Every vote row.
    pub fn votes(&self) -> impl Iterator<Item = &Vote> {
        self.votes.values()
    }

    pub(super) fn record(&mut self, mutation: StoreMutation) {
        self.journal.push(mutation);
    }

    pub(super) fn game_mut(&mut self, id: &str) -> LeagueResult<&mut Game> {
        self.games
            .get_mut(id)
            .ok_or_else(|| LeagueError::not_found("game", id))
    }

    pub(super) fn save_game(&mut self, game: Game) {
        self.record(StoreMutation::UpsertGame(game.clone().into()));
        self.games.insert(game.id.clone(), game);
    }

    pub(super) fn insert_score(&mut self, score: Score) {
        self.scores_by_game
            .entry(score.game_id.clone())
            .or_default()
            .insert(score.id.clone());
        self.scores.insert(score.id.clone(), score);
    }

    /// Remove every score of a game, recording the deletions.
    pub(super) fn clear_scores(&mut self, game_id: &str) -> Vec<Score> {
        let ids = self.scores_by_game.remove(game_id).unwrap_or_default();
        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(score) = self.scores.shift_remove(&id) {
                self.record(StoreMutation::DeleteScore(id));
                removed.push(score);
            }
        }
        removed
    }

    pub(super) fn remove_score(&mut self, id: &str) -> Option<Score> {
        let score = self.scores.shift_remove(id)?;
        if let Some(ids) = self.scores_by_game.get_mut(&score.game_id) {
            ids.shift_remove(id);
        }
        self.record(StoreMutation::DeleteScore(id.to_string()));
        Some(score)
    }

    pub(super) fn insert_vote(&mut self, vote: Vote) {
        self.ballots
            .insert((vote.game_id.clone(), vote.voter_id.clone()), vote.id.clone());
        self.votes.insert(vote.id.clone(), vote);
    }

    /// Remove every vote of a game, recording the deletions.
    pub(super) fn clear_votes(&mut self, game_id: &str) -> usize {
        let ids: Vec<VoteId> = self
            .votes
            .values()
            .filter(|vote| vote.game_id == game_id)
            .map(|vote| vote.id.clone())
            .collect();
        for id in &ids {
            if let Some(vote) = self.votes.shift_remove(id) {
                self.ballots.remove(&(vote.game_id, vote.voter_id));
                self.record(StoreMutation::DeleteVote(id.clone()));
            }
        }
        ids.len()
    }
}

/// Fresh identifier for entities created by the engine.
pub(super) fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Reject empty or whitespace-only required fields.
pub(super) fn require(field: &str, value: &str) -> LeagueResult<()> {
    if value.trim().is_empty() {
        Err(LeagueError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

impl From<GameEntity> for Game {
    fn from(value: GameEntity) -> Self {
        Self {
            id: value.id,
            team_id: value.team_id,
            opponent: value.opponent,
            date: value.date,
            location: value.location,
            result: value.result,
            flags: PhaseFlags {
                is_completed: value.is_completed,
                voting_open: value.voting_open,
                points_assigned: value.points_assigned,
            },
            participants: value.participants.into_iter().collect(),
        }
    }
}

impl From<Game> for GameEntity {
    fn from(value: Game) -> Self {
        Self {
            id: value.id,
            team_id: value.team_id,
            opponent: value.opponent,
            date: value.date,
            location: value.location,
            result: value.result,
            is_completed: value.flags.is_completed,
            voting_open: value.flags.voting_open,
            points_assigned: value.flags.points_assigned,
            participants: value.participants.into_iter().collect(),
        }
    }
}

impl TryFrom<ScoreEntity> for Score {
    type Error = LeagueError;

    fn try_from(value: ScoreEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            placement: Placement::try_from(value.points)?,
            id: value.id,
            game_id: value.game_id,
            player_id: value.player_id,
        })
    }
}

impl From<Score> for ScoreEntity {
    fn from(value: Score) -> Self {
        Self {
            id: value.id,
            game_id: value.game_id,
            player_id: value.player_id,
            points: value.placement.points(),
        }
    }
}

impl From<VoteEntity> for Vote {
    fn from(value: VoteEntity) -> Self {
        Self {
            id: value.id,
            game_id: value.game_id,
            voter_id: value.voter_id,
            best_fielder_id: value.best_fielder_id,
            best_batter_id: value.best_batter_id,
        }
    }
}

impl From<Vote> for VoteEntity {
    fn from(value: Vote) -> Self {
        Self {
            id: value.id,
            game_id: value.game_id,
            voter_id: value.voter_id,
            best_fielder_id: value.best_fielder_id,
            best_batter_id: value.best_batter_id,
        }
    }
}
