use serde::{Deserialize, Serialize};

use crate::state::identity::Role;

/// Team document as persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Hex color (e.g. `#1E5CB3`).
    pub color: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Player document. Aggregate counters are computed and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Field position.
    pub position: String,
    /// Shirt number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    /// Portrait URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Team memberships.
    #[serde(default)]
    pub team_ids: Vec<String>,
}

/// Game document with its three lifecycle flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameEntity {
    /// Primary key of the game.
    pub id: String,
    /// Team playing the game.
    pub team_id: String,
    /// Opponent name.
    pub opponent: String,
    /// Game date.
    pub date: String,
    /// Venue.
    pub location: String,
    /// Whether the game has been played.
    pub is_completed: bool,
    /// Whether ballots are accepted.
    pub voting_open: bool,
    /// Whether placement points were recorded.
    pub points_assigned: bool,
    /// Free-form result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Ordered participant ids.
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Placement points of one player for one game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntity {
    /// Primary key (`{gameId}-{playerId}`).
    pub id: String,
    /// Scored game.
    pub game_id: String,
    /// Awarded player.
    pub player_id: String,
    /// 1, 2 or 3.
    pub points: u8,
}

/// Ballot document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteEntity {
    /// Primary key.
    pub id: String,
    /// Game voted on.
    pub game_id: String,
    /// Voting player.
    pub voter_id: String,
    /// Nominee for best fielder.
    #[serde(default)]
    pub best_fielder_id: Option<String>,
    /// Nominee for best batter.
    #[serde(default)]
    pub best_batter_id: Option<String>,
}

/// Club account document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    /// Account identifier.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Optional phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Account role.
    pub role: Role,
    /// Linked player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Full content of a store, as loaded on boot and written by file backends.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeagueSnapshot {
    /// Teams in creation order.
    #[serde(default)]
    pub teams: Vec<TeamEntity>,
    /// Players in creation order.
    #[serde(default)]
    pub players: Vec<PlayerEntity>,
    /// Games in creation order.
    #[serde(default)]
    pub games: Vec<GameEntity>,
    /// Score rows.
    #[serde(default)]
    pub scores: Vec<ScoreEntity>,
    /// Vote rows.
    #[serde(default)]
    pub votes: Vec<VoteEntity>,
    /// Club accounts.
    #[serde(default)]
    pub users: Vec<UserEntity>,
}

/// A single write produced by an engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMutation {
    /// Insert or replace a team.
    UpsertTeam(TeamEntity),
    /// Remove a team by id.
    DeleteTeam(String),
    /// Insert or replace a player.
    UpsertPlayer(PlayerEntity),
    /// Remove a player by id.
    DeletePlayer(String),
    /// Insert or replace a game.
    UpsertGame(GameEntity),
    /// Remove a game by id.
    DeleteGame(String),
    /// Insert or replace a score row.
    UpsertScore(ScoreEntity),
    /// Remove a score row by id.
    DeleteScore(String),
    /// Insert or replace a vote row.
    UpsertVote(VoteEntity),
    /// Remove a vote row by id.
    DeleteVote(String),
    /// Insert or replace an account.
    UpsertUser(UserEntity),
}

impl LeagueSnapshot {
    /// Whether the snapshot holds no data at all.
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
            && self.players.is_empty()
            && self.games.is_empty()
            && self.scores.is_empty()
            && self.votes.is_empty()
            && self.users.is_empty()
    }

    /// Changeset inserting every row of the snapshot, used to seed empty stores.
    pub fn into_mutations(self) -> Vec<StoreMutation> {
        let LeagueSnapshot {
            teams,
            players,
            games,
            scores,
            votes,
            users,
        } = self;

        teams
            .into_iter()
            .map(StoreMutation::UpsertTeam)
            .chain(players.into_iter().map(StoreMutation::UpsertPlayer))
            .chain(games.into_iter().map(StoreMutation::UpsertGame))
            .chain(scores.into_iter().map(StoreMutation::UpsertScore))
            .chain(votes.into_iter().map(StoreMutation::UpsertVote))
            .chain(users.into_iter().map(StoreMutation::UpsertUser))
            .collect()
    }

    /// Apply a mutation in place, keeping insertion order for existing rows.
    pub fn apply(&mut self, mutation: StoreMutation) {
        match mutation {
            StoreMutation::UpsertTeam(team) => upsert(&mut self.teams, team, |t| &t.id),
            StoreMutation::DeleteTeam(id) => self.teams.retain(|t| t.id != id),
            StoreMutation::UpsertPlayer(player) => upsert(&mut self.players, player, |p| &p.id),
            StoreMutation::DeletePlayer(id) => self.players.retain(|p| p.id != id),
            StoreMutation::UpsertGame(game) => upsert(&mut self.games, game, |g| &g.id),
            StoreMutation::DeleteGame(id) => self.games.retain(|g| g.id != id),
            StoreMutation::UpsertScore(score) => upsert(&mut self.scores, score, |s| &s.id),
            StoreMutation::DeleteScore(id) => self.scores.retain(|s| s.id != id),
            StoreMutation::UpsertVote(vote) => upsert(&mut self.votes, vote, |v| &v.id),
            StoreMutation::DeleteVote(id) => self.votes.retain(|v| v.id != id),
            StoreMutation::UpsertUser(user) => upsert(&mut self.users, user, |u| &u.id),
        }
    }
}

fn upsert<T>(rows: &mut Vec<T>, row: T, key: impl Fn(&T) -> &String) {
    match rows.iter().position(|existing| key(existing) == key(&row)) {
        Some(index) => rows[index] = row,
        None => rows.push(row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, name: &str) -> TeamEntity {
        TeamEntity {
            id: id.into(),
            name: name.into(),
            color: "#000000".into(),
            description: None,
            image: None,
        }
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut snapshot = LeagueSnapshot::default();
        snapshot.apply(StoreMutation::UpsertTeam(team("a", "A")));
        snapshot.apply(StoreMutation::UpsertTeam(team("b", "B")));
        snapshot.apply(StoreMutation::UpsertTeam(team("a", "A2")));

        let names: Vec<_> = snapshot.teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A2", "B"]);

        snapshot.apply(StoreMutation::DeleteTeam("a".into()));
        assert_eq!(snapshot.teams.len(), 1);
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn game_document_uses_camel_case() {
        let json = serde_json::json!({
            "id": "1",
            "teamId": "1",
            "opponent": "Yankees",
            "date": "2023-06-01",
            "location": "Home",
            "isCompleted": true,
            "votingOpen": false,
            "pointsAssigned": true,
        });
        let game: GameEntity = serde_json::from_value(json).unwrap();
        assert!(game.is_completed && game.points_assigned);
        assert!(game.participants.is_empty());
        assert_eq!(game.result, None);
    }
}
