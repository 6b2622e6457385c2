//! Built-in demo club loaded into empty stores.

use crate::{
    dao::models::{
        GameEntity, LeagueSnapshot, PlayerEntity, ScoreEntity, TeamEntity, UserEntity, VoteEntity,
    },
    state::identity::Role,
};

const TEAMS: &[(&str, &str, &str, &str)] = &[
    ("1", "1st Team", "Premier division team", "#1E5CB3"),
    ("2", "2nd Team", "Reserve team", "#3A7AC8"),
    ("3", "3rd Team", "Development team", "#5696DE"),
    ("4", "Womens Blue", "Women's first team", "#0D47A1"),
    ("5", "Womens Red", "Women's second team", "#E63946"),
    ("6", "U17", "Under 17 youth team", "#F9A826"),
    ("7", "U15", "Under 15 youth team", "#2A9D8F"),
    ("8", "U13", "Under 13 youth team", "#6A4C93"),
];

const PLAYERS: &[(&str, &str, &str, u32, &[&str])] = &[
    ("1", "Mike Trout", "Outfield", 27, &["1", "2"]),
    ("2", "Aaron Judge", "Outfield", 99, &["1"]),
    ("3", "Shohei Ohtani", "Pitcher/DH", 17, &["1"]),
    ("4", "Mookie Betts", "Outfield", 50, &["2"]),
    ("5", "Fernando Tatis Jr.", "Shortstop", 23, &["1", "3"]),
    ("6", "Jessica Martinez", "Pitcher", 14, &["4"]),
    ("7", "Sarah Johnson", "Catcher", 22, &["4", "5"]),
    ("8", "Tyler Williams", "First Base", 34, &["6"]),
    ("9", "Emma Davis", "Second Base", 7, &["5"]),
    ("10", "Jake Thompson", "Third Base", 12, &["7"]),
];

struct SeedGame {
    id: &'static str,
    team_id: &'static str,
    date: &'static str,
    opponent: &'static str,
    location: &'static str,
    result: Option<&'static str>,
    flags: (bool, bool, bool),
    participants: &'static [&'static str],
}

const GAMES: &[SeedGame] = &[
    SeedGame {
        id: "1",
        team_id: "1",
        date: "2023-06-01",
        opponent: "Yankees",
        location: "Home",
        result: Some("W 5-3"),
        flags: (true, false, true),
        participants: &["1", "2", "3", "4", "5"],
    },
    SeedGame {
        id: "2",
        team_id: "1",
        date: "2023-06-08",
        opponent: "Red Sox",
        location: "Away",
        result: Some("L 2-4"),
        flags: (true, false, true),
        participants: &["1", "3", "4", "5"],
    },
    SeedGame {
        id: "3",
        team_id: "1",
        date: "2023-06-15",
        opponent: "Cubs",
        location: "Home",
        result: Some("W 7-2"),
        flags: (true, true, false),
        participants: &["1", "2", "3", "5"],
    },
    SeedGame {
        id: "4",
        team_id: "1",
        date: "2023-06-22",
        opponent: "Dodgers",
        location: "Away",
        result: None,
        flags: (false, false, false),
        participants: &[],
    },
    SeedGame {
        id: "5",
        team_id: "1",
        date: "2023-06-29",
        opponent: "Giants",
        location: "Home",
        result: None,
        flags: (false, false, false),
        participants: &[],
    },
    SeedGame {
        id: "6",
        team_id: "4",
        date: "2023-06-05",
        opponent: "Marlins",
        location: "Home",
        result: Some("W 4-2"),
        flags: (true, false, true),
        participants: &["6", "7", "9"],
    },
    SeedGame {
        id: "7",
        team_id: "4",
        date: "2023-06-12",
        opponent: "Cardinals",
        location: "Away",
        result: Some("L 1-3"),
        flags: (true, false, true),
        participants: &["6", "7", "9"],
    },
    SeedGame {
        id: "8",
        team_id: "4",
        date: "2023-06-19",
        opponent: "Braves",
        location: "Home",
        result: None,
        flags: (false, false, false),
        participants: &[],
    },
];

const SCORES: &[(&str, &str, u8)] = &[
    ("1", "3", 3),
    ("1", "1", 2),
    ("1", "5", 1),
    ("2", "2", 3),
    ("2", "3", 2),
    ("2", "4", 1),
];

/// `(game, voter, best fielder, best batter)`.
const VOTES: &[(&str, &str, &str, &str)] = &[
    ("1", "1", "3", "1"),
    ("1", "2", "3", "5"),
    ("1", "3", "5", "1"),
    ("1", "4", "3", "1"),
    ("1", "5", "3", "1"),
    ("2", "1", "4", "2"),
    ("2", "2", "4", "2"),
    ("2", "3", "4", "3"),
    ("2", "4", "1", "2"),
    ("2", "5", "4", "2"),
];

const USERS: &[(&str, &str, &str, Role, Option<&str>, &str)] = &[
    ("1", "admin@baseball.com", "Admin User", Role::MasterAdmin, None, "2023-01-01T00:00:00.000Z"),
    ("2", "manager@baseball.com", "Team Manager", Role::Manager, None, "2023-01-02T00:00:00.000Z"),
    ("3", "mike@baseball.com", "Mike Trout", Role::Player, Some("1"), "2023-01-03T00:00:00.000Z"),
    ("4", "aaron@baseball.com", "Aaron Judge", Role::Player, Some("2"), "2023-01-04T00:00:00.000Z"),
];

/// Demo club: eight teams, ten players, eight games with their scores, ballots and accounts.
pub fn snapshot() -> LeagueSnapshot {
    LeagueSnapshot {
        teams: TEAMS
            .iter()
            .map(|&(id, name, description, color)| TeamEntity {
                id: id.into(),
                name: name.into(),
                color: color.into(),
                description: Some(description.into()),
                image: None,
            })
            .collect(),
        players: PLAYERS
            .iter()
            .map(|&(id, name, position, number, teams)| PlayerEntity {
                id: id.into(),
                name: name.into(),
                position: position.into(),
                number: Some(number),
                image: None,
                email: None,
                phone: None,
                team_ids: teams.iter().map(|team| team.to_string()).collect(),
            })
            .collect(),
        games: GAMES
            .iter()
            .map(|game| {
                let (is_completed, voting_open, points_assigned) = game.flags;
                GameEntity {
                    id: game.id.into(),
                    team_id: game.team_id.into(),
                    opponent: game.opponent.into(),
                    date: game.date.into(),
                    location: game.location.into(),
                    is_completed,
                    voting_open,
                    points_assigned,
                    result: game.result.map(Into::into),
                    participants: game.participants.iter().map(|p| p.to_string()).collect(),
                }
            })
            .collect(),
        scores: SCORES
            .iter()
            .map(|&(game_id, player_id, points)| ScoreEntity {
                id: format!("{game_id}-{player_id}"),
                game_id: game_id.into(),
                player_id: player_id.into(),
                points,
            })
            .collect(),
        votes: VOTES
            .iter()
            .map(|&(game_id, voter_id, fielder, batter)| VoteEntity {
                id: format!("{game_id}-{voter_id}"),
                game_id: game_id.into(),
                voter_id: voter_id.into(),
                best_fielder_id: Some(fielder.into()),
                best_batter_id: Some(batter.into()),
            })
            .collect(),
        users: USERS
            .iter()
            .map(|&(id, email, name, role, player_id, created_at)| UserEntity {
                id: id.into(),
                email: email.into(),
                name: name.into(),
                phone: None,
                role,
                player_id: player_id.map(Into::into),
                created_at: created_at.into(),
            })
            .collect(),
    }
}
