use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Dugout Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::auth::login,
        crate::routes::auth::register,
        crate::routes::auth::list_users,
        crate::routes::auth::get_user,
        crate::routes::auth::update_profile,
        crate::routes::auth::set_role,
        crate::routes::auth::link_player,
        crate::routes::teams::list_teams,
        crate::routes::teams::get_team,
        crate::routes::teams::team_players,
        crate::routes::teams::team_games,
        crate::routes::teams::create_team,
        crate::routes::teams::update_team,
        crate::routes::teams::delete_team,
        crate::routes::players::list_players,
        crate::routes::players::get_player,
        crate::routes::players::player_games,
        crate::routes::players::create_player,
        crate::routes::players::import_players,
        crate::routes::players::update_player,
        crate::routes::players::delete_player,
        crate::routes::players::update_player_teams,
        crate::routes::players::add_player_to_team,
        crate::routes::players::remove_player_from_team,
        crate::routes::games::list_games,
        crate::routes::games::get_game,
        crate::routes::games::create_game,
        crate::routes::games::import_games,
        crate::routes::games::update_game,
        crate::routes::games::delete_game,
        crate::routes::games::complete_game,
        crate::routes::games::open_voting,
        crate::routes::games::close_voting,
        crate::routes::games::participants,
        crate::routes::games::update_participants,
        crate::routes::games::scores,
        crate::routes::games::assign_points,
        crate::routes::games::list_votes,
        crate::routes::games::submit_vote,
        crate::routes::games::my_vote,
        crate::routes::standings::leaderboard,
        crate::routes::exports::export_scores,
        crate::routes::exports::export_votes,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::auth::LoginRequest,
            crate::dto::auth::RegisterRequest,
            crate::dto::auth::UserSummary,
            crate::dto::auth::RoleRequest,
            crate::dto::auth::UpdateProfileRequest,
            crate::dto::auth::LinkPlayerRequest,
            crate::dto::roster::TeamRequest,
            crate::dto::roster::TeamSummary,
            crate::dto::roster::PlayerRequest,
            crate::dto::roster::PlayerSummary,
            crate::dto::roster::PlayerTeamsRequest,
            crate::dto::roster::ImportPlayersRequest,
            crate::dto::roster::ImportPlayerRow,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::UpdateGameRequest,
            crate::dto::game::ImportGamesRequest,
            crate::dto::game::ImportGameRow,
            crate::dto::game::GameSummary,
            crate::dto::game::ParticipantsPayload,
            crate::dto::game::AssignPointsRequest,
            crate::dto::game::PointsEntryInput,
            crate::dto::game::ScoreSummary,
            crate::dto::game::BallotRequest,
            crate::dto::game::VoteSummary,
            crate::dto::game::MyVoteResponse,
            crate::dto::standings::LeaderboardEntry,
            crate::dto::export::ScoreExportRow,
            crate::dto::export::VoteExportRow,
            crate::dto::sse::Handshake,
            crate::dto::sse::GameChangedEvent,
            crate::dto::sse::GameDeletedEvent,
            crate::dto::sse::GamesImportedEvent,
            crate::dto::sse::VoteSubmittedEvent,
            crate::dto::sse::PointsAssignedEvent,
            crate::dto::sse::TeamChangedEvent,
            crate::dto::sse::TeamDeletedEvent,
            crate::dto::sse::PlayersChangedEvent,
            crate::dto::sse::PlayerDeletedEvent,
            crate::state::phase::GamePhase,
            crate::state::identity::Role,
            crate::state::standings::Metric,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "auth", description = "Mock login and account administration"),
        (name = "teams", description = "Club teams"),
        (name = "players", description = "Roster players and memberships"),
        (name = "games", description = "Schedule and match-day lifecycle"),
        (name = "votes", description = "Best fielder / best batter ballots"),
        (name = "standings", description = "Points and vote leaderboards"),
        (name = "exports", description = "Flat exports for reporting"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route_family() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/auth/login",
            "/users/{id}",
            "/teams/{id}",
            "/players/{id}/teams/{team_id}",
            "/games/{id}/votes/mine",
            "/leaderboard",
            "/exports/votes",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
