/// Account login, registration and administration.
pub mod auth_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Flat score and ballot exports.
pub mod export_service;
/// Schedule and match-day commands.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Team and player management.
pub mod roster_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Leaderboard projections.
pub mod standings_service;
/// Ballot submission and queries.
pub mod vote_service;
