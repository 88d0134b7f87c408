pub mod api_response;
pub mod auth;
pub mod game;
pub mod leaderboard;
