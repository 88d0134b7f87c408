pub mod auth_routes;
pub mod game_routes;
pub mod leaderboard_routes;
pub mod user_routes;
