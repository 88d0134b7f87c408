pub mod auth_controller;
pub mod game_controller;
pub mod leaderboard_controller;
pub mod user_controller;
