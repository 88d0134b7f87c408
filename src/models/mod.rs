pub mod game;
pub mod identity;
pub mod leaderboard;
pub mod user;
