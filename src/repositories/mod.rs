pub mod leaderboard_repository;
pub mod memory_store;
pub mod mongo_store;
pub mod store;
pub mod user_repository;
