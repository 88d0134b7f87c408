pub const USERS_COLL_NAME: &str = "users";
pub const LEADERBOARD_COLL_NAME: &str = "leaderboard";

pub const DEFAULT_DB_NAME: &str = "minesweeper";
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_CLIENT_ORIGIN: &str = "http://localhost:3000";

pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
pub const DEFAULT_LEADERBOARD_SKIP: i64 = 0;

pub const REGISTERED_TOKEN_TTL_HOURS: i64 = 24 * 7;
pub const GUEST_TOKEN_TTL_HOURS: i64 = 24;

pub const GUEST_NAME_PREFIX: &str = "Guest_";
pub const GUEST_NAME_ID_CHARS: usize = 6;

pub const DEFAULT_GUEST_RETENTION_DAYS: i64 = 30;
pub const MAX_GUEST_RETENTION_DAYS: i64 = 36_500;
pub const DEFAULT_GUEST_SWEEP_INTERVAL_SECS: u64 = 3600;

pub const RECORD_SAVED_MESSAGE: &str = "Game record saved successfully";
