use crate::errors::{AppError, StoreContext};
use crate::models::game::{GameResult, GameType};
use crate::models::identity::Identity;
use crate::models::leaderboard::LeaderboardEntry;
use crate::repositories::leaderboard_repository::{
    count_entries, delete_guest_entries_before, fetch_guest_entries, fetch_top_entries,
};
use crate::repositories::store::DocumentStore;
use crate::repositories::user_repository::fetch_user_by_id;
use chrono::{Duration, Utc};
use std::sync::Arc;

pub struct LeaderboardPage {
    pub entries: Vec<LeaderboardEntry>,
    pub total: u64,
}

/// Ranked slice of the leaderboard for one game type, best score first.
pub async fn top_n(
    store: &dyn DocumentStore,
    game_type: GameType,
    limit: i64,
    skip: u64,
) -> Result<LeaderboardPage, AppError> {
    let entries = fetch_top_entries(store, game_type, limit, skip)
        .await
        .context("Failed to retrieve leaderboard")?;

    let total = count_entries(store, game_type)
        .await
        .context("Failed to count leaderboard entries")?;

    Ok(LeaderboardPage { entries, total })
}

pub async fn history_for(
    store: &dyn DocumentStore,
    identity: &Identity,
    game_type: Option<GameType>,
) -> Result<Vec<GameResult>, AppError> {
    match identity {
        Identity::Guest { id } => {
            let entries = fetch_guest_entries(store, id, game_type)
                .await
                .context("Failed to retrieve guest records")?;

            Ok(entries.iter().map(LeaderboardEntry::to_result).collect())
        }
        Identity::Registered { id } => {
            let user = fetch_user_by_id(store, id)
                .await
                .context("Failed to retrieve user")?
                .ok_or_else(AppError::user_not_found)?;

            Ok(user.personal_bests().records(game_type))
        }
    }
}

/// Drops guest entries not improved within `retention`.
pub async fn prune_stale_guest_entries(
    store: &dyn DocumentStore,
    retention: Duration,
) -> Result<u64, AppError> {
    let cutoff = Utc::now()
        .checked_sub_signed(retention)
        .ok_or_else(|| AppError::Internal("Guest retention period is out of range".to_string()))?;

    delete_guest_entries_before(store, cutoff)
        .await
        .context("Failed to prune guest leaderboard entries")
}

pub async fn run_guest_sweeper(
    store: Arc<dyn DocumentStore>,
    retention: Duration,
    interval: std::time::Duration,
) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        match prune_stale_guest_entries(store.as_ref(), retention).await {
            Ok(0) => log::debug!("Guest sweep found nothing to remove"),
            Ok(removed) => log::info!("Removed {} stale guest leaderboard entries", removed),
            Err(err) => log::error!("Guest sweep failed: {:?}", err),
        }
    }
}
