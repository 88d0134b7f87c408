use crate::constants::{DEFAULT_LEADERBOARD_LIMIT, DEFAULT_LEADERBOARD_SKIP};
use crate::errors::AppError;
use crate::models::game::GameType;
use crate::services::leaderboard_service::top_n;
use crate::state::AppState;
use crate::structs::leaderboard::{LeaderboardEntryView, LeaderboardQuery, LeaderboardResponse};
use crate::utils::helpers::parse_or_default;
use actix_web::{web, HttpResponse};

pub async fn get_leaderboard(
    state: web::Data<AppState>,
    query: web::Query<LeaderboardQuery>,
) -> Result<HttpResponse, AppError> {
    let game_type = match query.game_type.as_deref() {
        None | Some("") => GameType::default(),
        Some(raw) => raw.parse::<GameType>()?,
    };
    let limit = parse_or_default(query.limit.as_deref(), DEFAULT_LEADERBOARD_LIMIT, |n| *n >= 0);
    // Mongo stores skip as a signed 64-bit value.
    let skip = parse_or_default(query.skip.as_deref(), DEFAULT_LEADERBOARD_SKIP, |n| *n >= 0);

    let page = top_n(state.store.as_ref(), game_type, limit, skip as u64).await?;

    Ok(HttpResponse::Ok().json(LeaderboardResponse {
        leaderboard: page
            .entries
            .into_iter()
            .map(LeaderboardEntryView::from)
            .collect(),
        total: page.total,
        game_type: game_type.to_string(),
    }))
}
