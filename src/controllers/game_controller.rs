use crate::constants::RECORD_SAVED_MESSAGE;
use crate::errors::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::game::{GameResult, GameType};
use crate::services::leaderboard_service::history_for;
use crate::services::record_service::submit_record;
use crate::state::AppState;
use crate::structs::api_response::message_response;
use crate::structs::game::{GameRecordView, RecordRequest, RecordsQuery, RecordsResponse};
use actix_web::{web, HttpResponse};

pub async fn save_game_record(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    form: web::Json<RecordRequest>,
) -> Result<HttpResponse, AppError> {
    let request = form.into_inner();
    let result = GameResult::new(&request.game_type, request.score, request.time_in_seconds)?;

    submit_record(state.store.as_ref(), &state.locks, auth.identity(), result).await?;

    Ok(HttpResponse::Ok().json(message_response(RECORD_SAVED_MESSAGE)))
}

pub async fn get_game_records(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    query: web::Query<RecordsQuery>,
) -> Result<HttpResponse, AppError> {
    let game_type = match query.game_type.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<GameType>()?),
    };

    let records = history_for(state.store.as_ref(), auth.identity(), game_type).await?;

    Ok(HttpResponse::Ok().json(RecordsResponse {
        records: records.into_iter().map(GameRecordView::from).collect(),
    }))
}
