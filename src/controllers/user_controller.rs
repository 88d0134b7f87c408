use crate::errors::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::user_service::current_user;
use crate::state::AppState;
use crate::structs::auth::CurrentUserResponse;
use actix_web::{web, HttpResponse};

pub async fn get_current_user(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = current_user(state.store.as_ref(), auth.identity()).await?;

    Ok(HttpResponse::Ok().json(CurrentUserResponse {
        id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        username: user.username,
    }))
}
