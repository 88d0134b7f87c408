use crate::errors::AppError;
use crate::models::identity::guest_display_name;
use crate::services::user_service::{login_user, register_user};
use crate::state::AppState;
use crate::structs::auth::{CredentialsRequest, GuestSessionResponse};
use actix_web::{web, HttpResponse};
use mongodb::bson::oid::ObjectId;

pub async fn register(
    state: web::Data<AppState>,
    form: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, AppError> {
    let request = form.into_inner();

    let response = register_user(
        state.store.as_ref(),
        &state.tokens,
        state.bcrypt_cost,
        request.username.trim(),
        request.password,
    )
    .await?;

    Ok(HttpResponse::Created().json(response))
}

pub async fn login(
    state: web::Data<AppState>,
    form: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, AppError> {
    let request = form.into_inner();

    let response = login_user(
        state.store.as_ref(),
        &state.tokens,
        request.username.trim(),
        request.password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(response))
}

pub async fn create_guest_session(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let guest_id = ObjectId::new().to_hex();
    let token = state.tokens.issue_for_guest(&guest_id)?;

    Ok(HttpResponse::Ok().json(GuestSessionResponse {
        token,
        username: guest_display_name(&guest_id),
        guest: true,
    }))
}
