#![allow(dead_code)]

use actix_web::http::header::AUTHORIZATION;
use actix_web::web;
use minesweeper_backend::constants::USERS_COLL_NAME;
use minesweeper_backend::repositories::memory_store::MemoryStore;
use minesweeper_backend::services::user_service::register_user;
use minesweeper_backend::state::AppState;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-secret-key";
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_state() -> web::Data<AppState> {
    let store = Arc::new(MemoryStore::new().with_unique(USERS_COLL_NAME, "username"));
    web::Data::new(AppState::new(store, TEST_SECRET, TEST_BCRYPT_COST))
}

/// Registers `username` directly through the service layer and returns its token.
pub async fn register(state: &web::Data<AppState>, username: &str) -> String {
    register_user(
        state.store.as_ref(),
        &state.tokens,
        state.bcrypt_cost,
        username,
        "secure_password123".to_string(),
    )
    .await
    .expect("registration should succeed")
    .token
}

pub fn guest_token(state: &web::Data<AppState>) -> (String, String) {
    let guest_id = ObjectId::new().to_hex();
    let token = state
        .tokens
        .issue_for_guest(&guest_id)
        .expect("guest token should sign");
    (guest_id, token)
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", token))
}
