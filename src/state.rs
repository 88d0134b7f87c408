use crate::repositories::store::DocumentStore;
use crate::services::auth_service::TokenService;
use crate::utils::keyed_lock::KeyedLocks;
use std::sync::Arc;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub tokens: TokenService,
    pub locks: KeyedLocks,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, jwt_secret: &str, bcrypt_cost: u32) -> Self {
        AppState {
            store,
            tokens: TokenService::new(jwt_secret),
            locks: KeyedLocks::new(),
            bcrypt_cost,
        }
    }
}
