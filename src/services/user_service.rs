use crate::errors::{AppError, StoreContext};
use crate::models::identity::Identity;
use crate::models::user::User;
use crate::repositories::store::{DocumentStore, StoreError};
use crate::repositories::user_repository::{fetch_user_by_id, fetch_user_by_username, insert_user};
use crate::services::auth_service::{hash_password, verify_password, TokenService};
use crate::structs::auth::AuthResponse;

const USERNAME_TAKEN: &str = "User with this username already exists";
const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub fn validate_credentials(username: &str, password: &str) -> Result<(), AppError> {
    if username.trim().is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    if password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }
    Ok(())
}

pub async fn register_user(
    store: &dyn DocumentStore,
    tokens: &TokenService,
    bcrypt_cost: u32,
    username: &str,
    password: String,
) -> Result<AuthResponse, AppError> {
    validate_credentials(username, &password)?;

    let existing = fetch_user_by_username(store, username)
        .await
        .context("Error checking username availability")?;
    if existing.is_some() {
        return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let password_hash = hash_password(password, bcrypt_cost).await?;
    let user = User::new(username.to_string(), password_hash);

    match insert_user(store, &user).await {
        Ok(_) => {}
        // Lost a race with another registration for the same name.
        Err(StoreError::DuplicateKey(_)) => {
            return Err(AppError::Conflict(USERNAME_TAKEN.to_string()))
        }
        Err(err) => return Err(err).context("Failed to create user"),
    }

    let id = user
        .id
        .ok_or_else(|| AppError::Internal("Failed to create user".to_string()))?;
    log::info!("Registered user '{}'", user.username);

    Ok(AuthResponse {
        token: tokens.issue_for_user(&id)?,
        username: user.username,
    })
}

pub async fn login_user(
    store: &dyn DocumentStore,
    tokens: &TokenService,
    username: &str,
    password: String,
) -> Result<AuthResponse, AppError> {
    validate_credentials(username, &password)?;

    let user = fetch_user_by_username(store, username)
        .await
        .context("Failed to retrieve user")?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

    if !verify_password(password, user.password.clone()).await? {
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let id = user
        .id
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

    Ok(AuthResponse {
        token: tokens.issue_for_user(&id)?,
        username: user.username,
    })
}

pub async fn current_user(store: &dyn DocumentStore, identity: &Identity) -> Result<User, AppError> {
    let Identity::Registered { id } = identity else {
        return Err(AppError::user_not_found());
    };

    fetch_user_by_id(store, id)
        .await
        .context("Failed to retrieve user")?
        .ok_or_else(AppError::user_not_found)
}
