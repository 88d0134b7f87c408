use crate::constants::{GUEST_TOKEN_TTL_HOURS, REGISTERED_TOKEN_TTL_HOURS};
use crate::errors::AppError;
use crate::models::identity::Identity;
use actix_web::web;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub guest: bool,
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        TokenService {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn issue_for_user(&self, id: &ObjectId) -> Result<String, AppError> {
        self.issue(Claims {
            user_id: id.to_hex(),
            guest: false,
            exp: (Utc::now() + Duration::hours(REGISTERED_TOKEN_TTL_HOURS)).timestamp(),
        })
    }

    pub fn issue_for_guest(&self, guest_id: &str) -> Result<String, AppError> {
        self.issue(Claims {
            user_id: guest_id.to_string(),
            guest: true,
            exp: (Utc::now() + Duration::hours(GUEST_TOKEN_TTL_HOURS)).timestamp(),
        })
    }

    fn issue(&self, claims: Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|err| {
            log::error!("Failed to sign token: {}", err);
            AppError::Internal("Failed to generate token".to_string())
        })
    }

    pub fn authenticate(&self, token: &str) -> Result<Identity, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            log::debug!("Rejected token: {}", err);
            AppError::unauthorized("Invalid token")
        })?;
        let claims = data.claims;

        if claims.guest {
            return Ok(Identity::Guest { id: claims.user_id });
        }

        ObjectId::parse_str(&claims.user_id)
            .map(|id| Identity::Registered { id })
            .map_err(|_| AppError::unauthorized("Invalid token"))
    }
}

pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    web::block(move || bcrypt::hash(password, cost))
        .await
        .map_err(|_| AppError::Internal("Failed to hash password".to_string()))?
        .map_err(|err| {
            log::error!("Failed to hash password: {}", err);
            AppError::Internal("Failed to hash password".to_string())
        })
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let verified = web::block(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|_| AppError::Internal("Failed to verify password".to_string()))?;

    // A malformed stored hash is treated as a mismatch.
    Ok(verified.unwrap_or(false))
}
