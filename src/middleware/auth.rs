use crate::errors::AppError;
use crate::models::identity::Identity;
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

/// Extractor resolving the bearer token into an [`Identity`].
pub struct AuthenticatedUser(pub Identity);

impl AuthenticatedUser {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("Authorization header is required"))?;

    let value = header.to_str().map_err(|_| {
        AppError::unauthorized("Authorization header format must be Bearer {token}")
    })?;

    match value.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() => Ok(token),
        _ => Err(AppError::unauthorized(
            "Authorization header format must be Bearer {token}",
        )),
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("Application state is not configured".to_string()))?;

    let token = bearer_token(req)?;
    let identity = state.tokens.authenticate(token)?;

    Ok(AuthenticatedUser(identity))
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn requires_header() {
        let req = TestRequest::default().to_http_request();
        let err = bearer_token(&req).unwrap_err();
        assert_eq!(err.to_string(), "Authorization header is required");
    }

    #[test]
    fn requires_bearer_scheme() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "InvalidFormat token123"))
            .to_http_request();
        let err = bearer_token(&req).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Authorization header format must be Bearer {token}"
        );
    }

    #[test]
    fn extracts_token() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");
    }
}
