//! Bearer-token authentication.
//!
//! Tokens are issued elsewhere and signed with the shared secret (HS256). A
//! request carries one either as `Authorization: Bearer <jwt>` or in the
//! `token` cookie.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::member::MemberProfile;
use crate::domain::types::{DisplayName, Email, TypeConstraintError, UserId};
use crate::dto::ActionResponse;
use crate::models::config::ServerConfig;
use crate::services::ServiceError;

pub const TOKEN_COOKIE: &str = "token";

/// Claims of a verified bearer token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Identity used when this user joins an organization. Falls back to the
    /// email when the token carries no display name.
    pub fn profile(&self) -> Result<MemberProfile, TypeConstraintError> {
        let email = Email::new(self.email.as_str())?;
        let name = DisplayName::new(self.name.as_str())
            .or_else(|_| DisplayName::new(email.as_str()))?;
        Ok(MemberProfile {
            user_id: UserId::new(self.sub.as_str())?,
            email,
            name,
        })
    }

    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        UserId::new(self.sub.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid bearer token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("server configuration unavailable")]
    MissingConfig,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingConfig => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let err = match self {
            AuthError::MissingConfig => ServiceError::Internal(self.to_string()),
            _ => ServiceError::Unauthorized,
        };
        let (code, body) = ActionResponse::from_error(&err);
        HttpResponse::build(code).json(body)
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let from_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    from_header.or_else(|| {
        req.cookie(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

/// Verifies the signature and expiry of `token`.
pub fn decode_token(token: &str, secret: &str) -> Result<AuthenticatedUser, AuthError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<AuthenticatedUser>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

/// Signs claims with the shared secret, for tests and tooling.
pub fn encode_token(
    claims: &AuthenticatedUser,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

impl AuthenticatedUser {
    fn from_http_request(req: &HttpRequest) -> Result<Self, AuthError> {
        let config = req
            .app_data::<web::Data<ServerConfig>>()
            .ok_or(AuthError::MissingConfig)?;
        let token = bearer_token(req).ok_or(AuthError::MissingToken)?;
        decode_token(&token, &config.secret).map_err(|err| {
            log::debug!("rejected bearer token: {err}");
            err
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;
    use chrono::{Duration, Utc};

    const SECRET: &str = "unit-test-secret";

    fn claims(exp_offset_secs: i64) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user-1".to_string(),
            email: "Alice@Example.com".to_string(),
            name: "Alice".to_string(),
            exp: (Utc::now() + Duration::seconds(exp_offset_secs)).timestamp() as usize,
        }
    }

    #[test]
    fn signed_token_round_trips() {
        let token = encode_token(&claims(3600), SECRET).unwrap();
        let decoded = decode_token(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, "user-1");
    }

    #[test]
    fn wrong_secret_and_expired_tokens_are_rejected() {
        let token = encode_token(&claims(3600), SECRET).unwrap();
        assert!(decode_token(&token, "other-secret").is_err());

        let expired = encode_token(&claims(-3600), SECRET).unwrap();
        assert!(decode_token(&expired, SECRET).is_err());
    }

    #[test]
    fn token_is_read_from_header_then_cookie() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc"))
            .cookie(Cookie::new(TOKEN_COOKIE, "def"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc"));

        let req = TestRequest::default()
            .cookie(Cookie::new(TOKEN_COOKIE, "def"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("def"));

        assert!(bearer_token(&TestRequest::default().to_http_request()).is_none());
    }

    #[test]
    fn profile_normalizes_email_and_defaults_name() {
        let mut user = claims(60);
        user.name = "  ".to_string();
        let profile = user.profile().unwrap();
        assert_eq!(profile.email.as_str(), "alice@example.com");
        assert_eq!(profile.name.as_str(), "alice@example.com");
    }
}
