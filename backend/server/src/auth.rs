//! # Authentication
//!
//! Stateless bearer tokens.
//!
//! - Register/login mint an HS256 JWT carrying `userId` and `email`
//! - Every protected request presents it as `Authorization: Bearer <token>`
//! - The verifier only checks signature and expiry, there is no revocation list
//!
//! Missing token is `401`, anything present but unverifiable is `403`.
use std::sync::{Arc, OnceLock};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use records::models::User;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Caller identity attached to the request by [`authenticate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// Stored account. Only [`User`] ever leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn profile(&self) -> User {
        User {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

pub fn issue_token(secret: &str, user_id: Uuid, email: &str, ttl_hours: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!("Token rejected: {e}");
        AppError::Forbidden
    })
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .split(' ')
        .nth(1)
        .filter(|token| !token.is_empty())
}

pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = {
        let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
        verify_token(&state.config.jwt_secret, token)?
    };

    request.extensions_mut().insert(Identity::from(claims));

    Ok(next.run(request).await)
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Hashing(e.to_string()))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

// Unknown emails still run one Argon2 verification.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();

    DUMMY.get_or_init(|| hash_password("no-such-account").unwrap_or_default())
}

pub fn verify_account_password(password: &str, password_hash: Option<&str>) -> bool {
    match password_hash {
        Some(password_hash) => verify_password(password, password_hash),
        None => {
            let _ = verify_password(password, dummy_hash());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    const SECRET: &str = "test-secret";

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn issued_tokens_verify_with_the_same_secret() {
        let user_id = Uuid::new_v4();
        let token = issue_token(SECRET, user_id, "a@example.com", 1).unwrap();

        let claims = verify_token(SECRET, &token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "a@example.com");
    }

    #[test]
    fn foreign_or_garbage_tokens_are_forbidden() {
        let token = issue_token("other-secret", Uuid::new_v4(), "a@example.com", 1).unwrap();

        assert!(matches!(verify_token(SECRET, &token), Err(AppError::Forbidden)));
        assert!(matches!(verify_token(SECRET, "not-a-jwt"), Err(AppError::Forbidden)));
    }

    #[test]
    fn expired_tokens_are_forbidden() {
        let token = issue_token(SECRET, Uuid::new_v4(), "a@example.com", -2).unwrap();

        assert!(matches!(verify_token(SECRET, &token), Err(AppError::Forbidden)));
    }

    #[test]
    fn bearer_token_takes_second_segment() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn passwords_round_trip_through_argon2() {
        let hash = hash_password("hunter22").unwrap();

        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not-a-phc-string"));
    }

    #[test]
    fn missing_accounts_never_verify() {
        let hash = hash_password("hunter22").unwrap();

        assert!(verify_account_password("hunter22", Some(&hash)));
        assert!(!verify_account_password("hunter22", None));
        assert!(!verify_account_password("no-such-account", None));
        assert!(!dummy_hash().is_empty());
    }
}
