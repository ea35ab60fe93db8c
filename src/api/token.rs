//! Identity tokens carried in the `token` cookie.
//!
//! Tokens are HS256 JWTs holding the user id. The cookie is HttpOnly and
//! SameSite=Strict; the Secure flag is only set in production mode.

use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the identity cookie
pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id
    id: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
    #[error("Invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
    secure: bool,
}

impl TokenService {
    pub fn new(secret: &str, ttl: chrono::Duration, secure: bool) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
            secure,
        }
    }

    /// Issue a token for the given user
    pub fn issue(&self, user_id: &str) -> Result<String, TokenError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            id: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify signature and expiry, returning the user id
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.id)
            .map_err(TokenError::Invalid)
    }

    /// Cookie carrying a freshly issued token
    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((TOKEN_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .max_age(time::Duration::seconds(self.ttl.num_seconds()))
            .build()
    }

    /// Cookie that overwrites the identity with an empty, already-expired value
    pub fn clear_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((TOKEN_COOKIE, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .build();
        cookie.make_removal();
        cookie
    }
}
