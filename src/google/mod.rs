//! Google ID token verification for third-party login.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Identity asserted by a verified Google ID token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleProfile {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum GoogleError {
    #[error("Google rejected the token")]
    Rejected,
    #[error("Token was issued for a different client")]
    AudienceMismatch,
    #[error("Token does not carry a verified email and name")]
    IncompleteProfile,
    #[error("Google token verification failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl GoogleError {
    /// True when the token itself is unacceptable, as opposed to Google being unreachable
    pub fn is_rejection(&self) -> bool {
        !matches!(self, GoogleError::Transport(_))
    }
}

#[async_trait]
pub trait GoogleVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<GoogleProfile, GoogleError>;
}

/// Claims returned by the tokeninfo endpoint. Booleans arrive as strings.
#[derive(Debug, Default, Deserialize)]
struct TokenInfo {
    aud: Option<String>,
    email: Option<String>,
    email_verified: Option<String>,
    name: Option<String>,
}

/// Verifies tokens with Google's tokeninfo endpoint
pub struct GoogleTokenInfo {
    client_id: Option<String>,
    endpoint: String,
    client: reqwest::Client,
}

impl GoogleTokenInfo {
    pub fn new(client_id: Option<String>) -> Self {
        Self {
            client_id: client_id.filter(|id| !id.is_empty()),
            endpoint: TOKENINFO_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

fn profile_from(info: TokenInfo, client_id: Option<&str>) -> Result<GoogleProfile, GoogleError> {
    if let Some(expected) = client_id {
        if info.aud.as_deref() != Some(expected) {
            return Err(GoogleError::AudienceMismatch);
        }
    }
    if info.email_verified.as_deref() == Some("false") {
        return Err(GoogleError::IncompleteProfile);
    }

    match (info.email, info.name) {
        (Some(email), Some(name)) if !email.is_empty() && !name.is_empty() => {
            Ok(GoogleProfile { email, name })
        }
        _ => Err(GoogleError::IncompleteProfile),
    }
}

#[async_trait]
impl GoogleVerifier for GoogleTokenInfo {
    async fn verify(&self, id_token: &str) -> Result<GoogleProfile, GoogleError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if response.status().is_client_error() {
            return Err(GoogleError::Rejected);
        }
        let response = response.error_for_status()?;
        let info: TokenInfo = response.json().await?;

        profile_from(info, self.client_id.as_deref())
    }
}
