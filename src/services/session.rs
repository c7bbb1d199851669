use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Session could not be recovered: {0}")]
    Rejected(String),
}

/// Session handed back by the external auth backend.
#[derive(Debug, Clone, Deserialize)]
pub struct RecoveredSession {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// External session exchange: primary credentials and token issuance live in
/// the auth backend, this core only recovers a session from a stored
/// refresh token.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn recover_session(&self, refresh_token: &str)
        -> Result<RecoveredSession, SessionError>;
}

/// Auth backend client
pub struct AuthBackendClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AuthBackendClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl SessionBackend for AuthBackendClient {
    async fn recover_session(
        &self,
        refresh_token: &str,
    ) -> Result<RecoveredSession, SessionError> {
        let url = format!("{}/session/recover", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("API-Key", &self.api_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| SessionError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SessionError::Rejected(response.status().to_string()));
        }

        response
            .json()
            .await
            .map_err(|e| SessionError::Parse(e.to_string()))
    }
}
