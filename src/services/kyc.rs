use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum KycError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("KYC API returned status: {0}")]
    Api(String),
}

/// KYC-verification lookup by user id. The verification itself happens in an
/// external identity service; this core only needs the yes/no gate.
#[async_trait]
pub trait KycVerifier: Send + Sync {
    async fn is_verified(&self, user_id: &str) -> Result<bool, KycError>;
}

#[derive(Debug, Deserialize)]
struct KycStatusResponse {
    // A response without the field means "not verified", never "verified".
    #[serde(default)]
    verified: bool,
}

/// KYC API client
pub struct KycClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl KycClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl KycVerifier for KycClient {
    async fn is_verified(&self, user_id: &str) -> Result<bool, KycError> {
        let url = format!("{}/kyc/status/{}", self.base_url, user_id);

        let response = self
            .client
            .get(&url)
            .header("API-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| KycError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(KycError::Api(response.status().to_string()));
        }

        let status: KycStatusResponse = response
            .json()
            .await
            .map_err(|e| KycError::Parse(e.to_string()))?;

        Ok(status.verified)
    }
}
