use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::modules::two_factor::model::CodeChannel;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Delivery provider returned status: {0}")]
    Provider(String),
}

/// External email/SMS delivery collaborator for one-time codes.
#[async_trait]
pub trait OtpDelivery: Send + Sync {
    async fn deliver(
        &self,
        channel: CodeChannel,
        destination: &str,
        code: &str,
    ) -> Result<(), DeliveryError>;
}

/// OTP provider client
pub struct OtpProviderClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OtpProviderClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl OtpDelivery for OtpProviderClient {
    async fn deliver(
        &self,
        channel: CodeChannel,
        destination: &str,
        code: &str,
    ) -> Result<(), DeliveryError> {
        let url = format!("{}/send", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("API-Key", &self.api_key)
            .json(&json!({
                "channel": channel.as_str(),
                "destination": destination,
                "body": format!("Your verification code is {code}. It expires in 10 minutes."),
            }))
            .send()
            .await
            .map_err(|e| DeliveryError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeliveryError::Provider(response.status().to_string()));
        }

        Ok(())
    }
}
