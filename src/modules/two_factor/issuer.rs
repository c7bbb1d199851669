use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;

use crate::config::DbPool;
use crate::services::otp::OtpDelivery;

use super::crud::TwoFactorCrud;
use super::model::CodeChannel;
use super::schema::{TwoFactorError, CODE_TTL_MINUTES, MAX_ATTEMPTS};

/// Issues and verifies short-lived numeric codes for email/SMS two-factor.
pub struct TwoFactorIssuer {
    crud: TwoFactorCrud,
    delivery: Arc<dyn OtpDelivery>,
}

impl TwoFactorIssuer {
    pub fn new(pool: DbPool, delivery: Arc<dyn OtpDelivery>) -> Self {
        Self {
            crud: TwoFactorCrud::new(pool),
            delivery,
        }
    }

    fn generate_code() -> String {
        // ThreadRng is a CSPRNG; zero-padding keeps the full 6-digit space.
        format!("{:06}", rand::rng().random_range(0..1_000_000u32))
    }

    /// Generates, stores and dispatches a fresh code with a 10-minute expiry.
    pub async fn send_code(
        &self,
        user_id: &str,
        channel: CodeChannel,
        destination: &str,
    ) -> Result<(), TwoFactorError> {
        let code = Self::generate_code();
        let expires_at = Utc::now() + Duration::minutes(CODE_TTL_MINUTES);

        self.crud.create(user_id, &code, channel, expires_at).await?;

        self.delivery
            .deliver(channel, destination, &code)
            .await
            .map_err(|e| TwoFactorError::Delivery(e.to_string()))?;

        tracing::debug!(user_id, channel = channel.as_str(), "two-factor code dispatched");
        Ok(())
    }

    /// A resend is a brand-new code; the previous one is neither reused nor
    /// extended, and stops being the live code the moment this one lands.
    pub async fn resend_code(
        &self,
        user_id: &str,
        channel: CodeChannel,
        destination: &str,
    ) -> Result<(), TwoFactorError> {
        self.send_code(user_id, channel, destination).await
    }

    pub async fn verify_code(
        &self,
        user_id: &str,
        code: &str,
        channel: CodeChannel,
    ) -> Result<(), TwoFactorError> {
        let Some(stored) = self.crud.find_latest_unverified(user_id, channel).await? else {
            return Err(TwoFactorError::NotFound);
        };

        if stored.expires_at < Utc::now() {
            return Err(TwoFactorError::Expired);
        }

        // Checked before the comparison: once the cap is hit the code is
        // dead even for the right input.
        if stored.attempts >= MAX_ATTEMPTS {
            return Err(TwoFactorError::AttemptsExceeded);
        }

        if stored.code != code {
            self.crud.increment_attempts(&stored.id).await?;
            return Err(TwoFactorError::Invalid {
                remaining: MAX_ATTEMPTS - stored.attempts - 1,
            });
        }

        // Terminal: a verified code is excluded from future lookups, so a
        // second verification of the same code fails with NotFound.
        self.crud.mark_verified(&stored.id).await?;
        Ok(())
    }

    pub async fn sweep_expired(&self) -> Result<u64, TwoFactorError> {
        Ok(self.crud.sweep_expired().await?)
    }
}
