use async_trait::async_trait;

use super::model::DeviceRecord;
use super::schema::DeviceRegistration;

pub type Result<T> = std::result::Result<T, DeviceError>;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Device not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Client contract over the backend device-trust store.
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    async fn find_device(&self, user_id: &str, device_id: &str)
        -> Result<Option<DeviceRecord>>;

    /// Idempotent upsert keyed by (user_id, device_id). Must never clear
    /// `revoked`/`revoked_at`: revocation is monotonic.
    async fn register_device(&self, registration: &DeviceRegistration) -> Result<()>;

    /// Sets `revoked = true` and stamps `revoked_at` once. Irreversible.
    async fn revoke_device(&self, user_id: &str, device_id: &str) -> Result<()>;

    /// Hard remove; only ever driven by explicit user action.
    async fn delete_device(&self, user_id: &str, device_id: &str) -> Result<()>;

    async fn update_biometric_status(
        &self,
        user_id: &str,
        device_id: &str,
        enabled: bool,
    ) -> Result<()>;

    /// Non-revoked devices, most recently used first.
    async fn list_user_devices(&self, user_id: &str) -> Result<Vec<DeviceRecord>>;
}
