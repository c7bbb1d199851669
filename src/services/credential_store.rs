use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

// Fixed key set. `device_id` is the only key that survives clear_session.
const KEY_DEVICE_ID: &str = "device_id";
const KEY_USER_ID: &str = "user_id";
const KEY_ACCESS_TOKEN: &str = "access_token";
const KEY_REFRESH_TOKEN: &str = "refresh_token";
const KEY_BIOMETRIC_ENABLED: &str = "biometric_enabled";
const KEY_LAST_ACTIVITY: &str = "last_activity";

/// Foreground-resume timeout: past this the host app must re-challenge
/// before showing sensitive content.
const SESSION_TIMEOUT_MINUTES: i64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Secure storage backend error: {0}")]
    Backend(String),
}

/// Platform-provided encrypted key-value storage (Keychain, Keystore).
/// The in-memory implementation below backs tests and embedding hosts that
/// supply their own at-rest encryption.
#[async_trait]
pub trait SecureStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Default)]
pub struct InMemorySecureStorage {
    values: RwLock<HashMap<String, String>>,
}

impl InMemorySecureStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecureStorage for InMemorySecureStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

/// Typed facade over the secure storage with the fixed credential key set.
pub struct SecureCredentialStore {
    storage: Arc<dyn SecureStorage>,
}

impl SecureCredentialStore {
    pub fn new(storage: Arc<dyn SecureStorage>) -> Self {
        Self { storage }
    }

    /// Stable per-install device id: created once, reused forever,
    /// survives logout.
    pub async fn get_or_create_device_id(&self) -> Result<String, StorageError> {
        if let Some(id) = self.storage.get(KEY_DEVICE_ID).await? {
            return Ok(id);
        }
        let id = Uuid::new_v4().to_string();
        self.storage.set(KEY_DEVICE_ID, &id).await?;
        Ok(id)
    }

    pub async fn device_id(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(KEY_DEVICE_ID).await
    }

    pub async fn user_id(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(KEY_USER_ID).await
    }

    pub async fn access_token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(KEY_ACCESS_TOKEN).await
    }

    pub async fn refresh_token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(KEY_REFRESH_TOKEN).await
    }

    pub async fn set_session(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), StorageError> {
        self.storage.set(KEY_USER_ID, user_id).await?;
        self.storage.set(KEY_ACCESS_TOKEN, access_token).await?;
        self.storage.set(KEY_REFRESH_TOKEN, refresh_token).await?;
        self.touch_last_activity().await
    }

    pub async fn biometric_enabled(&self) -> Result<bool, StorageError> {
        Ok(self
            .storage
            .get(KEY_BIOMETRIC_ENABLED)
            .await?
            .map(|v| v == "true")
            .unwrap_or(false))
    }

    pub async fn set_biometric_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        self.storage
            .set(KEY_BIOMETRIC_ENABLED, if enabled { "true" } else { "false" })
            .await
    }

    pub async fn last_activity(&self) -> Result<Option<DateTime<Utc>>, StorageError> {
        Ok(self
            .storage
            .get(KEY_LAST_ACTIVITY)
            .await?
            .and_then(|v| v.parse::<DateTime<Utc>>().ok()))
    }

    pub async fn touch_last_activity(&self) -> Result<(), StorageError> {
        self.storage
            .set(KEY_LAST_ACTIVITY, &Utc::now().to_rfc3339())
            .await
    }

    /// A missing timestamp counts as timed out: the host app must never show
    /// sensitive content on the strength of an absent marker.
    pub async fn has_session_timed_out(&self) -> Result<bool, StorageError> {
        match self.last_activity().await? {
            Some(at) => Ok(Utc::now() - at > Duration::minutes(SESSION_TIMEOUT_MINUTES)),
            None => Ok(true),
        }
    }

    /// Wipes everything except the device id.
    pub async fn clear_session(&self) -> Result<(), StorageError> {
        self.storage.remove(KEY_USER_ID).await?;
        self.storage.remove(KEY_ACCESS_TOKEN).await?;
        self.storage.remove(KEY_REFRESH_TOKEN).await?;
        self.storage.remove(KEY_BIOMETRIC_ENABLED).await?;
        self.storage.remove(KEY_LAST_ACTIVITY).await?;
        Ok(())
    }
}
