use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Raw `user_devices` row. The trust flags are nullable in the backend
/// schema; defaults are applied when converting to `DeviceRecord` so a
/// missing value can never silently loosen or tighten the security posture
/// differently than the existing backend does.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceRow {
    pub user_id: String,
    pub device_id: String,
    pub device_name: Option<String>,
    pub platform: Option<String>,
    pub device_model: Option<String>,
    pub os_version: Option<String>,
    pub biometric_enabled: Option<bool>,
    pub trusted: Option<bool>,
    pub revoked: Option<bool>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub token_fingerprint: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

/// One record per (user, device), upserted by the client and never hard
/// deleted except by explicit user action. `revoked` is monotonic.
#[derive(Debug, Clone)]
pub struct DeviceRecord {
    pub user_id: String,
    pub device_id: String,
    pub device_name: Option<String>,
    pub platform: Option<String>,
    pub device_model: Option<String>,
    pub os_version: Option<String>,
    pub biometric_enabled: bool,
    pub trusted: bool,
    pub revoked: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub token_fingerprint: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl From<DeviceRow> for DeviceRecord {
    fn from(row: DeviceRow) -> Self {
        DeviceRecord {
            user_id: row.user_id,
            device_id: row.device_id,
            device_name: row.device_name,
            platform: row.platform,
            device_model: row.device_model,
            os_version: row.os_version,
            // Observed backend defaults: a device row without explicit flags
            // is trusted, not biometric-enrolled, and not revoked.
            biometric_enabled: row.biometric_enabled.unwrap_or(false),
            trusted: row.trusted.unwrap_or(true),
            revoked: row.revoked.unwrap_or(false),
            revoked_at: row.revoked_at,
            token_fingerprint: row.token_fingerprint,
            registered_at: row.registered_at,
            last_used_at: row.last_used_at,
        }
    }
}
