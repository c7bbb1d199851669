use chrono::{DateTime, Utc};

/// Host-app description of the device the core is running on, supplied once
/// at controller construction.
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    pub device_name: String,
    pub platform: String,
    pub device_model: String,
    pub os_version: String,
}

/// Upsert payload for `register_device`, keyed by (user_id, device_id).
#[derive(Debug, Clone)]
pub struct DeviceRegistration {
    pub user_id: String,
    pub device_id: String,
    pub device_name: String,
    pub platform: String,
    pub device_model: String,
    pub os_version: String,
    pub biometric_enabled: bool,
    pub trusted: bool,
    pub token_fingerprint: Option<String>,
    pub last_used_at: DateTime<Utc>,
}

impl DeviceRegistration {
    pub fn from_profile(
        profile: &DeviceProfile,
        user_id: &str,
        device_id: &str,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            device_id: device_id.to_string(),
            device_name: profile.device_name.clone(),
            platform: profile.platform.clone(),
            device_model: profile.device_model.clone(),
            os_version: profile.os_version.clone(),
            biometric_enabled: false,
            trusted: true,
            token_fingerprint: None,
            last_used_at: Utc::now(),
        }
    }
}
