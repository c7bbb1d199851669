use chrono::{DateTime, Utc};

/// Snapshot of what the secure credential store holds for this install.
/// `device_id` persists across logout; everything else is cleared by a
/// session wipe.
#[derive(Debug, Clone, Default)]
pub struct LocalSession {
    pub device_id: Option<String>,
    pub user_id: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub biometric_enabled: bool,
    pub last_activity: Option<DateTime<Utc>>,
}
