/// Break-glass grants are short by design.
pub const GRANT_TTL_MINUTES: i64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum EmergencyAccessError {
    #[error("Only doctors and first responders may request emergency access")]
    RoleNotPermitted,

    #[error("Biometric verification is unavailable on this device")]
    BiometricUnavailable,

    #[error("Biometric verification failed")]
    BiometricFailed,

    #[error("Grant not found")]
    GrantNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
