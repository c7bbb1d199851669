use crate::modules::device::DeviceError;
use crate::services::biometric::BiometricError;
use crate::services::credential_store::StorageError;

// =============================================================================
// FLOW INPUTS / OUTCOMES
// =============================================================================

/// Session handed over by the external auth backend after primary
/// credentials have been validated.
#[derive(Debug, Clone)]
pub struct ExternalSession {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Identity verification is still pending; no device or biometric work
    /// has happened.
    KycRequired,
    Success { biometric_enrolled: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    LoginRequired,
    /// The biometric challenge was not passed. Retryable: the local session
    /// is left intact, unlike the breach-detection wipes.
    BiometricFailed,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentMode {
    /// Part of the login flow; unsupported hardware or a declined prompt
    /// lets the login continue without biometric.
    Automatic,
    /// User-initiated "enable biometric"; failures are hard errors.
    Explicit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    Enrolled,
    SkippedUnsupported,
    Declined,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("This device has been revoked and can no longer be used")]
    DeviceRevoked,

    #[error("Identity verification must be completed first")]
    KycNotVerified,

    #[error("KYC lookup failed: {0}")]
    Kyc(String),

    #[error("Session recovery failed: {0}")]
    Session(String),

    #[error("A biometric enrollment is already in progress")]
    EnrollmentInProgress,

    #[error("Biometric hardware is not supported on this device")]
    BiometricUnsupported,

    #[error("Biometric prompt was declined")]
    BiometricDeclined,

    #[error(transparent)]
    Biometric(#[from] BiometricError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("Secure storage failure: {0}")]
    Storage(#[from] StorageError),
}
