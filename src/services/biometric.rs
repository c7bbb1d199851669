use async_trait::async_trait;

/// Categorized biometric failures. Callers branch on the category to pick
/// retry vs. fall-back-to-password messaging; `LockedOut` is transient,
/// `PermanentlyLockedOut` needs a device-level unlock first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BiometricError {
    #[error("Biometric hardware is unavailable")]
    Unavailable,

    #[error("No biometric credentials are enrolled on this device")]
    NotEnrolled,

    #[error("Biometric authentication is temporarily locked, try again later")]
    LockedOut,

    #[error("Biometric authentication is locked until the device is unlocked")]
    PermanentlyLockedOut,
}

/// Platform biometric capability (Face ID, fingerprint, ...).
///
/// `authenticate` resolves to `Ok(true)` on a passed challenge and
/// `Ok(false)` when the user declined or failed the prompt; hardware-level
/// problems surface as `BiometricError`.
#[async_trait]
pub trait BiometricGate: Send + Sync {
    async fn is_available(&self) -> bool;
    async fn is_device_supported(&self) -> bool;
    async fn authenticate(&self, reason: &str, biometric_only: bool)
        -> Result<bool, BiometricError>;
}
