use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::json;

use crate::modules::audit::{model::NewAuditEntry, AuditLog};
use crate::modules::device::model::DeviceRecord;
use crate::modules::device::schema::{DeviceProfile, DeviceRegistration};
use crate::modules::device::DeviceRegistry;
use crate::services::biometric::BiometricGate;
use crate::services::credential_store::SecureCredentialStore;
use crate::services::fingerprint::token_fingerprint;
use crate::services::kyc::KycVerifier;
use crate::services::session::SessionBackend;

use super::model::LocalSession;
use super::schema::{
    AuthError, EnrollmentMode, EnrollmentOutcome, ExternalSession, LoginOutcome, RestoreOutcome,
};

const ENROLL_PROMPT: &str = "Confirm your identity to secure this device";
const RESTORE_PROMPT: &str = "Unlock your account";

/// Orchestrates login, biometric enrollment and session restoration.
///
/// One long-lived instance per process, injected into callers; the flows own
/// the device-trust invariants, the collaborators own nothing but their own
/// mechanics.
pub struct AuthController {
    registry: Arc<dyn DeviceRegistry>,
    credentials: Arc<SecureCredentialStore>,
    biometric: Arc<dyn BiometricGate>,
    kyc: Arc<dyn KycVerifier>,
    sessions: Arc<dyn SessionBackend>,
    audit: AuditLog,
    device_profile: DeviceProfile,
    enrollment_in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path of the enrollment sequence.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl AuthController {
    pub fn new(
        registry: Arc<dyn DeviceRegistry>,
        credentials: Arc<SecureCredentialStore>,
        biometric: Arc<dyn BiometricGate>,
        kyc: Arc<dyn KycVerifier>,
        sessions: Arc<dyn SessionBackend>,
        audit: AuditLog,
        device_profile: DeviceProfile,
    ) -> Self {
        Self {
            registry,
            credentials,
            biometric,
            kyc,
            sessions,
            audit,
            device_profile,
            enrollment_in_flight: AtomicBool::new(false),
        }
    }

    /// True iff the device record is missing or not biometric-enrolled.
    ///
    /// Deliberately does not look at `revoked`: the login and restore flows
    /// reject revoked devices before this predicate runs, and duplicating
    /// the check here has historically let the two call sites diverge.
    pub fn needs_biometric_setup(record: Option<&DeviceRecord>) -> bool {
        record.map_or(true, |r| !r.biometric_enabled)
    }

    /// Post-login flow: KYC gate, device trust check, then enrollment or the
    /// trusted fast path.
    pub async fn on_login_success(
        &self,
        session: &ExternalSession,
    ) -> Result<LoginOutcome, AuthError> {
        let verified = self
            .kyc
            .is_verified(&session.user_id)
            .await
            .map_err(|e| AuthError::Kyc(e.to_string()))?;
        if !verified {
            // Terminal for this call: no device or biometric work happens
            // until the user has passed identity verification.
            return Ok(LoginOutcome::KycRequired);
        }

        let device_id = self.credentials.get_or_create_device_id().await?;

        let record = self
            .registry
            .find_device(&session.user_id, &device_id)
            .await?;

        if let Some(ref r) = record {
            if r.revoked {
                tracing::warn!(user_id = %session.user_id, device_id, "login on revoked device");
                self.credentials.clear_session().await?;
                self.audit
                    .record(
                        NewAuditEntry::new("revoked_device_login_blocked")
                            .user(&session.user_id)
                            .device(&device_id),
                    )
                    .await;
                return Err(AuthError::DeviceRevoked);
            }
        }

        let Some(record) = record.filter(|r| !Self::needs_biometric_setup(Some(r))) else {
            let outcome = self
                .run_enrollment(session, &device_id, EnrollmentMode::Automatic)
                .await?;
            return Ok(LoginOutcome::Success {
                biometric_enrolled: outcome == EnrollmentOutcome::Enrolled,
            });
        };

        // Trusted device: persist the session locally, mirror the remote
        // biometric flag and refresh the usage timestamp.
        self.credentials
            .set_session(&session.user_id, &session.access_token, &session.refresh_token)
            .await?;
        self.credentials.set_biometric_enabled(true).await?;

        let mut registration =
            DeviceRegistration::from_profile(&self.device_profile, &session.user_id, &device_id);
        registration.biometric_enabled = true;
        registration.trusted = record.trusted;
        registration.token_fingerprint = record.token_fingerprint;
        self.registry.register_device(&registration).await?;

        Ok(LoginOutcome::Success {
            biometric_enrolled: true,
        })
    }

    /// Explicit "enable biometric" entry point from settings.
    pub async fn enable_biometric(&self, session: &ExternalSession) -> Result<(), AuthError> {
        let verified = self
            .kyc
            .is_verified(&session.user_id)
            .await
            .map_err(|e| AuthError::Kyc(e.to_string()))?;
        if !verified {
            return Err(AuthError::KycNotVerified);
        }

        let device_id = self.credentials.get_or_create_device_id().await?;

        if let Some(record) = self
            .registry
            .find_device(&session.user_id, &device_id)
            .await?
        {
            if record.revoked {
                self.credentials.clear_session().await?;
                return Err(AuthError::DeviceRevoked);
            }
        }

        match self
            .run_enrollment(session, &device_id, EnrollmentMode::Explicit)
            .await?
        {
            EnrollmentOutcome::Enrolled => Ok(()),
            // Unreachable in explicit mode; run_enrollment turns these into
            // hard errors there.
            EnrollmentOutcome::SkippedUnsupported => Err(AuthError::BiometricUnsupported),
            EnrollmentOutcome::Declined => Err(AuthError::BiometricDeclined),
        }
    }

    /// The enrollment transaction shared by the automatic and explicit
    /// paths. Nothing is persisted, locally or remotely, until the biometric
    /// challenge has passed; the remote upsert failing rolls the local flag
    /// back so the device never believes itself enrolled while the backend
    /// disagrees.
    async fn run_enrollment(
        &self,
        session: &ExternalSession,
        device_id: &str,
        mode: EnrollmentMode,
    ) -> Result<EnrollmentOutcome, AuthError> {
        let _guard = InFlightGuard::acquire(&self.enrollment_in_flight)
            .ok_or(AuthError::EnrollmentInProgress)?;

        if !self.biometric.is_device_supported().await {
            return match mode {
                EnrollmentMode::Automatic => Ok(EnrollmentOutcome::SkippedUnsupported),
                EnrollmentMode::Explicit => Err(AuthError::BiometricUnsupported),
            };
        }

        match self.biometric.authenticate(ENROLL_PROMPT, true).await {
            Ok(true) => {}
            Ok(false) => {
                // Declined mid-flight: clean failure, zero state mutation.
                return match mode {
                    EnrollmentMode::Automatic => Ok(EnrollmentOutcome::Declined),
                    EnrollmentMode::Explicit => Err(AuthError::BiometricDeclined),
                };
            }
            Err(e) => return Err(AuthError::Biometric(e)),
        }

        let fingerprint = token_fingerprint(&session.access_token, device_id);

        self.credentials
            .set_session(&session.user_id, &session.access_token, &session.refresh_token)
            .await?;
        self.credentials.set_biometric_enabled(true).await?;

        let mut registration =
            DeviceRegistration::from_profile(&self.device_profile, &session.user_id, device_id);
        registration.biometric_enabled = true;
        registration.trusted = true;
        registration.token_fingerprint = Some(fingerprint);

        if let Err(e) = self.registry.register_device(&registration).await {
            tracing::warn!(user_id = %session.user_id, device_id, error = %e,
                "device upsert failed, rolling back local enrollment");
            // Compensating rollback: there is no transaction spanning the
            // secure store and the registry.
            self.credentials.set_biometric_enabled(false).await?;
            if mode == EnrollmentMode::Explicit {
                self.credentials.clear_session().await?;
            }
            self.audit
                .record(
                    NewAuditEntry::new("biometric_enrollment_rolled_back")
                        .user(&session.user_id)
                        .device(device_id),
                )
                .await;
            return Err(AuthError::Device(e));
        }

        self.audit
            .record(
                NewAuditEntry::new("biometric_enrolled")
                    .user(&session.user_id)
                    .device(device_id)
                    .metadata(json!({ "mode": match mode {
                        EnrollmentMode::Automatic => "automatic",
                        EnrollmentMode::Explicit => "explicit",
                    }})),
            )
            .await;

        Ok(EnrollmentOutcome::Enrolled)
    }

    /// App-start restoration. Revoked devices and fingerprint mismatches are
    /// breaches and wipe the local session; a failed biometric prompt is
    /// retryable and wipes nothing.
    pub async fn restore_session(&self) -> Result<RestoreOutcome, AuthError> {
        let access_token = self.credentials.access_token().await?;
        let refresh_token = self.credentials.refresh_token().await?;
        let (Some(_access_token), Some(refresh_token)) = (access_token, refresh_token) else {
            return Ok(RestoreOutcome::LoginRequired);
        };

        let recovered = match self.sessions.recover_session(&refresh_token).await {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(error = %e, "session recovery rejected, forcing re-login");
                self.credentials.clear_session().await?;
                return Ok(RestoreOutcome::LoginRequired);
            }
        };

        let Some(device_id) = self.credentials.device_id().await? else {
            return Ok(RestoreOutcome::LoginRequired);
        };

        let record = self
            .registry
            .find_device(&recovered.user_id, &device_id)
            .await?;
        let record = match record {
            Some(r) if !r.revoked => r,
            _ => {
                self.wipe_after_breach(&recovered.user_id, &device_id, "device_missing_or_revoked")
                    .await?;
                return Ok(RestoreOutcome::LoginRequired);
            }
        };

        // Replay detection runs whether or not biometric is enabled: the
        // fingerprint binds the recovered token to this device.
        if let Some(stored) = record.token_fingerprint.as_deref() {
            let expected = token_fingerprint(&recovered.access_token, &device_id);
            if stored != expected {
                tracing::warn!(user_id = %recovered.user_id, device_id,
                    "token fingerprint mismatch, treating as replay");
                self.wipe_after_breach(&recovered.user_id, &device_id, "token_fingerprint_mismatch")
                    .await?;
                return Ok(RestoreOutcome::LoginRequired);
            }
        }

        if record.biometric_enabled {
            match self.biometric.authenticate(RESTORE_PROMPT, true).await {
                Ok(true) => {}
                // Retryable: session stays intact, distinct from the breach
                // wipes above.
                Ok(false) => return Ok(RestoreOutcome::BiometricFailed),
                Err(e) => return Err(AuthError::Biometric(e)),
            }
        }

        self.credentials
            .set_session(
                &recovered.user_id,
                &recovered.access_token,
                &recovered.refresh_token,
            )
            .await?;
        self.credentials.touch_last_activity().await?;

        Ok(RestoreOutcome::Success)
    }

    /// Single source of truth for "is biometric set up for this user on this
    /// device". Every gap (no device id, no token, no record, revoked, flag
    /// off, any lookup error) is `false`; this never errors.
    pub async fn is_biometric_already_enabled(&self, user_id: &str) -> bool {
        let Ok(Some(device_id)) = self.credentials.device_id().await else {
            return false;
        };
        let Ok(Some(_)) = self.credentials.access_token().await else {
            return false;
        };
        match self.registry.find_device(user_id, &device_id).await {
            Ok(Some(record)) => !record.revoked && record.biometric_enabled,
            _ => false,
        }
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        let user_id = self.credentials.user_id().await?;
        self.credentials.clear_session().await?;
        if let Some(user_id) = user_id {
            self.audit
                .record(NewAuditEntry::new("logout").user(&user_id))
                .await;
        }
        Ok(())
    }

    /// Diagnostic snapshot of the local store.
    pub async fn local_session(&self) -> Result<LocalSession, AuthError> {
        Ok(LocalSession {
            device_id: self.credentials.device_id().await?,
            user_id: self.credentials.user_id().await?,
            access_token: self.credentials.access_token().await?,
            refresh_token: self.credentials.refresh_token().await?,
            biometric_enabled: self.credentials.biometric_enabled().await?,
            last_activity: self.credentials.last_activity().await?,
        })
    }

    async fn wipe_after_breach(
        &self,
        user_id: &str,
        device_id: &str,
        action: &str,
    ) -> Result<(), AuthError> {
        // clear_session drops the biometric flag along with the tokens.
        self.credentials.clear_session().await?;
        self.audit
            .record(NewAuditEntry::new(action).user(user_id).device(device_id))
            .await;
        Ok(())
    }
}
