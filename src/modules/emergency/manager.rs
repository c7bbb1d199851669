use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use crate::config::DbPool;
use crate::modules::audit::{model::NewAuditEntry, AuditLog};
use crate::services::biometric::BiometricGate;

use super::crud::{EmergencyAccessCrud, NewGrant};
use super::model::{EmergencyAccessGrant, RequesterRole};
use super::schema::{EmergencyAccessError, GRANT_TTL_MINUTES};

/// Break-glass access: time-boxed, biometric-verified, audited elevation of
/// access to a patient's record for doctors and first responders.
pub struct EmergencyAccessManager {
    crud: EmergencyAccessCrud,
    biometric: Arc<dyn BiometricGate>,
    audit: AuditLog,
}

impl EmergencyAccessManager {
    pub fn new(pool: DbPool, biometric: Arc<dyn BiometricGate>, audit: AuditLog) -> Self {
        Self {
            crud: EmergencyAccessCrud::new(pool),
            biometric,
            audit,
        }
    }

    pub async fn request_access(
        &self,
        requester_id: &str,
        requester_role: RequesterRole,
        patient_id: &str,
        reason: &str,
        additional_notes: Option<&str>,
    ) -> Result<String, EmergencyAccessError> {
        if !requester_role.may_request_emergency_access() {
            return Err(EmergencyAccessError::RoleNotPermitted);
        }

        if !self.biometric.is_available().await {
            return Err(EmergencyAccessError::BiometricUnavailable);
        }

        match self
            .biometric
            .authenticate("Confirm your identity for emergency access", true)
            .await
        {
            Ok(true) => {}
            Ok(false) => return Err(EmergencyAccessError::BiometricFailed),
            Err(_) => return Err(EmergencyAccessError::BiometricUnavailable),
        }

        let grant_id = self
            .crud
            .create(&NewGrant {
                requester_id,
                requester_role,
                patient_id,
                reason,
                additional_notes,
                expires_at: Utc::now() + Duration::minutes(GRANT_TTL_MINUTES),
            })
            .await?;

        tracing::info!(requester_id, patient_id, grant_id, "emergency access granted");

        self.audit
            .record(
                NewAuditEntry::new("emergency_access_granted")
                    .user(requester_id)
                    .resource("patient_record", patient_id)
                    .metadata(json!({
                        "grant_id": grant_id,
                        "requester_role": requester_role.as_str(),
                        "reason": reason,
                    })),
            )
            .await;

        Ok(grant_id)
    }

    /// Time-accurate even before the sweep runs: a grant past its expiry is
    /// inactive no matter what the stored status still says.
    pub async fn has_active_access(
        &self,
        requester_id: &str,
        patient_id: &str,
    ) -> Result<bool, EmergencyAccessError> {
        let now = Utc::now();
        let grants = self.crud.active_grants(requester_id, patient_id).await?;
        Ok(grants.iter().any(|g| g.expires_at > now))
    }

    pub async fn revoke_access(&self, grant_id: &str) -> Result<(), EmergencyAccessError> {
        let updated = self.crud.revoke(grant_id).await?;
        if updated == 0 {
            return Err(EmergencyAccessError::GrantNotFound);
        }

        self.audit
            .record(
                NewAuditEntry::new("emergency_access_revoked")
                    .resource("emergency_access", grant_id),
            )
            .await;

        Ok(())
    }

    pub async fn find_grant(
        &self,
        grant_id: &str,
    ) -> Result<Option<EmergencyAccessGrant>, EmergencyAccessError> {
        Ok(self.crud.find(grant_id).await?)
    }

    pub async fn sweep_expired(&self) -> Result<u64, EmergencyAccessError> {
        Ok(self.crud.sweep_expired().await?)
    }
}
