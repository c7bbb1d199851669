use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::DbPool;

use super::model::{EmergencyAccessGrant, GrantStatus, RequesterRole};

#[derive(Clone)]
pub struct EmergencyAccessCrud {
    pool: DbPool,
}

pub struct NewGrant<'a> {
    pub requester_id: &'a str,
    pub requester_role: RequesterRole,
    pub patient_id: &'a str,
    pub reason: &'a str,
    pub additional_notes: Option<&'a str>,
    pub expires_at: DateTime<Utc>,
}

impl EmergencyAccessCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, grant: &NewGrant<'_>) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO emergency_access (
                id, requester_id, requester_role, patient_id, reason, additional_notes,
                granted_at, expires_at, biometric_verified, status
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(&id)
        .bind(grant.requester_id)
        .bind(grant.requester_role.as_str())
        .bind(grant.patient_id)
        .bind(grant.reason)
        .bind(grant.additional_notes)
        .bind(Utc::now())
        .bind(grant.expires_at)
        .bind(GrantStatus::Active.as_str())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn find(&self, id: &str) -> Result<Option<EmergencyAccessGrant>, sqlx::Error> {
        sqlx::query_as::<_, EmergencyAccessGrant>("SELECT * FROM emergency_access WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn active_grants(
        &self,
        requester_id: &str,
        patient_id: &str,
    ) -> Result<Vec<EmergencyAccessGrant>, sqlx::Error> {
        sqlx::query_as::<_, EmergencyAccessGrant>(
            r#"
            SELECT * FROM emergency_access
            WHERE requester_id = ? AND patient_id = ? AND status = ?
            "#,
        )
        .bind(requester_id)
        .bind(patient_id)
        .bind(GrantStatus::Active.as_str())
        .fetch_all(&self.pool)
        .await
    }

    /// `active -> revoked`, only from `active`.
    pub async fn revoke(&self, id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE emergency_access SET status = ?, revoked_at = ? WHERE id = ? AND status = ?",
        )
        .bind(GrantStatus::Revoked.as_str())
        .bind(Utc::now())
        .bind(id)
        .bind(GrantStatus::Active.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Flips every overdue active grant to expired. Forward-only and
    /// time-filtered, so concurrent sweeps and reads are safe.
    pub async fn sweep_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE emergency_access SET status = ? WHERE status = ? AND expires_at < ?",
        )
        .bind(GrantStatus::Expired.as_str())
        .bind(GrantStatus::Active.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
