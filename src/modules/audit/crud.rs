use chrono::Utc;
use uuid::Uuid;

use crate::config::DbPool;

use super::model::{AuditRow, NewAuditEntry};

#[derive(Clone)]
pub struct AuditCrud {
    pool: DbPool,
}

impl AuditCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn append(&self, entry: &NewAuditEntry) -> Result<(), sqlx::Error> {
        let metadata = if entry.metadata.is_null() {
            None
        } else {
            Some(entry.metadata.to_string())
        };

        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, user_id, action, resource_type, resource_id, device_id, metadata, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&entry.user_id)
        .bind(&entry.action)
        .bind(&entry.resource_type)
        .bind(&entry.resource_id)
        .bind(&entry.device_id)
        .bind(metadata)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<AuditRow>, sqlx::Error> {
        sqlx::query_as::<_, AuditRow>(
            "SELECT * FROM audit_logs ORDER BY timestamp DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn recent_for_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<AuditRow>, sqlx::Error> {
        sqlx::query_as::<_, AuditRow>(
            "SELECT * FROM audit_logs WHERE user_id = ? ORDER BY timestamp DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}

/// Audit sink used by the security flows. Write failures are logged and
/// swallowed: the audit trail must never block or fail the primary flow.
#[derive(Clone)]
pub struct AuditLog {
    crud: AuditCrud,
}

impl AuditLog {
    pub fn new(pool: DbPool) -> Self {
        Self {
            crud: AuditCrud::new(pool),
        }
    }

    pub async fn record(&self, entry: NewAuditEntry) {
        if let Err(e) = self.crud.append(&entry).await {
            tracing::warn!(action = %entry.action, error = %e, "audit write failed");
        }
    }
}
