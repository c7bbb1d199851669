use async_trait::async_trait;
use chrono::Utc;

use crate::config::DbPool;

use super::interface::{DeviceRegistry, Result};
use super::model::{DeviceRecord, DeviceRow};
use super::schema::DeviceRegistration;

#[derive(Clone)]
pub struct DeviceCrud {
    pool: DbPool,
}

impl DeviceCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceRegistry for DeviceCrud {
    async fn find_device(
        &self,
        user_id: &str,
        device_id: &str,
    ) -> Result<Option<DeviceRecord>> {
        let row = sqlx::query_as::<_, DeviceRow>(
            "SELECT * FROM user_devices WHERE user_id = ? AND device_id = ?",
        )
        .bind(user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DeviceRecord::from))
    }

    async fn register_device(&self, registration: &DeviceRegistration) -> Result<()> {
        // The conflict arm deliberately leaves revoked, revoked_at and
        // registered_at alone: re-registering a device can never un-revoke
        // it or rewrite history.
        sqlx::query(
            r#"
            INSERT INTO user_devices (
                user_id, device_id, device_name, platform, device_model, os_version,
                biometric_enabled, trusted, revoked, token_fingerprint,
                registered_at, last_used_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)
            ON CONFLICT (user_id, device_id) DO UPDATE SET
                device_name = excluded.device_name,
                platform = excluded.platform,
                device_model = excluded.device_model,
                os_version = excluded.os_version,
                biometric_enabled = excluded.biometric_enabled,
                trusted = excluded.trusted,
                token_fingerprint = excluded.token_fingerprint,
                last_used_at = excluded.last_used_at
            "#,
        )
        .bind(&registration.user_id)
        .bind(&registration.device_id)
        .bind(&registration.device_name)
        .bind(&registration.platform)
        .bind(&registration.device_model)
        .bind(&registration.os_version)
        .bind(registration.biometric_enabled)
        .bind(registration.trusted)
        .bind(&registration.token_fingerprint)
        .bind(Utc::now())
        .bind(registration.last_used_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn revoke_device(&self, user_id: &str, device_id: &str) -> Result<()> {
        // COALESCE keeps the original revocation timestamp on repeat calls.
        let result = sqlx::query(
            r#"
            UPDATE user_devices
            SET revoked = 1, revoked_at = COALESCE(revoked_at, ?), trusted = 0
            WHERE user_id = ? AND device_id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(user_id)
        .bind(device_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(super::interface::DeviceError::NotFound);
        }

        Ok(())
    }

    async fn delete_device(&self, user_id: &str, device_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM user_devices WHERE user_id = ? AND device_id = ?")
            .bind(user_id)
            .bind(device_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(super::interface::DeviceError::NotFound);
        }

        Ok(())
    }

    async fn update_biometric_status(
        &self,
        user_id: &str,
        device_id: &str,
        enabled: bool,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE user_devices SET biometric_enabled = ? WHERE user_id = ? AND device_id = ?",
        )
        .bind(enabled)
        .bind(user_id)
        .bind(device_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(super::interface::DeviceError::NotFound);
        }

        Ok(())
    }

    async fn list_user_devices(&self, user_id: &str) -> Result<Vec<DeviceRecord>> {
        let rows = sqlx::query_as::<_, DeviceRow>(
            r#"
            SELECT * FROM user_devices
            WHERE user_id = ? AND (revoked IS NULL OR revoked = 0)
            ORDER BY last_used_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DeviceRecord::from).collect())
    }
}
