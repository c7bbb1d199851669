use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::DbPool;

use super::model::{CodeChannel, TwoFactorCode};

#[derive(Clone)]
pub struct TwoFactorCrud {
    pool: DbPool,
}

impl TwoFactorCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: &str,
        code: &str,
        channel: CodeChannel,
        expires_at: DateTime<Utc>,
    ) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO two_factor_codes (id, user_id, code, code_type, expires_at, verified, attempts, created_at)
            VALUES (?, ?, ?, ?, ?, 0, 0, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(code)
        .bind(channel.as_str())
        .bind(expires_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// The only live code per (user, channel) is the most recently created
    /// unverified one; older codes are dead the moment a new one is issued.
    pub async fn find_latest_unverified(
        &self,
        user_id: &str,
        channel: CodeChannel,
    ) -> Result<Option<TwoFactorCode>, sqlx::Error> {
        sqlx::query_as::<_, TwoFactorCode>(
            r#"
            SELECT * FROM two_factor_codes
            WHERE user_id = ? AND code_type = ? AND verified = 0
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(channel.as_str())
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn increment_attempts(&self, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE two_factor_codes SET attempts = attempts + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn mark_verified(&self, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE two_factor_codes SET verified = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Deletes codes past their expiry. Expired codes are already unusable;
    /// this only keeps the table bounded. Safe to run repeatedly and
    /// concurrently with verification reads.
    pub async fn sweep_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM two_factor_codes WHERE expires_at < ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
