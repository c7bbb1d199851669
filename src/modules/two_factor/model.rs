use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Delivery channel; stored in the `code_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeChannel {
    Email,
    Sms,
}

impl CodeChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeChannel::Email => "email",
            CodeChannel::Sms => "sms",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TwoFactorCode {
    pub id: String,
    pub user_id: String,
    pub code: String,
    pub code_type: String,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
    pub attempts: i64,
    pub created_at: DateTime<Utc>,
}
