pub const MAX_ATTEMPTS: i64 = 3;
pub const CODE_TTL_MINUTES: i64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum TwoFactorError {
    #[error("No verification code is pending")]
    NotFound,

    #[error("Verification code has expired")]
    Expired,

    #[error("Too many incorrect attempts, request a new code")]
    AttemptsExceeded,

    #[error("Incorrect code, {remaining} attempt(s) remaining")]
    Invalid { remaining: i64 },

    #[error("Code delivery failed: {0}")]
    Delivery(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
