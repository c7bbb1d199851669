use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Requesting user's role. Only doctors and first responders may break
/// the glass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequesterRole {
    Patient,
    Doctor,
    Pharmacist,
    FirstResponder,
}

impl RequesterRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequesterRole::Patient => "patient",
            RequesterRole::Doctor => "doctor",
            RequesterRole::Pharmacist => "pharmacist",
            RequesterRole::FirstResponder => "first_responder",
        }
    }

    pub fn may_request_emergency_access(&self) -> bool {
        matches!(self, RequesterRole::Doctor | RequesterRole::FirstResponder)
    }
}

/// Grant lifecycle. `active` moves to `expired` (sweep) or `revoked`
/// (explicit); both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantStatus {
    Active,
    Expired,
    Revoked,
}

impl GrantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantStatus::Active => "active",
            GrantStatus::Expired => "expired",
            GrantStatus::Revoked => "revoked",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct EmergencyAccessGrant {
    pub id: String,
    pub requester_id: String,
    pub requester_role: String,
    pub patient_id: String,
    pub reason: String,
    pub additional_notes: Option<String>,
    pub granted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub biometric_verified: bool,
    pub status: String,
}
