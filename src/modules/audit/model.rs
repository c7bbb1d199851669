use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct AuditRow {
    pub id: String,
    pub user_id: Option<String>,
    pub action: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub device_id: Option<String>,
    pub metadata: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Append-only audit entry.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub user_id: Option<String>,
    pub action: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub device_id: Option<String>,
    pub metadata: Value,
}

impl NewAuditEntry {
    pub fn new(action: &str) -> Self {
        Self {
            user_id: None,
            action: action.to_string(),
            resource_type: None,
            resource_id: None,
            device_id: None,
            metadata: Value::Null,
        }
    }

    pub fn user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    pub fn resource(mut self, resource_type: &str, resource_id: &str) -> Self {
        self.resource_type = Some(resource_type.to_string());
        self.resource_id = Some(resource_id.to_string());
        self
    }

    pub fn device(mut self, device_id: &str) -> Self {
        self.device_id = Some(device_id.to_string());
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}
