use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
        })
    }
}

/// One immutable row of `location_audit_log`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct LocationAuditEntry {
    pub id: Uuid,
    pub location_id: Uuid,
    pub action: AuditAction,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub ip_address: Option<String>,
    pub user_agent: String,
}
