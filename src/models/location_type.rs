use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct LocationType {
    pub id: Uuid,
    pub name: String,
    pub is_internal: bool,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLocationType {
    pub name: String,
    #[serde(default = "default_true")]
    pub is_internal: bool,
    #[serde(default)]
    pub description: String,
}

fn default_true() -> bool {
    true
}
