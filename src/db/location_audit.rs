use chrono::{DateTime, Utc};
use futures_util::stream::BoxStream;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AuditAction, LocationAuditEntry};

pub struct NewAuditEntry<'a> {
    pub id: Uuid,
    pub location_id: Uuid,
    pub action: AuditAction,
    pub field_name: &'a str,
    pub old_value: Option<&'a str>,
    pub new_value: Option<&'a str>,
    pub recorded_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub ip_address: Option<&'a str>,
    pub user_agent: &'a str,
}

pub async fn insert<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    entry: &NewAuditEntry<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO location_audit_log
            (id, location_id, action, field_name, old_value, new_value,
             recorded_at, user_id, ip_address, user_agent)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(entry.id)
    .bind(entry.location_id)
    .bind(entry.action)
    .bind(entry.field_name)
    .bind(entry.old_value)
    .bind(entry.new_value)
    .bind(entry.recorded_at)
    .bind(entry.user_id)
    .bind(entry.ip_address)
    .bind(entry.user_agent)
    .execute(executor)
    .await?;
    Ok(())
}

pub fn stream_by_location(
    pool: &PgPool,
    location_id: Uuid,
) -> BoxStream<'_, Result<LocationAuditEntry, sqlx::Error>> {
    sqlx::query_as::<_, LocationAuditEntry>(
        "SELECT * FROM location_audit_log WHERE location_id = $1
         ORDER BY recorded_at DESC, id DESC",
    )
    .bind(location_id)
    .fetch(pool)
}
