//! Location change audit trail.
//!
//! Entries are written on the caller's connection so they commit or roll back
//! together with the registry write they describe. Failures surface as
//! [`AppError::AuditWrite`] and are never swallowed.

use std::net::IpAddr;

use chrono::Utc;
use futures_util::stream::BoxStream;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::location_audit::NewAuditEntry;
use crate::error::AppError;
use crate::models::{AuditAction, Location, LocationAuditEntry};
use crate::origin::RequestOrigin;

/// Who is acting and from where. Threaded explicitly through every mutating call.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditContext {
    pub user_id: Uuid,
    pub ip_address: Option<IpAddr>,
    pub user_agent: String,
}

impl AuditContext {
    pub fn new(user: &AuthUser, origin: RequestOrigin) -> Self {
        AuditContext {
            user_id: user.user_id,
            ip_address: origin.ip_address,
            user_agent: origin.user_agent,
        }
    }
}

/// An entity whose fields can be rendered to display text for the audit log.
pub trait Auditable {
    /// Every audited field in a stable order, rendered as text. `None` means the value is absent.
    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Fields whose rendered text differs between `before` and `after`.
pub fn diff<T: Auditable>(before: &T, after: &T) -> Vec<FieldChange> {
    before
        .audit_fields()
        .into_iter()
        .zip(after.audit_fields())
        .filter(|((_, old), (_, new))| old != new)
        .map(|((field, old_value), (_, new_value))| FieldChange {
            field,
            old_value,
            new_value,
        })
        .collect()
}

pub async fn record_create(
    conn: &mut PgConnection,
    location: &Location,
    ctx: &AuditContext,
) -> Result<(), AppError> {
    write(conn, location.id, AuditAction::Create, None, ctx).await
}

/// One entry per change. An empty change set writes nothing.
pub async fn record_update(
    conn: &mut PgConnection,
    location: &Location,
    changes: &[FieldChange],
    ctx: &AuditContext,
) -> Result<usize, AppError> {
    for change in changes {
        write(&mut *conn, location.id, AuditAction::Update, Some(change), ctx).await?;
    }
    Ok(changes.len())
}

/// Must run while `location` still exists, before the registry removes it.
pub async fn record_delete(
    conn: &mut PgConnection,
    location: &Location,
    ctx: &AuditContext,
) -> Result<(), AppError> {
    write(conn, location.id, AuditAction::Delete, None, ctx).await
}

/// Newest-first entries for one location. Each call starts a fresh query.
pub fn entries_for(
    pool: &PgPool,
    location_id: Uuid,
) -> BoxStream<'_, Result<LocationAuditEntry, sqlx::Error>> {
    db::location_audit::stream_by_location(pool, location_id)
}

async fn write(
    conn: &mut PgConnection,
    location_id: Uuid,
    action: AuditAction,
    change: Option<&FieldChange>,
    ctx: &AuditContext,
) -> Result<(), AppError> {
    let ip_address = ctx.ip_address.map(|ip| ip.to_string());
    let entry = NewAuditEntry {
        id: Uuid::now_v7(),
        location_id,
        action,
        field_name: change.map(|c| c.field).unwrap_or(""),
        old_value: change.and_then(|c| c.old_value.as_deref()),
        new_value: change.and_then(|c| c.new_value.as_deref()),
        recorded_at: Utc::now(),
        user_id: ctx.user_id,
        ip_address: ip_address.as_deref(),
        user_agent: &ctx.user_agent,
    };

    db::location_audit::insert(conn, &entry)
        .await
        .map_err(AppError::AuditWrite)?;

    tracing::debug!(
        location_id = %location_id,
        action = %action,
        field = entry.field_name,
        "audit entry written"
    );
    Ok(())
}
