//! Units of work: each registry write commits together with its audit entries or not at all.

use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext};
use crate::error::AppError;
use crate::models::{Location, LocationDraft};
use crate::registry::{self, LocationChanges, Updated};

pub async fn create_location(
    pool: &PgPool,
    draft: LocationDraft,
    ctx: &AuditContext,
) -> Result<Location, AppError> {
    let mut tx = pool.begin().await?;

    let location = registry::create(&mut *tx, draft, ctx.user_id).await?;
    audit::record_create(&mut *tx, &location, ctx).await?;

    tx.commit().await?;

    tracing::info!(
        location_id = %location.id,
        company_id = %location.company_id,
        user_id = %ctx.user_id,
        "location created"
    );
    Ok(location)
}

pub async fn update_location(
    pool: &PgPool,
    id: Uuid,
    changes: LocationChanges,
    ctx: &AuditContext,
) -> Result<Updated, AppError> {
    let mut tx = pool.begin().await?;

    let updated = registry::update(&mut *tx, id, changes, ctx.user_id).await?;
    let written =
        audit::record_update(&mut *tx, &updated.location, &updated.changes, ctx).await?;

    tx.commit().await?;

    if written > 0 {
        tracing::info!(
            location_id = %id,
            user_id = %ctx.user_id,
            fields = written,
            "location updated"
        );
    }
    Ok(updated)
}

/// Returns the snapshot taken before the location was removed.
pub async fn delete_location(
    pool: &PgPool,
    id: Uuid,
    ctx: &AuditContext,
) -> Result<Location, AppError> {
    let mut tx = pool.begin().await?;

    let snapshot = registry::snapshot_for_delete(&mut *tx, id).await?;
    // The delete entry must reference a row that still exists.
    audit::record_delete(&mut *tx, &snapshot, ctx).await?;
    registry::remove(&mut *tx, &snapshot, ctx.user_id).await?;

    tx.commit().await?;

    tracing::info!(location_id = %id, user_id = %ctx.user_id, "location deleted");
    Ok(snapshot)
}

pub async fn purge_location(pool: &PgPool, id: Uuid, ctx: &AuditContext) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    registry::purge(&mut *tx, id).await?;
    tx.commit().await?;

    tracing::warn!(
        location_id = %id,
        user_id = %ctx.user_id,
        "location purged with its audit history"
    );
    Ok(())
}
