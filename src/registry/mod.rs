//! Location registry: the authoritative store for locations.
//!
//! Every function here runs on a caller-supplied connection, normally a
//! transaction opened by [`service`], so the invariant checks and the write
//! they guard share one snapshot and one commit.

pub mod changes;
pub mod service;
pub mod validate;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::audit::{self, FieldChange};
use crate::db;
use crate::error::AppError;
use crate::models::{Location, LocationDraft};

pub use changes::LocationChanges;

/// Result of a persisted update: the new row and the fields that changed.
#[derive(Debug, Clone)]
pub struct Updated {
    pub location: Location,
    pub changes: Vec<FieldChange>,
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Location, AppError> {
    db::locations::find_by_id(pool, id)
        .await?
        .ok_or_else(location_not_found)
}

pub async fn list_by_company(pool: &PgPool, company_id: Uuid) -> Result<Vec<Location>, AppError> {
    db::companies::find_by_id(pool, company_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    Ok(db::locations::list_by_company(pool, company_id).await?)
}

pub async fn create(
    conn: &mut PgConnection,
    draft: LocationDraft,
    actor: Uuid,
) -> Result<Location, AppError> {
    let draft = prepare(draft)?;

    lock_companies(conn, &[draft.company_id]).await?;
    ensure_single_headquarters(conn, &draft, None).await?;

    db::locations::insert(&mut *conn, &draft, actor)
        .await
        .map_err(map_write_error)
}

/// Apply `changes` to a live location. Fields whose value does not actually
/// change are not reported, and a change set that changes nothing writes nothing.
pub async fn update(
    conn: &mut PgConnection,
    id: Uuid,
    changes: LocationChanges,
    actor: Uuid,
) -> Result<Updated, AppError> {
    let current = db::locations::find_by_id_for_update(&mut *conn, id)
        .await?
        .ok_or_else(location_not_found)?;

    let before = LocationDraft::from(&current);
    let after = prepare(changes.apply(before.clone()))?;

    let changes = audit::diff(&before, &after);
    if changes.is_empty() {
        return Ok(Updated {
            location: current,
            changes,
        });
    }

    lock_companies(conn, &[before.company_id, after.company_id]).await?;
    ensure_single_headquarters(conn, &after, Some(id)).await?;

    let location = db::locations::update(&mut *conn, id, &after, actor)
        .await
        .map_err(map_write_error)?;

    Ok(Updated { location, changes })
}

/// Lock a live location and return its pre-delete snapshot.
pub async fn snapshot_for_delete(conn: &mut PgConnection, id: Uuid) -> Result<Location, AppError> {
    db::locations::find_by_id_for_update(&mut *conn, id)
        .await?
        .ok_or_else(location_not_found)
}

/// Logically delete a location previously locked by [`snapshot_for_delete`].
pub async fn remove(conn: &mut PgConnection, location: &Location, actor: Uuid) -> Result<(), AppError> {
    db::locations::mark_deleted(&mut *conn, location.id, actor).await?;
    Ok(())
}

/// Physically remove a logically deleted location together with its audit history.
pub async fn purge(conn: &mut PgConnection, id: Uuid) -> Result<(), AppError> {
    let location = db::locations::find_including_deleted(&mut *conn, id)
        .await?
        .ok_or_else(location_not_found)?;

    if location.deleted_at.is_none() {
        return Err(AppError::Conflict(
            "Location must be deleted before it can be purged".to_string(),
        ));
    }

    db::locations::purge(&mut *conn, id).await?;
    Ok(())
}

fn prepare(mut draft: LocationDraft) -> Result<LocationDraft, AppError> {
    draft.operating_hours = validate::normalize_hours(draft.operating_hours);
    validate::validate_location(&draft)?;
    Ok(draft)
}

// Serialises headquarters checks per organization: whoever holds the company
// row lock sees every headquarters flag committed before it.
async fn lock_companies(conn: &mut PgConnection, ids: &[Uuid]) -> Result<(), AppError> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();

    let locked = db::companies::lock(&mut *conn, &ids).await?;
    if locked.len() != ids.len() {
        return Err(AppError::NotFound("Company not found".to_string()));
    }
    Ok(())
}

async fn ensure_single_headquarters(
    conn: &mut PgConnection,
    draft: &LocationDraft,
    excluding: Option<Uuid>,
) -> Result<(), AppError> {
    if !draft.is_headquarters {
        return Ok(());
    }

    if db::locations::headquarters_exists(&mut *conn, draft.company_id, excluding).await? {
        return Err(headquarters_taken());
    }
    Ok(())
}

fn map_write_error(err: sqlx::Error) -> AppError {
    let constraint = match &err {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_owned),
        _ => None,
    };

    match constraint.as_deref() {
        Some("locations_code_key") => {
            AppError::duplicate("code", "A location with this code already exists")
        }
        Some("locations_company_name_key") => AppError::duplicate(
            "name",
            "This company already has a location with this name",
        ),
        Some("locations_one_headquarters_per_company") => headquarters_taken(),
        Some("locations_location_type_id_fkey") => {
            AppError::BadRequest("location_type_id: Unknown location type".to_string())
        }
        Some("locations_company_id_fkey") => AppError::NotFound("Company not found".to_string()),
        _ => AppError::Database(err),
    }
}

fn headquarters_taken() -> AppError {
    AppError::invariant(
        "is_headquarters",
        "This company already has a headquarters location.",
    )
}

fn location_not_found() -> AppError {
    AppError::NotFound("Location not found".to_string())
}
