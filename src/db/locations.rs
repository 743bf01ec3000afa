use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Location, LocationDraft};

pub async fn list_by_company(
    pool: &PgPool,
    company_id: Uuid,
) -> Result<Vec<Location>, sqlx::Error> {
    sqlx::query_as::<_, Location>(
        "SELECT * FROM locations WHERE company_id = $1 AND deleted_at IS NULL ORDER BY name",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await
}

pub async fn insert<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    draft: &LocationDraft,
    actor: Uuid,
) -> Result<Location, sqlx::Error> {
    sqlx::query_as::<_, Location>(
        "INSERT INTO locations
            (company_id, location_type_id, name, code, contact_person, contact_email,
             contact_phone, address_line1, address_line2, city, state, country, postal_code,
             latitude, longitude, operating_hours, status, is_headquarters, notes,
             created_by, updated_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                 $17, $18, $19, $20, $20)
         RETURNING *",
    )
    .bind(draft.company_id)
    .bind(draft.location_type_id)
    .bind(&draft.name)
    .bind(&draft.code)
    .bind(&draft.contact_person)
    .bind(&draft.contact_email)
    .bind(&draft.contact_phone)
    .bind(&draft.address_line1)
    .bind(&draft.address_line2)
    .bind(&draft.city)
    .bind(&draft.state)
    .bind(&draft.country)
    .bind(&draft.postal_code)
    .bind(draft.latitude)
    .bind(draft.longitude)
    .bind(draft.operating_hours.as_ref().map(Json))
    .bind(draft.status)
    .bind(draft.is_headquarters)
    .bind(&draft.notes)
    .bind(actor)
    .fetch_one(executor)
    .await
}

pub async fn update<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    draft: &LocationDraft,
    actor: Uuid,
) -> Result<Location, sqlx::Error> {
    sqlx::query_as::<_, Location>(
        "UPDATE locations SET
            company_id = $2, location_type_id = $3, name = $4, code = $5,
            contact_person = $6, contact_email = $7, contact_phone = $8,
            address_line1 = $9, address_line2 = $10, city = $11, state = $12,
            country = $13, postal_code = $14, latitude = $15, longitude = $16,
            operating_hours = $17, status = $18, is_headquarters = $19, notes = $20,
            updated_by = $21, updated_at = now()
         WHERE id = $1 AND deleted_at IS NULL
         RETURNING *",
    )
    .bind(id)
    .bind(draft.company_id)
    .bind(draft.location_type_id)
    .bind(&draft.name)
    .bind(&draft.code)
    .bind(&draft.contact_person)
    .bind(&draft.contact_email)
    .bind(&draft.contact_phone)
    .bind(&draft.address_line1)
    .bind(&draft.address_line2)
    .bind(&draft.city)
    .bind(&draft.state)
    .bind(&draft.country)
    .bind(&draft.postal_code)
    .bind(draft.latitude)
    .bind(draft.longitude)
    .bind(draft.operating_hours.as_ref().map(Json))
    .bind(draft.status)
    .bind(draft.is_headquarters)
    .bind(&draft.notes)
    .bind(actor)
    .fetch_one(executor)
    .await
}

/// Live (not logically deleted) location.
pub async fn find_by_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Location>, sqlx::Error> {
    sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Live location, row-locked until the surrounding transaction ends.
pub async fn find_by_id_for_update<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Location>, sqlx::Error> {
    sqlx::query_as::<_, Location>(
        "SELECT * FROM locations WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Any location row, logically deleted or not.
pub async fn find_including_deleted<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Location>, sqlx::Error> {
    sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn headquarters_exists<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    company_id: Uuid,
    excluding: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
            SELECT 1 FROM locations
            WHERE company_id = $1 AND is_headquarters AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR id <> $2)
         )",
    )
    .bind(company_id)
    .bind(excluding)
    .fetch_one(executor)
    .await
}

pub async fn mark_deleted<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    actor: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE locations SET deleted_at = now(), deleted_by = $2
         WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .bind(actor)
    .execute(executor)
    .await?;
    Ok(())
}

/// Physically remove a logically deleted location. Its audit rows go with it.
pub async fn purge<'e, E: sqlx::PgExecutor<'e>>(executor: E, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM locations WHERE id = $1 AND deleted_at IS NOT NULL")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
