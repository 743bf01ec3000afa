use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{LocationType, NewLocationType};

pub async fn list(pool: &PgPool) -> Result<Vec<LocationType>, sqlx::Error> {
    sqlx::query_as::<_, LocationType>("SELECT * FROM location_types ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    location_type: &NewLocationType,
    actor: Uuid,
) -> Result<LocationType, sqlx::Error> {
    sqlx::query_as::<_, LocationType>(
        "INSERT INTO location_types (name, is_internal, description, created_by, updated_by)
         VALUES ($1, $2, $3, $4, $4) RETURNING *",
    )
    .bind(&location_type.name)
    .bind(location_type.is_internal)
    .bind(&location_type.description)
    .bind(actor)
    .fetch_one(pool)
    .await
}
