use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Company, NewCompany};

pub async fn list(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    company: &NewCompany,
    actor: Uuid,
) -> Result<Company, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "INSERT INTO companies
            (name, trading_name, registration_number, tax_number, phone, email,
             address_line1, city, country, establishment_date, created_by, updated_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11) RETURNING *",
    )
    .bind(&company.name)
    .bind(&company.trading_name)
    .bind(&company.registration_number)
    .bind(&company.tax_number)
    .bind(&company.phone)
    .bind(&company.email)
    .bind(&company.address_line1)
    .bind(&company.city)
    .bind(&company.country)
    .bind(company.establishment_date)
    .bind(actor)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Row-lock the given companies for the rest of the transaction and return the ids that exist.
/// Locks are taken in id order so two writers touching the same pair cannot deadlock.
pub async fn lock<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    ids: &[Uuid],
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM companies WHERE id = ANY($1) ORDER BY id FOR UPDATE",
    )
    .bind(ids)
    .fetch_all(executor)
    .await
}
