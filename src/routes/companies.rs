use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Company, NewCompany};
use crate::registry::validate;
use crate::state::SharedState;

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Company>>, AppError> {
    let companies = db::companies::list(&state.pool).await?;
    Ok(Json(companies))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<NewCompany>,
) -> Result<Json<Company>, AppError> {
    validate::validate_company(&req, Utc::now().date_naive())?;

    let company = db::companies::create(&state.pool, &req, auth.user_id)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                match db_err.constraint() {
                    Some("companies_registration_number_key") => AppError::duplicate(
                        "registration_number",
                        "A company with this registration number already exists",
                    ),
                    Some("companies_tax_number_key") => AppError::duplicate(
                        "tax_number",
                        "A company with this tax number already exists",
                    ),
                    _ => AppError::duplicate("name", "A company with this name already exists"),
                }
            }
            _ => AppError::Database(e),
        })?;

    tracing::info!(company_id = %company.id, user_id = %auth.user_id, "company created");
    Ok(Json(company))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    let company = db::companies::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
    Ok(Json(company))
}
