use axum::extract::State;
use axum::Json;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{LocationType, NewLocationType};
use crate::registry::validate;
use crate::state::SharedState;

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<LocationType>>, AppError> {
    let types = db::location_types::list(&state.pool).await?;
    Ok(Json(types))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<NewLocationType>,
) -> Result<Json<LocationType>, AppError> {
    validate::validate_location_type(&req)?;

    let location_type = db::location_types::create(&state.pool, &req, auth.user_id)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::duplicate("name", "A location type with this name already exists")
            }
            _ => AppError::Database(e),
        })?;

    Ok(Json(location_type))
}
