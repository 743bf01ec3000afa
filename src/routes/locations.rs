use axum::extract::{Path, Query, State};
use axum::Json;
use futures_util::{future, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::{self, AuditContext, FieldChange};
use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Location, LocationAuditEntry, LocationDraft, LocationStatus, OperatingHours};
use crate::origin::RequestOrigin;
use crate::registry::{self, service, LocationChanges};
use crate::state::SharedState;

const DEFAULT_AUDIT_PAGE: usize = 50;
const MAX_AUDIT_PAGE: usize = 500;

#[derive(Deserialize)]
pub struct CreateLocation {
    pub location_type_id: Uuid,
    pub name: String,
    pub code: String,
    pub contact_person: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub operating_hours: Option<OperatingHours>,
    #[serde(default)]
    pub status: LocationStatus,
    #[serde(default)]
    pub is_headquarters: bool,
    #[serde(default)]
    pub notes: String,
}

impl CreateLocation {
    fn into_draft(self, company_id: Uuid) -> LocationDraft {
        LocationDraft {
            company_id,
            location_type_id: self.location_type_id,
            name: self.name,
            code: self.code,
            contact_person: self.contact_person,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            city: self.city,
            state: self.state,
            country: self.country,
            postal_code: self.postal_code,
            latitude: self.latitude,
            longitude: self.longitude,
            operating_hours: self.operating_hours,
            status: self.status,
            is_headquarters: self.is_headquarters,
            notes: self.notes,
        }
    }
}

#[derive(Serialize)]
pub struct UpdateResponse {
    pub location: Location,
    pub changes: Vec<FieldChange>,
}

#[derive(Deserialize)]
pub struct AuditQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn list_by_company(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<Vec<Location>>, AppError> {
    let locations = registry::list_by_company(&state.pool, company_id).await?;
    Ok(Json(locations))
}

pub async fn create(
    auth: AuthUser,
    origin: RequestOrigin,
    State(state): State<SharedState>,
    Path(company_id): Path<Uuid>,
    Json(req): Json<CreateLocation>,
) -> Result<Json<Location>, AppError> {
    let ctx = AuditContext::new(&auth, origin);
    let location = service::create_location(&state.pool, req.into_draft(company_id), &ctx).await?;
    Ok(Json(location))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Location>, AppError> {
    let location = registry::get(&state.pool, id).await?;
    Ok(Json(location))
}

pub async fn update(
    auth: AuthUser,
    origin: RequestOrigin,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<LocationChanges>,
) -> Result<Json<UpdateResponse>, AppError> {
    let ctx = AuditContext::new(&auth, origin);
    let updated = service::update_location(&state.pool, id, changes, &ctx).await?;
    Ok(Json(UpdateResponse {
        location: updated.location,
        changes: updated.changes,
    }))
}

pub async fn delete(
    auth: AuthUser,
    origin: RequestOrigin,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Location>, AppError> {
    let ctx = AuditContext::new(&auth, origin);
    let snapshot = service::delete_location(&state.pool, id, &ctx).await?;
    Ok(Json(snapshot))
}

pub async fn purge(
    auth: AuthUser,
    origin: RequestOrigin,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ctx = AuditContext::new(&auth, origin);
    service::purge_location(&state.pool, id, &ctx).await?;
    Ok(Json(serde_json::json!({ "message": "Purged" })))
}

/// Audit history of a location, newest first. Logically deleted locations keep theirs.
pub async fn audit_log(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<LocationAuditEntry>>, AppError> {
    db::locations::find_including_deleted(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Location not found".to_string()))?;

    let limit = query.limit.unwrap_or(DEFAULT_AUDIT_PAGE).min(MAX_AUDIT_PAGE);
    let offset = query.offset.unwrap_or(0);

    // Errors inside the skipped prefix must still surface, so no plain `skip`.
    let mut seen = 0;
    let entries: Vec<LocationAuditEntry> = audit::entries_for(&state.pool, id)
        .try_skip_while(|_| {
            seen += 1;
            future::ready(Ok(seen <= offset))
        })
        .take(limit)
        .try_collect()
        .await?;

    Ok(Json(entries))
}
