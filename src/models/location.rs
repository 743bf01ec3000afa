use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use crate::audit::Auditable;

/// Weekday name (lowercase) -> opening hours, e.g. `"monday" => "08:00-17:00"`.
pub type OperatingHours = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum LocationStatus {
    #[default]
    Active,
    Inactive,
    Temporary,
    UnderMaintenance,
}

impl LocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationStatus::Active => "active",
            LocationStatus::Inactive => "inactive",
            LocationStatus::Temporary => "temporary",
            LocationStatus::UnderMaintenance => "under_maintenance",
        }
    }
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub company_id: Uuid,
    pub location_type_id: Uuid,
    pub name: String,
    pub code: String,
    pub contact_person: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub operating_hours: Option<Json<OperatingHours>>,
    pub status: LocationStatus,
    pub is_headquarters: bool,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Uuid,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
}

impl Location {
    pub fn hours(&self) -> Option<&OperatingHours> {
        self.operating_hours.as_ref().map(|h| &h.0)
    }
}

/// The writable state of a location: everything except identity, stamps and deletion marks.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDraft {
    pub company_id: Uuid,
    pub location_type_id: Uuid,
    pub name: String,
    pub code: String,
    pub contact_person: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub operating_hours: Option<OperatingHours>,
    pub status: LocationStatus,
    pub is_headquarters: bool,
    pub notes: String,
}

impl From<&Location> for LocationDraft {
    fn from(location: &Location) -> Self {
        LocationDraft {
            company_id: location.company_id,
            location_type_id: location.location_type_id,
            name: location.name.clone(),
            code: location.code.clone(),
            contact_person: location.contact_person.clone(),
            contact_email: location.contact_email.clone(),
            contact_phone: location.contact_phone.clone(),
            address_line1: location.address_line1.clone(),
            address_line2: location.address_line2.clone(),
            city: location.city.clone(),
            state: location.state.clone(),
            country: location.country.clone(),
            postal_code: location.postal_code.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            operating_hours: location.hours().cloned(),
            status: location.status,
            is_headquarters: location.is_headquarters,
            notes: location.notes.clone(),
        }
    }
}

impl Auditable for LocationDraft {
    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("company_id", Some(self.company_id.to_string())),
            ("location_type_id", Some(self.location_type_id.to_string())),
            ("name", Some(self.name.clone())),
            ("code", Some(self.code.clone())),
            ("contact_person", Some(self.contact_person.clone())),
            ("contact_email", Some(self.contact_email.clone())),
            ("contact_phone", Some(self.contact_phone.clone())),
            ("address_line1", Some(self.address_line1.clone())),
            ("address_line2", Some(self.address_line2.clone())),
            ("city", Some(self.city.clone())),
            ("state", Some(self.state.clone())),
            ("country", Some(self.country.clone())),
            ("postal_code", Some(self.postal_code.clone())),
            ("latitude", self.latitude.map(|v| v.to_string())),
            ("longitude", self.longitude.map(|v| v.to_string())),
            (
                "operating_hours",
                self.operating_hours
                    .as_ref()
                    .and_then(|h| serde_json::to_string(h).ok()),
            ),
            ("status", Some(self.status.to_string())),
            ("is_headquarters", Some(self.is_headquarters.to_string())),
            ("notes", Some(self.notes.clone())),
        ]
    }
}

impl Auditable for Location {
    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)> {
        LocationDraft::from(self).audit_fields()
    }
}
