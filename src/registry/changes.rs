use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::models::{LocationDraft, LocationStatus, OperatingHours};

/// A partial update. Absent fields stay as they are; for nullable fields an
/// explicit `null` clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationChanges {
    pub company_id: Option<Uuid>,
    pub location_type_id: Option<Uuid>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub longitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub operating_hours: Option<Option<OperatingHours>>,
    pub status: Option<LocationStatus>,
    pub is_headquarters: Option<bool>,
    pub notes: Option<String>,
}

impl LocationChanges {
    pub fn apply(self, mut draft: LocationDraft) -> LocationDraft {
        macro_rules! set {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field {
                    draft.$field = value;
                })*
            };
        }

        set!(
            company_id,
            location_type_id,
            name,
            code,
            contact_person,
            contact_email,
            contact_phone,
            address_line1,
            address_line2,
            city,
            state,
            country,
            postal_code,
            latitude,
            longitude,
            operating_hours,
            status,
            is_headquarters,
            notes,
        );
        draft
    }
}

// Distinguishes `"field": null` (Some(None)) from a missing field (None, via `default`).
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
