//! Field formats and structural invariants checked before any location write.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::AppError;
use crate::models::{LocationDraft, NewCompany, NewLocationType, OperatingHours};

pub const REQUIRED_WEEKDAYS: [&str; 5] = ["monday", "tuesday", "wednesday", "thursday", "friday"];

const MAX_NAME_LEN: usize = 255;
const MAX_CODE_LEN: usize = 50;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("phone pattern compiles"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
});

/// An empty hours map carries no information and is stored as absent.
pub fn normalize_hours(hours: Option<OperatingHours>) -> Option<OperatingHours> {
    hours.filter(|h| !h.is_empty())
}

/// Present hours must cover Monday through Friday. Weekend keys are optional.
pub fn check_operating_hours(hours: Option<&OperatingHours>) -> Result<(), AppError> {
    let Some(hours) = hours else {
        return Ok(());
    };

    let missing: Vec<&str> = REQUIRED_WEEKDAYS
        .iter()
        .copied()
        .filter(|day| !hours.contains_key(*day))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::invariant(
            "operating_hours",
            format!(
                "Operating hours must include all weekdays (missing: {})",
                missing.join(", ")
            ),
        ))
    }
}

pub fn validate_location(draft: &LocationDraft) -> Result<(), AppError> {
    require("name", &draft.name)?;
    max_len("name", &draft.name, MAX_NAME_LEN)?;
    require("code", &draft.code)?;
    max_len("code", &draft.code, MAX_CODE_LEN)?;
    require("contact_person", &draft.contact_person)?;
    validate_email("contact_email", &draft.contact_email)?;
    validate_phone("contact_phone", &draft.contact_phone)?;
    require("address_line1", &draft.address_line1)?;
    require("city", &draft.city)?;
    require("state", &draft.state)?;
    require("country", &draft.country)?;
    require("postal_code", &draft.postal_code)?;

    if let Some(lat) = draft.latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::BadRequest(
                "latitude must be between -90 and 90".to_string(),
            ));
        }
    }
    if let Some(lng) = draft.longitude {
        if !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::BadRequest(
                "longitude must be between -180 and 180".to_string(),
            ));
        }
    }

    check_operating_hours(draft.operating_hours.as_ref())
}

pub fn validate_company(company: &NewCompany, today: NaiveDate) -> Result<(), AppError> {
    if company.name.trim().chars().count() < 2 {
        return Err(AppError::BadRequest(
            "name must be at least 2 characters".to_string(),
        ));
    }
    max_len("name", &company.name, MAX_NAME_LEN)?;
    require("registration_number", &company.registration_number)?;
    validate_phone("phone", &company.phone)?;
    validate_email("email", &company.email)?;
    require("address_line1", &company.address_line1)?;
    require("city", &company.city)?;
    require("country", &company.country)?;

    if company.establishment_date.is_some_and(|d| d > today) {
        return Err(AppError::BadRequest(
            "establishment_date cannot be in the future".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_location_type(location_type: &NewLocationType) -> Result<(), AppError> {
    require("name", &location_type.name)?;
    max_len("name", &location_type.name, 100)
}

pub fn validate_phone(field: &str, phone: &str) -> Result<(), AppError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "{field}: Phone number must be entered in format: '+999999999'. Up to 15 digits allowed."
        )))
    }
}

pub fn validate_email(field: &str, email: &str) -> Result<(), AppError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("{field}: Enter a valid email address")))
    }
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::BadRequest(format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn max_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        Err(AppError::BadRequest(format!(
            "{field} must be at most {max} characters"
        )))
    } else {
        Ok(())
    }
}
