use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub trading_name: String,
    pub registration_number: String,
    pub tax_number: Option<String>,
    pub phone: String,
    pub email: String,
    pub address_line1: String,
    pub city: String,
    pub country: String,
    pub establishment_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCompany {
    pub name: String,
    #[serde(default)]
    pub trading_name: String,
    pub registration_number: String,
    pub tax_number: Option<String>,
    pub phone: String,
    pub email: String,
    pub address_line1: String,
    pub city: String,
    pub country: String,
    pub establishment_date: Option<NaiveDate>,
}
