use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub alternate_mobile: Option<String>,
    pub address: Option<String>,
    pub owner_number: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub animal_type: String,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub sex: Option<String>,
    pub weight: Option<f64>,
    pub pet_number: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One clinical encounter. `case_number` is minted by the backend's atomic
/// per-day counter and treated as an opaque string here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub case_number: String,
    pub visit_date: NaiveDate,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub serial_number: Option<i64>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerLookupQuery {
    pub mobile: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OwnerLookupResponse {
    pub owner: Option<Owner>,
    pub pets: Vec<Pet>,
}

/// Walk-in registration form: owner details plus the new pet. When the
/// caller already resolved the owner through lookup, `existing_owner_id`
/// short-circuits the dedup step.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub existing_owner_id: Option<Uuid>,
    pub owner_name: String,
    pub mobile: String,
    pub alternate_mobile: Option<String>,
    pub address: Option<String>,
    pub pet_name: String,
    pub animal_type: String,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub sex: Option<String>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationOutcome {
    pub owner: Owner,
    pub pet: Pet,
    pub visit: Visit,
    pub case_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisitDayQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum RegistrationError {
    #[error("Mobile number must be at least 10 digits")]
    MobileTooShort,

    #[error("Owner not found")]
    OwnerNotFound,

    #[error("Case number allocation failed: {0}")]
    CaseNumberFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
