use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed follow-up offset for every vaccine type.
pub const FOLLOW_UP_OFFSET_DAYS: i64 = 21;

pub fn follow_up_date(vaccine_date: NaiveDate) -> NaiveDate {
    vaccine_date + Duration::days(FOLLOW_UP_OFFSET_DAYS)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vaccination {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub pet_id: Uuid,
    pub vaccine_name: String,
    pub vaccine_date: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordVaccinationRequest {
    pub vaccine_name: String,
    /// Defaults to the current UTC date when omitted.
    pub vaccine_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub reminder_type: String,
    pub reminder_date: NaiveDate,
    pub message: Option<String>,
    pub sent: Option<bool>,
    pub created_at: DateTime<Utc>,
}

/// The vaccination insert and the reminder insert are independent writes.
/// `reminder_created: false` marks the accepted degraded state where the
/// vaccination landed but the reminder did not.
#[derive(Debug, Clone, Serialize)]
pub struct VaccinationOutcome {
    pub vaccination: Vaccination,
    pub reminder: Option<Reminder>,
    pub reminder_created: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum VaccinationError {
    #[error("Visit not found")]
    VisitNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_up_is_twenty_one_days_out() {
        let given: NaiveDate = "2024-01-01".parse().unwrap();
        let due: NaiveDate = "2024-01-22".parse().unwrap();
        assert_eq!(follow_up_date(given), due);
    }

    #[test]
    fn test_follow_up_crosses_month_boundary() {
        let given: NaiveDate = "2024-02-20".parse().unwrap();
        let due: NaiveDate = "2024-03-12".parse().unwrap();
        assert_eq!(follow_up_date(given), due);
    }
}
