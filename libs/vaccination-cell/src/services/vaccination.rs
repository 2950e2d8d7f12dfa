use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    follow_up_date, RecordVaccinationRequest, Reminder, Vaccination, VaccinationError,
    VaccinationOutcome,
};

type Result<T> = std::result::Result<T, VaccinationError>;

pub struct VaccinationService {
    supabase: SupabaseClient,
}

impl VaccinationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Records a vaccination and emits the companion follow-up reminder.
    /// Two independent inserts: a reminder failure after the vaccination
    /// landed leaves the vaccination in place and is reported in the
    /// outcome instead of unwinding the first write.
    pub async fn record(
        &self,
        visit_id: &Uuid,
        request: RecordVaccinationRequest,
        auth_token: &str,
    ) -> Result<VaccinationOutcome> {
        let (pet_id, pet_name) = self.visit_pet(visit_id, auth_token).await?;

        let vaccine_date = request.vaccine_date.unwrap_or_else(|| Utc::now().date_naive());
        let next_due = follow_up_date(vaccine_date);

        debug!(
            "Recording {} for pet {} (next due {})",
            request.vaccine_name, pet_id, next_due
        );

        let vaccination_data = json!({
            "visit_id": visit_id,
            "pet_id": pet_id,
            "vaccine_name": request.vaccine_name,
            "vaccine_date": vaccine_date,
            "next_due_date": next_due,
            "notes": request.notes,
        });

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/vaccinations",
                Some(auth_token),
                Some(vaccination_data),
                Some(Self::representation_headers()),
            )
            .await
            .map_err(|e| VaccinationError::DatabaseError(e.to_string()))?;

        let vaccination: Vaccination = rows
            .into_iter()
            .next()
            .map(|row| serde_json::from_value(row).map_err(|e| VaccinationError::DatabaseError(e.to_string())))
            .transpose()?
            .ok_or_else(|| VaccinationError::DatabaseError("Insert returned no row".to_string()))?;

        let reminder_data = json!({
            "pet_id": pet_id,
            "reminder_type": "vaccination",
            "reminder_date": next_due,
            "message": format!("{} follow-up due for {}", vaccination.vaccine_name, pet_name),
        });

        let reminder = match self
            .supabase
            .request_with_headers::<Vec<Value>>(
                Method::POST,
                "/rest/v1/reminders",
                Some(auth_token),
                Some(reminder_data),
                Some(Self::representation_headers()),
            )
            .await
        {
            Ok(rows) => rows
                .into_iter()
                .next()
                .and_then(|row| serde_json::from_value::<Reminder>(row).ok()),
            Err(e) => {
                warn!(
                    "Vaccination {} saved but reminder insert failed: {}",
                    vaccination.id, e
                );
                None
            }
        };

        let reminder_created = reminder.is_some();
        Ok(VaccinationOutcome {
            vaccination,
            reminder,
            reminder_created,
        })
    }

    pub async fn list_for_visit(&self, visit_id: &Uuid, auth_token: &str) -> Result<Vec<Vaccination>> {
        let path = format!(
            "/rest/v1/vaccinations?visit_id=eq.{}&order=created_at",
            visit_id
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| VaccinationError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| VaccinationError::DatabaseError(e.to_string())))
            .collect()
    }

    async fn visit_pet(&self, visit_id: &Uuid, auth_token: &str) -> Result<(Uuid, String)> {
        let path = format!(
            "/rest/v1/visits?id=eq.{}&select=id,pet_id,pets(name)",
            visit_id
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| VaccinationError::DatabaseError(e.to_string()))?;

        let row = rows.into_iter().next().ok_or(VaccinationError::VisitNotFound)?;

        let pet_id = row["pet_id"]
            .as_str()
            .and_then(|id| id.parse::<Uuid>().ok())
            .ok_or(VaccinationError::VisitNotFound)?;
        let pet_name = row["pets"]["name"].as_str().unwrap_or("your pet").to_string();

        Ok((pet_id, pet_name))
    }

    fn representation_headers() -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );
        headers
    }
}
