use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::Visit;

pub struct VisitService {
    supabase: SupabaseClient,
}

impl VisitService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// One atomic counter increment on the backend. Uniqueness and
    /// monotonicity within the operational day are the procedure's contract;
    /// this client never computes or retries a number itself.
    pub async fn next_case_number(&self, auth_token: &str) -> Result<String> {
        debug!("Requesting next case number");

        let case_number: String = self
            .supabase
            .rpc("get_next_case_number", Some(auth_token), None)
            .await?;

        Ok(case_number)
    }

    pub async fn create_visit(
        &self,
        pet_id: &Uuid,
        case_number: &str,
        created_by: &str,
        auth_token: &str,
    ) -> Result<Visit> {
        debug!("Creating visit {} for pet {}", case_number, pet_id);

        let visit_data = json!({
            "pet_id": pet_id,
            "case_number": case_number,
            "created_by": created_by,
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/visits",
                Some(auth_token),
                Some(visit_data),
                Some(headers),
            )
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create visit"))?;
        Ok(serde_json::from_value(row)?)
    }

    /// A day's visits with pet and owner display fields joined in. The day
    /// boundary is the caller's: an explicit date, never a server-local
    /// "today" truncation.
    pub async fn visits_for_day(&self, date: NaiveDate, auth_token: &str) -> Result<Vec<Value>> {
        let path = format!(
            "/rest/v1/visits?visit_date=eq.{}&select=id,case_number,visit_date,pet_id,pets(name,animal_type,breed,owner_id,owners(name,mobile))&order=case_number",
            date.format("%Y-%m-%d")
        );

        let visits: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(visits)
    }
}
