use anyhow::{anyhow, Result};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{ClinicalExam, UpsertExamRequest};

pub struct ExamService {
    supabase: SupabaseClient,
}

impl ExamService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn get_exam(&self, visit_id: &Uuid, auth_token: &str) -> Result<Option<ClinicalExam>> {
        let path = format!("/rest/v1/clinical_exams?visit_id=eq.{}", visit_id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    /// Saves the exam sheet for a visit: update when a row already exists,
    /// insert otherwise. The 1:1 constraint lives in the schema; this check
    /// keeps a double save from tripping it.
    pub async fn upsert_exam(
        &self,
        visit_id: &Uuid,
        request: UpsertExamRequest,
        auth_token: &str,
    ) -> Result<ClinicalExam> {
        debug!("Saving clinical exam for visit {}", visit_id);

        let mut payload = serde_json::to_value(&request)?;
        payload["visit_id"] = json!(visit_id);

        let existing_path = format!("/rest/v1/clinical_exams?visit_id=eq.{}&select=id", visit_id);
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &existing_path, Some(auth_token), None)
            .await?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let rows: Vec<Value> = match existing.first().and_then(|row| row["id"].as_str()) {
            Some(exam_id) => {
                let path = format!("/rest/v1/clinical_exams?id=eq.{}", exam_id);
                self.supabase
                    .request_with_headers(Method::PATCH, &path, Some(auth_token), Some(payload), Some(headers))
                    .await?
            }
            None => {
                self.supabase
                    .request_with_headers(
                        Method::POST,
                        "/rest/v1/clinical_exams",
                        Some(auth_token),
                        Some(payload),
                        Some(headers),
                    )
                    .await?
            }
        };

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to save clinical exam"))?;
        Ok(serde_json::from_value(row)?)
    }
}
