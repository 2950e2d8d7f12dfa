use anyhow::{anyhow, Result};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CreateDiagnosisRequest, CreateTreatmentRequest, Diagnosis, Treatment};

/// Visit-scoped diagnosis and treatment rows. Both share the same
/// insert/list/delete shape against their PostgREST tables.
pub struct RecordsService {
    supabase: SupabaseClient,
}

impl RecordsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn add_diagnosis(
        &self,
        visit_id: &Uuid,
        request: CreateDiagnosisRequest,
        auth_token: &str,
    ) -> Result<Diagnosis> {
        debug!("Adding {} test to visit {}", request.test_type, visit_id);

        let diagnosis_data = json!({
            "visit_id": visit_id,
            "test_type": request.test_type,
            "result": request.result,
            "notes": request.notes,
            "report_url": request.report_url,
        });

        let row = self.insert("/rest/v1/diagnoses", diagnosis_data, auth_token).await?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn list_diagnoses(&self, visit_id: &Uuid, auth_token: &str) -> Result<Vec<Diagnosis>> {
        let path = format!(
            "/rest/v1/diagnoses?visit_id=eq.{}&order=created_at",
            visit_id
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn delete_diagnosis(&self, diagnosis_id: &Uuid, auth_token: &str) -> Result<()> {
        let path = format!("/rest/v1/diagnoses?id=eq.{}", diagnosis_id);
        self.supabase.delete(&path, Some(auth_token)).await
    }

    pub async fn add_treatment(
        &self,
        visit_id: &Uuid,
        request: CreateTreatmentRequest,
        auth_token: &str,
    ) -> Result<Treatment> {
        debug!("Adding {} treatment to visit {}", request.category, visit_id);

        let treatment_data = json!({
            "visit_id": visit_id,
            "category": request.category,
            "medicine_name": request.medicine_name,
            "dosage": request.dosage,
            "notes": request.notes,
        });

        let row = self.insert("/rest/v1/treatments", treatment_data, auth_token).await?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn list_treatments(&self, visit_id: &Uuid, auth_token: &str) -> Result<Vec<Treatment>> {
        let path = format!(
            "/rest/v1/treatments?visit_id=eq.{}&order=created_at",
            visit_id
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn delete_treatment(&self, treatment_id: &Uuid, auth_token: &str) -> Result<()> {
        let path = format!("/rest/v1/treatments?id=eq.{}", treatment_id);
        self.supabase.delete(&path, Some(auth_token)).await
    }

    async fn insert(&self, table_path: &str, body: Value, auth_token: &str) -> Result<Value> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(Method::POST, table_path, Some(auth_token), Some(body), Some(headers))
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert returned no row"))
    }
}
