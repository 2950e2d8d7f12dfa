use anyhow::{anyhow, Result};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CreatePrescriptionRequest, PharmacyError, Prescription};

pub struct PrescriptionService {
    supabase: SupabaseClient,
}

impl PrescriptionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// The inventory gate runs before the insert: a stock row matching the
    /// medicine name (case-insensitive substring) with nothing on the shelf
    /// blocks the prescription; no matching row means the item isn't stocked
    /// here and the prescription goes through. Advisory only — prescribing
    /// never decrements stock.
    pub async fn add_prescription(
        &self,
        visit_id: &Uuid,
        request: CreatePrescriptionRequest,
        auth_token: &str,
    ) -> Result<Prescription, PharmacyError> {
        debug!("Prescribing {} for visit {}", request.medicine_name, visit_id);

        let stock_quantity = self
            .matching_stock_quantity(&request.medicine_name, auth_token)
            .await
            .map_err(|e| PharmacyError::DatabaseError(e.to_string()))?;

        if let Some(quantity) = stock_quantity {
            if quantity <= 0 {
                return Err(PharmacyError::OutOfStock {
                    medicine_name: request.medicine_name,
                });
            }
        }

        let prescription_data = json!({
            "visit_id": visit_id,
            "medicine_name": request.medicine_name,
            "dose": request.dose,
            "duration": request.duration,
            "instructions": request.instructions,
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
                "/rest/v1/prescriptions",
                Some(auth_token),
                Some(prescription_data),
                Some(headers),
            )
            .await
            .map_err(|e| PharmacyError::DatabaseError(e.to_string()))?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| PharmacyError::DatabaseError("Insert returned no row".to_string()))?;

        serde_json::from_value(row).map_err(|e| PharmacyError::DatabaseError(e.to_string()))
    }

    pub async fn list_prescriptions(
        &self,
        visit_id: &Uuid,
        auth_token: &str,
    ) -> Result<Vec<Prescription>> {
        let path = format!(
            "/rest/v1/prescriptions?visit_id=eq.{}&order=created_at",
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

    pub async fn delete_prescription(&self, prescription_id: &Uuid, auth_token: &str) -> Result<()> {
        let path = format!("/rest/v1/prescriptions?id=eq.{}", prescription_id);
        self.supabase.delete(&path, Some(auth_token)).await
    }

    /// Quantity of the closest stock match, or None when nothing matches.
    async fn matching_stock_quantity(
        &self,
        medicine_name: &str,
        auth_token: &str,
    ) -> Result<Option<i32>> {
        let pattern = format!("*{}*", medicine_name);
        let path = format!(
            "/rest/v1/stock?item_name=ilike.{}&select=quantity&limit=1",
            urlencoding::encode(&pattern)
        );

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        match rows.first() {
            Some(row) => {
                let quantity = row["quantity"]
                    .as_i64()
                    .ok_or_else(|| anyhow!("Stock row missing quantity"))?;
                Ok(Some(quantity as i32))
            }
            None => Ok(None),
        }
    }
}
