use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    compute_total, AddItemRequest, Bill, BillItem, BillSummary, BillingError, Invoice, InvoiceLine,
    MarkPaidRequest,
};

type Result<T> = std::result::Result<T, BillingError>;

pub struct BillingService {
    supabase: SupabaseClient,
}

impl BillingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn bill_for_visit(&self, visit_id: &Uuid, auth_token: &str) -> Result<Option<Bill>> {
        let path = format!("/rest/v1/bills?visit_id=eq.{}&limit=1", visit_id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BillingError::DatabaseError(e.to_string()))?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(Self::decode(row)?)),
            None => Ok(None),
        }
    }

    pub async fn items_for_bill(&self, bill_id: &Uuid, auth_token: &str) -> Result<Vec<BillItem>> {
        let path = format!("/rest/v1/bill_items?bill_id=eq.{}", bill_id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BillingError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Self::decode).collect()
    }

    /// Adds a line item: create-or-reuse the visit's bill, insert the row,
    /// then persist the total recomputed over the item list fetched back
    /// from storage. A concurrent editor's rows are picked up by that fetch
    /// instead of being clobbered by a locally accumulated sum.
    pub async fn add_item(
        &self,
        visit_id: &Uuid,
        request: AddItemRequest,
        auth_token: &str,
    ) -> Result<BillSummary> {
        if request.amount <= 0.0 || request.quantity.unwrap_or(1) < 1 {
            return Err(BillingError::InvalidLineItem);
        }

        let bill = match self.bill_for_visit(visit_id, auth_token).await? {
            Some(bill) => bill,
            None => self.create_bill(visit_id, request.payment_mode.as_deref(), auth_token).await?,
        };

        debug!("Adding '{}' to bill {}", request.description, bill.id);

        let item_data = json!({
            "bill_id": bill.id,
            "description": request.description,
            "category": request.category.clone().unwrap_or_else(|| "Consultation".to_string()),
            "amount": request.amount,
            "quantity": request.quantity.unwrap_or(1),
        });

        self.insert_item(item_data, auth_token).await?;

        self.persist_recomputed_total(&bill.id, request.payment_mode.as_deref(), auth_token)
            .await
    }

    /// Deletes a line item and recomputes the parent bill's total the same
    /// way — from the re-fetched authoritative item set.
    pub async fn remove_item(&self, item_id: &Uuid, auth_token: &str) -> Result<BillSummary> {
        let path = format!("/rest/v1/bill_items?id=eq.{}&select=bill_id&limit=1", item_id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BillingError::DatabaseError(e.to_string()))?;

        let bill_id = rows
            .first()
            .and_then(|row| row["bill_id"].as_str())
            .and_then(|id| id.parse::<Uuid>().ok())
            .ok_or(BillingError::ItemNotFound)?;

        debug!("Removing item {} from bill {}", item_id, bill_id);

        let delete_path = format!("/rest/v1/bill_items?id=eq.{}", item_id);
        self.supabase
            .delete(&delete_path, Some(auth_token))
            .await
            .map_err(|e| BillingError::DatabaseError(e.to_string()))?;

        self.persist_recomputed_total(&bill_id, None, auth_token).await
    }

    /// Terminal for the bill: there is no unmark operation.
    pub async fn mark_paid(
        &self,
        bill_id: &Uuid,
        request: MarkPaidRequest,
        auth_token: &str,
    ) -> Result<Bill> {
        let bill = self.get_bill(bill_id, auth_token).await?;
        if bill.is_paid() {
            return Err(BillingError::AlreadyPaid);
        }

        debug!("Marking bill {} as paid", bill_id);

        let mut update = serde_json::Map::new();
        update.insert("status".to_string(), json!("paid"));
        if let Some(mode) = request.payment_mode {
            update.insert("payment_mode".to_string(), json!(mode));
        }

        let rows = self
            .patch_bill(bill_id, Value::Object(update), auth_token)
            .await?;

        rows.into_iter()
            .next()
            .map(Self::decode)
            .transpose()?
            .ok_or(BillingError::BillNotFound)
    }

    /// Everything the printable invoice shows, in one response.
    pub async fn invoice(&self, bill_id: &Uuid, auth_token: &str) -> Result<Invoice> {
        let path = format!(
            "/rest/v1/bills?id=eq.{}&select=*,visits(case_number,pets(name,owners(name,mobile)))",
            bill_id
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BillingError::DatabaseError(e.to_string()))?;

        let row = rows.into_iter().next().ok_or(BillingError::BillNotFound)?;
        let bill: Bill = Self::decode(row.clone())?;
        let items = self.items_for_bill(&bill.id, auth_token).await?;

        let visit = &row["visits"];
        let pet = &visit["pets"];
        let owner = &pet["owners"];

        let lines = items
            .iter()
            .map(|item| InvoiceLine {
                description: item.description.clone(),
                category: item.category.clone(),
                amount: item.amount,
                quantity: item.quantity,
                subtotal: item.subtotal(),
            })
            .collect();

        Ok(Invoice {
            bill_id: bill.id,
            case_number: visit["case_number"].as_str().map(String::from),
            owner_name: owner["name"].as_str().map(String::from),
            owner_mobile: owner["mobile"].as_str().map(String::from),
            pet_name: pet["name"].as_str().map(String::from),
            lines,
            total_amount: compute_total(&items),
            status: bill.status,
            payment_mode: bill.payment_mode,
        })
    }

    async fn create_bill(
        &self,
        visit_id: &Uuid,
        payment_mode: Option<&str>,
        auth_token: &str,
    ) -> Result<Bill> {
        debug!("Opening bill for visit {}", visit_id);

        let bill_data = json!({
            "visit_id": visit_id,
            "payment_mode": payment_mode,
        });

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/bills",
                Some(auth_token),
                Some(bill_data),
                Some(Self::representation_headers()),
            )
            .await
            .map_err(|e| BillingError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(Self::decode)
            .transpose()?
            .ok_or_else(|| BillingError::DatabaseError("Failed to create bill".to_string()))
    }

    async fn get_bill(&self, bill_id: &Uuid, auth_token: &str) -> Result<Bill> {
        let path = format!("/rest/v1/bills?id=eq.{}", bill_id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BillingError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(Self::decode)
            .transpose()?
            .ok_or(BillingError::BillNotFound)
    }

    async fn insert_item(&self, item_data: Value, auth_token: &str) -> Result<BillItem> {
        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/bill_items",
                Some(auth_token),
                Some(item_data),
                Some(Self::representation_headers()),
            )
            .await
            .map_err(|e| BillingError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(Self::decode)
            .transpose()?
            .ok_or_else(|| BillingError::DatabaseError("Failed to add bill item".to_string()))
    }

    async fn persist_recomputed_total(
        &self,
        bill_id: &Uuid,
        payment_mode: Option<&str>,
        auth_token: &str,
    ) -> Result<BillSummary> {
        let items = self.items_for_bill(bill_id, auth_token).await?;
        let total = compute_total(&items);

        let mut update = serde_json::Map::new();
        update.insert("total_amount".to_string(), json!(total));
        if let Some(mode) = payment_mode {
            update.insert("payment_mode".to_string(), json!(mode));
        }

        let rows = self
            .patch_bill(bill_id, Value::Object(update), auth_token)
            .await?;

        let bill = rows
            .into_iter()
            .next()
            .map(Self::decode)
            .transpose()?
            .ok_or(BillingError::BillNotFound)?;

        Ok(BillSummary {
            bill,
            items,
            total_amount: total,
        })
    }

    async fn patch_bill(
        &self,
        bill_id: &Uuid,
        body: Value,
        auth_token: &str,
    ) -> Result<Vec<Value>> {
        let path = format!("/rest/v1/bills?id=eq.{}", bill_id);
        self.supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(body),
                Some(Self::representation_headers()),
            )
            .await
            .map_err(|e| BillingError::DatabaseError(e.to_string()))
    }

    fn representation_headers() -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );
        headers
    }

    fn decode<T: serde::de::DeserializeOwned>(row: Value) -> Result<T> {
        serde_json::from_value(row).map_err(|e| BillingError::DatabaseError(e.to_string()))
    }
}
