use anyhow::{anyhow, Result};
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CreateStockItemRequest, StockItem, StockItemWithStatus, UpdateStockItemRequest};

pub struct StockService {
    supabase: SupabaseClient,
}

impl StockService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn add_item(
        &self,
        request: CreateStockItemRequest,
        auth_token: &str,
    ) -> Result<StockItem> {
        debug!("Adding stock item: {}", request.item_name);

        let item_data = json!({
            "item_name": request.item_name,
            "category": request.category.unwrap_or_else(|| "Medicine".to_string()),
            "quantity": request.quantity,
            "min_threshold": request.min_threshold.unwrap_or(5),
            "unit": request.unit.unwrap_or_else(|| "pcs".to_string()),
            "price": request.price.unwrap_or(0.0),
            "expiry_date": request.expiry_date,
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
                "/rest/v1/stock",
                Some(auth_token),
                Some(item_data),
                Some(headers),
            )
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to add stock item"))?;
        Ok(serde_json::from_value(row)?)
    }

    /// Full shelf listing, each row annotated with its derived status
    /// against the current UTC date.
    pub async fn list_items(&self, auth_token: &str) -> Result<Vec<StockItemWithStatus>> {
        let rows: Vec<Value> = self
            .supabase
            .request(
                Method::GET,
                "/rest/v1/stock?order=item_name",
                Some(auth_token),
                None,
            )
            .await?;

        let today = Utc::now().date_naive();
        let items = rows
            .into_iter()
            .map(|row| {
                let item: StockItem = serde_json::from_value(row)?;
                let status = item.status(today);
                Ok(StockItemWithStatus { item, status })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(items)
    }

    pub async fn update_item(
        &self,
        item_id: &Uuid,
        request: UpdateStockItemRequest,
        auth_token: &str,
    ) -> Result<StockItem> {
        debug!("Updating stock item: {}", item_id);

        let mut update_data = serde_json::Map::new();

        if let Some(quantity) = request.quantity {
            update_data.insert("quantity".to_string(), json!(quantity));
        }
        if let Some(min_threshold) = request.min_threshold {
            update_data.insert("min_threshold".to_string(), json!(min_threshold));
        }
        if let Some(price) = request.price {
            update_data.insert("price".to_string(), json!(price));
        }
        if let Some(expiry_date) = request.expiry_date {
            update_data.insert("expiry_date".to_string(), json!(expiry_date));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/stock?id=eq.{}", item_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(Value::Object(update_data)),
                Some(headers),
            )
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Stock item not found"))?;
        Ok(serde_json::from_value(row)?)
    }
}
