use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub medicine_name: String,
    pub dose: Option<String>,
    pub duration: Option<String>,
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub medicine_name: String,
    pub dose: Option<String>,
    pub duration: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItem {
    pub id: Uuid,
    pub item_name: String,
    pub category: String,
    pub quantity: i32,
    pub min_threshold: i32,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStockItemRequest {
    pub item_name: String,
    pub category: Option<String>,
    pub quantity: i32,
    pub min_threshold: Option<i32>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStockItemRequest {
    pub quantity: Option<i32>,
    pub min_threshold: Option<i32>,
    pub price: Option<f64>,
    pub expiry_date: Option<NaiveDate>,
}

/// Shelf state derived at read time, worst condition first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Expired,
    LowStock,
    ExpiringSoon,
    Ok,
}

const EXPIRY_WINDOW_DAYS: i64 = 30;

impl StockItem {
    pub fn status(&self, today: NaiveDate) -> StockStatus {
        if let Some(expiry) = self.expiry_date {
            if expiry < today {
                return StockStatus::Expired;
            }
        }
        if self.quantity <= self.min_threshold {
            return StockStatus::LowStock;
        }
        if let Some(expiry) = self.expiry_date {
            if (expiry - today).num_days() <= EXPIRY_WINDOW_DAYS {
                return StockStatus::ExpiringSoon;
            }
        }
        StockStatus::Ok
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StockItemWithStatus {
    #[serde(flatten)]
    pub item: StockItem,
    pub status: StockStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum PharmacyError {
    #[error("{medicine_name} is out of stock")]
    OutOfStock { medicine_name: String },

    #[error("Stock item not found")]
    StockItemNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i32, min_threshold: i32, expiry: Option<&str>) -> StockItem {
        StockItem {
            id: Uuid::new_v4(),
            item_name: "Amoxicillin 250mg".to_string(),
            category: "Medicine".to_string(),
            quantity,
            min_threshold,
            unit: Some("pcs".to_string()),
            price: Some(120.0),
            expiry_date: expiry.map(|d| d.parse().unwrap()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        "2024-06-01".parse().unwrap()
    }

    #[test]
    fn test_status_ok() {
        assert_eq!(item(50, 5, Some("2025-06-01")).status(today()), StockStatus::Ok);
        assert_eq!(item(50, 5, None).status(today()), StockStatus::Ok);
    }

    #[test]
    fn test_status_low_stock_at_threshold() {
        assert_eq!(item(5, 5, None).status(today()), StockStatus::LowStock);
        assert_eq!(item(0, 5, None).status(today()), StockStatus::LowStock);
    }

    #[test]
    fn test_status_expiring_within_thirty_days() {
        assert_eq!(
            item(50, 5, Some("2024-06-30")).status(today()),
            StockStatus::ExpiringSoon
        );
        // Day 31 is outside the window
        assert_eq!(item(50, 5, Some("2024-07-02")).status(today()), StockStatus::Ok);
    }

    #[test]
    fn test_status_expired_wins_over_low_stock() {
        assert_eq!(item(0, 5, Some("2024-01-01")).status(today()), StockStatus::Expired);
    }
}
