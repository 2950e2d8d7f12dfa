use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub total_amount: f64,
    pub status: Option<String>,
    pub payment_mode: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Bill {
    pub fn is_paid(&self) -> bool {
        self.status.as_deref() == Some("paid")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillItem {
    pub id: Uuid,
    pub bill_id: Uuid,
    pub description: String,
    pub category: String,
    pub amount: f64,
    pub quantity: i32,
}

impl BillItem {
    pub fn subtotal(&self) -> f64 {
        self.amount * self.quantity as f64
    }
}

/// Invoice total over a persisted item set. Always computed from rows
/// re-fetched after the write settles, never from an in-memory append.
pub fn compute_total(items: &[BillItem]) -> f64 {
    items.iter().map(BillItem::subtotal).sum()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddItemRequest {
    pub description: String,
    pub category: Option<String>,
    pub amount: f64,
    pub quantity: Option<i32>,
    pub payment_mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkPaidRequest {
    pub payment_mode: Option<String>,
}

/// Bill plus its current items and the total just persisted — what a
/// billing page needs after every mutation.
#[derive(Debug, Clone, Serialize)]
pub struct BillSummary {
    pub bill: Bill,
    pub items: Vec<BillItem>,
    pub total_amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceLine {
    pub description: String,
    pub category: String,
    pub amount: f64,
    pub quantity: i32,
    pub subtotal: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    pub bill_id: Uuid,
    pub case_number: Option<String>,
    pub owner_name: Option<String>,
    pub owner_mobile: Option<String>,
    pub pet_name: Option<String>,
    pub lines: Vec<InvoiceLine>,
    pub total_amount: f64,
    pub status: Option<String>,
    pub payment_mode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum BillingError {
    #[error("Bill not found")]
    BillNotFound,

    #[error("Bill item not found")]
    ItemNotFound,

    #[error("Bill is already paid")]
    AlreadyPaid,

    #[error("Line item amount must be positive and quantity at least 1")]
    InvalidLineItem,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
