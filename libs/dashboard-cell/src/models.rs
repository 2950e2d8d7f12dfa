use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The four landing-page counters.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub date: NaiveDate,
    pub today_visits: u64,
    pub pending_followups: u64,
    pub low_stock: u64,
    pub today_appointments: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsQuery {
    /// The caller's calendar date. Defaults to the UTC date when omitted.
    pub date: Option<NaiveDate>,
}

/// Low-stock is derived client-of-the-database side: quantity at or below
/// the row's own threshold.
pub fn count_low_stock(rows: &[Value]) -> u64 {
    rows.iter()
        .filter(|row| {
            let quantity = row["quantity"].as_i64().unwrap_or(0);
            let min_threshold = row["min_threshold"].as_i64().unwrap_or(0);
            quantity <= min_threshold
        })
        .count() as u64
}
