use anyhow::Result;
use chrono::NaiveDate;
use futures::join;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{count_low_stock, DashboardStats};

pub struct StatsService {
    supabase: SupabaseClient,
}

impl StatsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// The four counters in parallel round trips. Visits and appointments
    /// are exact head-counts; pending follow-ups are unsent reminders due on
    /// or before the date; low stock compares each row to its own threshold.
    pub async fn collect(&self, date: NaiveDate, auth_token: &str) -> Result<DashboardStats> {
        debug!("Collecting dashboard stats for {}", date);

        let day = date.format("%Y-%m-%d");
        let visits_path = format!("/rest/v1/visits?visit_date=eq.{}", day);
        let followups_path = format!(
            "/rest/v1/reminders?sent=eq.false&reminder_date=lte.{}",
            day
        );
        let appointments_path = format!(
            "/rest/v1/appointments?appointment_date=eq.{}&status=eq.scheduled",
            day
        );

        let (visits, followups, stock, appointments) = join!(
            self.supabase.count(&visits_path, Some(auth_token)),
            self.supabase.count(&followups_path, Some(auth_token)),
            self.supabase.request::<Vec<Value>>(
                Method::GET,
                "/rest/v1/stock?select=id,quantity,min_threshold",
                Some(auth_token),
                None,
            ),
            self.supabase.count(&appointments_path, Some(auth_token)),
        );

        Ok(DashboardStats {
            date,
            today_visits: visits?,
            pending_followups: followups?,
            low_stock: count_low_stock(&stock?),
            today_appointments: appointments?,
        })
    }
}
