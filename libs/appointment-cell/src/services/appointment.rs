use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, BookAppointmentRequest, UpdateStatusRequest,
};

type Result<T> = std::result::Result<T, AppointmentError>;

pub struct AppointmentService {
    supabase: SupabaseClient,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn book(
        &self,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment> {
        debug!(
            "Booking appointment for pet {} on {}",
            request.pet_id, request.appointment_date
        );

        let appointment_data = json!({
            "pet_id": request.pet_id,
            "appointment_date": request.appointment_date,
            "appointment_time": request.appointment_time,
            "reason": request.reason,
            "is_followup": request.is_followup.unwrap_or(false),
            "status": AppointmentStatus::Scheduled.as_str(),
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
                "/rest/v1/appointments",
                Some(auth_token),
                Some(appointment_data),
                Some(headers),
            )
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| AppointmentError::DatabaseError(e.to_string()))
            })
            .transpose()?
            .ok_or_else(|| AppointmentError::DatabaseError("Insert returned no row".to_string()))
    }

    /// Upcoming bookings with pet and owner display names, oldest date first.
    pub async fn list_upcoming(&self, auth_token: &str) -> Result<Vec<Value>> {
        let path = "/rest/v1/appointments?select=*,pets(name,owners(name))&order=appointment_date&limit=50";
        self.supabase
            .request(Method::GET, path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    pub async fn update_status(
        &self,
        appointment_id: &Uuid,
        request: UpdateStatusRequest,
        auth_token: &str,
    ) -> Result<Appointment> {
        let appointment = self.get(appointment_id, auth_token).await?;
        if !appointment.is_scheduled() {
            return Err(AppointmentError::NotScheduled);
        }

        debug!(
            "Appointment {} -> {}",
            appointment_id,
            request.status.as_str()
        );

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
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
                Some(json!({ "status": request.status.as_str() })),
                Some(headers),
            )
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| AppointmentError::DatabaseError(e.to_string()))
            })
            .transpose()?
            .ok_or(AppointmentError::NotFound)
    }

    async fn get(&self, appointment_id: &Uuid, auth_token: &str) -> Result<Appointment> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| AppointmentError::DatabaseError(e.to_string()))
            })
            .transpose()?
            .ok_or(AppointmentError::NotFound)
    }
}
