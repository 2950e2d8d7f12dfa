use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{RecordVaccinationRequest, VaccinationError};
use crate::services::VaccinationService;

#[axum::debug_handler]
pub async fn record_vaccination(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(visit_id): Path<Uuid>,
    Json(request): Json<RecordVaccinationRequest>,
) -> Result<Json<Value>, AppError> {
    if request.vaccine_name.trim().is_empty() {
        return Err(AppError::ValidationError("Vaccine name is required".to_string()));
    }

    let service = VaccinationService::new(&config);

    let outcome = service
        .record(&visit_id, request, auth.token())
        .await
        .map_err(|e| match e {
            VaccinationError::VisitNotFound => AppError::NotFound(e.to_string()),
            VaccinationError::DatabaseError(msg) => AppError::Database(msg),
        })?;

    Ok(Json(json!(outcome)))
}

#[axum::debug_handler]
pub async fn list_vaccinations(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = VaccinationService::new(&config);

    let vaccinations = service
        .list_for_visit(&visit_id, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "vaccinations": vaccinations,
        "total": vaccinations.len()
    })))
}
