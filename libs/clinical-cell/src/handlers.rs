use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use auth_cell::services::RoleService;
use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_models::role::AppRole;

use crate::models::{CreateDiagnosisRequest, CreateTreatmentRequest, UpsertExamRequest};
use crate::services::{ExamService, RecordsService};

/// Clinical writes are doctor work. The navigation filter hides these pages
/// from receptionists; this is the server-side half of the same rule.
async fn require_doctor(config: &AppConfig, user: &User, token: &str) -> Result<(), AppError> {
    let role = RoleService::new(config)
        .resolve_role(&user.id, token)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if role != Some(AppRole::Doctor) {
        return Err(AppError::Auth(
            "Only doctors can record clinical findings".to_string(),
        ));
    }

    Ok(())
}

#[axum::debug_handler]
pub async fn get_exam(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ExamService::new(&config);

    let exam = service
        .get_exam(&visit_id, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({ "exam": exam })))
}

#[axum::debug_handler]
pub async fn save_exam(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(visit_id): Path<Uuid>,
    Json(request): Json<UpsertExamRequest>,
) -> Result<Json<Value>, AppError> {
    require_doctor(&config, &user, auth.token()).await?;

    let service = ExamService::new(&config);

    let exam = service
        .upsert_exam(&visit_id, request, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(exam)))
}

#[axum::debug_handler]
pub async fn add_diagnosis(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(visit_id): Path<Uuid>,
    Json(request): Json<CreateDiagnosisRequest>,
) -> Result<Json<Value>, AppError> {
    require_doctor(&config, &user, auth.token()).await?;

    let service = RecordsService::new(&config);

    let diagnosis = service
        .add_diagnosis(&visit_id, request, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(diagnosis)))
}

#[axum::debug_handler]
pub async fn list_diagnoses(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = RecordsService::new(&config);

    let diagnoses = service
        .list_diagnoses(&visit_id, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "diagnoses": diagnoses,
        "total": diagnoses.len()
    })))
}

#[axum::debug_handler]
pub async fn delete_diagnosis(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(diagnosis_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    require_doctor(&config, &user, auth.token()).await?;

    let service = RecordsService::new(&config);

    service
        .delete_diagnosis(&diagnosis_id, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({ "deleted": diagnosis_id })))
}

#[axum::debug_handler]
pub async fn add_treatment(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(visit_id): Path<Uuid>,
    Json(request): Json<CreateTreatmentRequest>,
) -> Result<Json<Value>, AppError> {
    require_doctor(&config, &user, auth.token()).await?;

    let service = RecordsService::new(&config);

    let treatment = service
        .add_treatment(&visit_id, request, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(treatment)))
}

#[axum::debug_handler]
pub async fn list_treatments(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = RecordsService::new(&config);

    let treatments = service
        .list_treatments(&visit_id, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "treatments": treatments,
        "total": treatments.len()
    })))
}

#[axum::debug_handler]
pub async fn delete_treatment(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(treatment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    require_doctor(&config, &user, auth.token()).await?;

    let service = RecordsService::new(&config);

    service
        .delete_treatment(&treatment_id, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({ "deleted": treatment_id })))
}
