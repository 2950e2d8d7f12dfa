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

use crate::models::{
    CreatePrescriptionRequest, CreateStockItemRequest, PharmacyError, UpdateStockItemRequest,
};
use crate::services::{PrescriptionService, StockService};

async fn require_doctor(config: &AppConfig, user: &User, token: &str) -> Result<(), AppError> {
    let role = RoleService::new(config)
        .resolve_role(&user.id, token)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if role != Some(AppRole::Doctor) {
        return Err(AppError::Auth("Only doctors can prescribe".to_string()));
    }

    Ok(())
}

#[axum::debug_handler]
pub async fn add_prescription(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(visit_id): Path<Uuid>,
    Json(request): Json<CreatePrescriptionRequest>,
) -> Result<Json<Value>, AppError> {
    require_doctor(&config, &user, auth.token()).await?;

    let service = PrescriptionService::new(&config);

    let prescription = service
        .add_prescription(&visit_id, request, auth.token())
        .await
        .map_err(|e| match e {
            PharmacyError::OutOfStock { .. } => AppError::Conflict(e.to_string()),
            other => AppError::Database(other.to_string()),
        })?;

    Ok(Json(json!(prescription)))
}

#[axum::debug_handler]
pub async fn list_prescriptions(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = PrescriptionService::new(&config);

    let prescriptions = service
        .list_prescriptions(&visit_id, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "prescriptions": prescriptions,
        "total": prescriptions.len()
    })))
}

#[axum::debug_handler]
pub async fn delete_prescription(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(prescription_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    require_doctor(&config, &user, auth.token()).await?;

    let service = PrescriptionService::new(&config);

    service
        .delete_prescription(&prescription_id, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({ "deleted": prescription_id })))
}

#[axum::debug_handler]
pub async fn add_stock_item(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateStockItemRequest>,
) -> Result<Json<Value>, AppError> {
    if request.item_name.trim().is_empty() {
        return Err(AppError::ValidationError("Item name is required".to_string()));
    }

    let service = StockService::new(&config);

    let item = service
        .add_item(request, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!(item)))
}

#[axum::debug_handler]
pub async fn list_stock(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = StockService::new(&config);

    let items = service
        .list_items(auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "items": items,
        "total": items.len()
    })))
}

#[axum::debug_handler]
pub async fn update_stock_item(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateStockItemRequest>,
) -> Result<Json<Value>, AppError> {
    let service = StockService::new(&config);

    let item = service
        .update_item(&item_id, request, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!(item)))
}
