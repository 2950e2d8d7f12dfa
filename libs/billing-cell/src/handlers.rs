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

use crate::models::{AddItemRequest, BillingError, MarkPaidRequest};
use crate::services::BillingService;

fn map_billing_error(e: BillingError) -> AppError {
    match e {
        BillingError::BillNotFound | BillingError::ItemNotFound => AppError::NotFound(e.to_string()),
        BillingError::AlreadyPaid => AppError::Conflict(e.to_string()),
        BillingError::InvalidLineItem => AppError::ValidationError(e.to_string()),
        BillingError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn get_bill(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BillingService::new(&config);

    let bill = service
        .bill_for_visit(&visit_id, auth.token())
        .await
        .map_err(map_billing_error)?;

    match bill {
        Some(bill) => {
            let items = service
                .items_for_bill(&bill.id, auth.token())
                .await
                .map_err(map_billing_error)?;
            Ok(Json(json!({ "bill": bill, "items": items })))
        }
        None => Ok(Json(json!({ "bill": null, "items": [] }))),
    }
}

#[axum::debug_handler]
pub async fn add_item(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(visit_id): Path<Uuid>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<Value>, AppError> {
    if request.description.trim().is_empty() {
        return Err(AppError::ValidationError("Description is required".to_string()));
    }

    let service = BillingService::new(&config);

    let summary = service
        .add_item(&visit_id, request, auth.token())
        .await
        .map_err(map_billing_error)?;

    Ok(Json(json!(summary)))
}

#[axum::debug_handler]
pub async fn remove_item(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BillingService::new(&config);

    let summary = service
        .remove_item(&item_id, auth.token())
        .await
        .map_err(map_billing_error)?;

    Ok(Json(json!(summary)))
}

#[axum::debug_handler]
pub async fn mark_paid(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(bill_id): Path<Uuid>,
    Json(request): Json<MarkPaidRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BillingService::new(&config);

    let bill = service
        .mark_paid(&bill_id, request, auth.token())
        .await
        .map_err(map_billing_error)?;

    Ok(Json(json!(bill)))
}

#[axum::debug_handler]
pub async fn get_invoice(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(bill_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BillingService::new(&config);

    let invoice = service
        .invoice(&bill_id, auth.token())
        .await
        .map_err(map_billing_error)?;

    Ok(Json(json!(invoice)))
}
