use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    OwnerLookupQuery, OwnerLookupResponse, RegisterRequest, RegistrationError, VisitDayQuery,
};
use crate::services::{OwnerService, RegistrationService, VisitService};

#[axum::debug_handler]
pub async fn lookup_owner(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<OwnerLookupQuery>,
) -> Result<Json<OwnerLookupResponse>, AppError> {
    if query.mobile.len() < 10 {
        return Err(AppError::ValidationError(
            RegistrationError::MobileTooShort.to_string(),
        ));
    }

    let service = OwnerService::new(&config);

    let owner = service
        .lookup_by_mobile(&query.mobile, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let pets = match &owner {
        Some(owner) => service
            .pets_for_owner(&owner.id, auth.token())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?,
        None => Vec::new(),
    };

    Ok(Json(OwnerLookupResponse { owner, pets }))
}

#[axum::debug_handler]
pub async fn register(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    let service = RegistrationService::new(&config);

    let outcome = service
        .register(request, &user.id, auth.token())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!(outcome)))
}

#[axum::debug_handler]
pub async fn list_visits(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<VisitDayQuery>,
) -> Result<Json<Value>, AppError> {
    let service = VisitService::new(&config);

    let visits = service
        .visits_for_day(query.date, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "visits": visits,
        "total": visits.len()
    })))
}
