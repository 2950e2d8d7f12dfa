use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::HeaderMap,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{TokenResponse, User};
use shared_models::error::AppError;
use shared_utils::jwt::validate_token as check_token;

use crate::models::{LoginRequest, RoleCheckRequest, RoleCheckResponse, RoleResponse};
use crate::nav::nav_items_for;
use crate::services::{RoleService, SessionService};

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("Login attempt for {}", request.email);

    let service = SessionService::new(&config);

    let session = service
        .sign_in(&request.email, &request.password)
        .await
        .map_err(|e| AppError::Auth(e.to_string()))?;

    Ok(Json(json!(session)))
}

#[axum::debug_handler]
pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_bearer_token(&headers)?;

    match check_token(&token, &config.supabase_jwt_secret) {
        Ok(user) => Ok(Json(TokenResponse {
            valid: true,
            user_id: user.id,
            email: user.email,
            role: user.role,
        })),
        Err(err) => Err(AppError::Auth(err)),
    }
}

#[axum::debug_handler]
pub async fn verify_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    debug!("Verifying token");

    let token = extract_bearer_token(&headers)?;

    match check_token(&token, &config.supabase_jwt_secret) {
        Ok(_) => Ok(Json(json!({ "valid": true }))),
        Err(_) => Ok(Json(json!({ "valid": false }))),
    }
}

#[axum::debug_handler]
pub async fn get_role(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<RoleResponse>, AppError> {
    let service = RoleService::new(&config);

    let role = service
        .resolve_role(&user.id, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(RoleResponse { user_id: user.id, role }))
}

#[axum::debug_handler]
pub async fn check_role(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<RoleCheckRequest>,
) -> Result<Json<RoleCheckResponse>, AppError> {
    let service = RoleService::new(&config);

    let granted = service
        .check_role(&request.user_id, request.role, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(RoleCheckResponse {
        user_id: request.user_id,
        role: request.role,
        granted,
    }))
}

#[axum::debug_handler]
pub async fn get_nav(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = RoleService::new(&config);

    let role = service
        .resolve_role(&user.id, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let items = nav_items_for(role);

    Ok(Json(json!({
        "role": role,
        "items": items,
    })))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    debug!("Getting profile for user: {}", user.id);

    let sessions = SessionService::new(&config);
    let roles = RoleService::new(&config);

    let auth_profile = sessions
        .current_user(auth.token())
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    let role = roles
        .resolve_role(&user.id, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "user_id": user.id,
        "auth_profile": auth_profile,
        "role": role,
    })))
}
