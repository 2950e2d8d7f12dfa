use serde::{Deserialize, Serialize};

use shared_models::role::AppRole;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session material handed back by the auth backend on a password grant.
/// Extra fields the backend sends are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
    pub user: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleResponse {
    pub user_id: String,
    pub role: Option<AppRole>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleCheckRequest {
    pub user_id: String,
    pub role: AppRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleCheckResponse {
    pub user_id: String,
    pub role: AppRole,
    pub granted: bool,
}
