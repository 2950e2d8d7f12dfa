use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn registration_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(register))
        .route("/owners/lookup", get(lookup_owner))
        .route("/visits", get(list_visits))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
