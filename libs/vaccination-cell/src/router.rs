use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn vaccination_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/visits/{visit_id}/vaccinations", post(record_vaccination))
        .route("/visits/{visit_id}/vaccinations", get(list_vaccinations))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
