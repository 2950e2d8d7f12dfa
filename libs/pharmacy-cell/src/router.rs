use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn pharmacy_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/visits/{visit_id}/prescriptions", post(add_prescription))
        .route("/visits/{visit_id}/prescriptions", get(list_prescriptions))
        .route("/prescriptions/{id}", delete(delete_prescription))
        .route("/stock", post(add_stock_item))
        .route("/stock", get(list_stock))
        .route("/stock/{id}", patch(update_stock_item))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
