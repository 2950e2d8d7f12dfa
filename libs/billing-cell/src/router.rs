use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn billing_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/visits/{visit_id}/bill", get(get_bill))
        .route("/visits/{visit_id}/items", post(add_item))
        .route("/items/{id}", delete(remove_item))
        .route("/bills/{id}/pay", post(mark_paid))
        .route("/bills/{id}/invoice", get(get_invoice))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
