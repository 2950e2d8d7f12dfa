use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn clinical_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/exams/{visit_id}", get(get_exam))
        .route("/exams/{visit_id}", put(save_exam))
        .route("/visits/{visit_id}/diagnoses", post(add_diagnosis))
        .route("/visits/{visit_id}/diagnoses", get(list_diagnoses))
        .route("/diagnoses/{id}", delete(delete_diagnosis))
        .route("/visits/{visit_id}/treatments", post(add_treatment))
        .route("/visits/{visit_id}/treatments", get(list_treatments))
        .route("/treatments/{id}", delete(delete_treatment))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
