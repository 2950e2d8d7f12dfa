use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use billing_cell::router::billing_routes;
use clinical_cell::router::clinical_routes;
use dashboard_cell::router::dashboard_routes;
use pharmacy_cell::router::pharmacy_routes;
use registration_cell::router::registration_routes;
use shared_config::AppConfig;
use vaccination_cell::router::vaccination_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Royal Pet Clinic API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/registration", registration_routes(state.clone()))
        .nest("/clinical", clinical_routes(state.clone()))
        .nest("/pharmacy", pharmacy_routes(state.clone()))
        .nest("/billing", billing_routes(state.clone()))
        .nest("/vaccination", vaccination_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/dashboard", dashboard_routes(state))
}
