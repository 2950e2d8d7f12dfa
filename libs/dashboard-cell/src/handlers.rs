use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::Utc;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::StatsQuery;
use crate::services::StatsService;

#[axum::debug_handler]
pub async fn get_stats(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Value>, AppError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let service = StatsService::new(&config);

    let stats = service
        .collect(date, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!(stats)))
}
