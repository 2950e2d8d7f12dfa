use std::sync::Arc;

use axum::extract::{Query, State};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dashboard_cell::handlers::get_stats;
use dashboard_cell::models::StatsQuery;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, TestUser};

fn mock_config(server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: server.uri(),
        supabase_anon_key: "test-anon-key".to_string(),
        supabase_jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
    }
}

fn create_auth_header(token: &str) -> TypedHeader<Authorization<Bearer>> {
    TypedHeader(Authorization::bearer(token).unwrap())
}

fn counted(total: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).insert_header("Content-Range", &*format!("*/{}", total))
}

#[tokio::test]
async fn test_stats_aggregates_all_four_counters() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::doctor("doc@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("HEAD"))
        .and(path("/rest/v1/visits"))
        .and(query_param("visit_date", "eq.2024-03-15"))
        .respond_with(counted(7))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/rest/v1/reminders"))
        .and(query_param("sent", "eq.false"))
        .and(query_param("reminder_date", "lte.2024-03-15"))
        .respond_with(counted(3))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": Uuid::new_v4(), "quantity": 1, "min_threshold": 5},
            {"id": Uuid::new_v4(), "quantity": 80, "min_threshold": 5},
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("status", "eq.scheduled"))
        .respond_with(counted(4))
        .mount(&mock_server)
        .await;

    let result = get_stats(
        State(Arc::new(config)),
        create_auth_header(&token),
        Query(StatsQuery {
            date: Some("2024-03-15".parse().unwrap()),
        }),
    )
    .await;

    assert!(result.is_ok(), "get_stats failed: {:?}", result.err());
    let stats = result.unwrap().0;
    assert_eq!(stats["today_visits"], 7);
    assert_eq!(stats["pending_followups"], 3);
    assert_eq!(stats["low_stock"], 1);
    assert_eq!(stats["today_appointments"], 4);
    assert_eq!(stats["date"], "2024-03-15");
}

#[tokio::test]
async fn test_stats_surfaces_backend_failure() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::doctor("doc@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = get_stats(
        State(Arc::new(config)),
        create_auth_header(&token),
        Query(StatsQuery {
            date: Some("2024-03-15".parse().unwrap()),
        }),
    )
    .await;

    assert!(result.is_err());
}
