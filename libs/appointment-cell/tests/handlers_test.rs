use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::handlers::{book_appointment, update_appointment_status};
use appointment_cell::models::{AppointmentStatus, BookAppointmentRequest, UpdateStatusRequest};
use shared_config::AppConfig;
use shared_models::error::AppError;
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

fn appointment_row(id: &Uuid, pet_id: &Uuid, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "pet_id": pet_id,
        "appointment_date": "2024-03-15",
        "appointment_time": "10:00:00",
        "reason": "Annual checkup",
        "status": status,
        "is_followup": false,
        "created_at": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn test_book_appointment_defaults_to_scheduled() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::receptionist("reception@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    let appointment_id = Uuid::new_v4();
    let pet_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({ "status": "scheduled" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            appointment_row(&appointment_id, &pet_id, "scheduled")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = book_appointment(
        State(Arc::new(config)),
        create_auth_header(&token),
        Json(BookAppointmentRequest {
            pet_id,
            appointment_date: "2024-03-15".parse().unwrap(),
            appointment_time: Some("10:00:00".parse().unwrap()),
            reason: Some("Annual checkup".to_string()),
            is_followup: None,
        }),
    )
    .await;

    assert!(result.is_ok(), "book_appointment failed: {:?}", result.err());
    assert_eq!(result.unwrap().0["status"], "scheduled");
}

#[tokio::test]
async fn test_completing_scheduled_appointment() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::receptionist("reception@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    let appointment_id = Uuid::new_v4();
    let pet_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(&appointment_id, &pet_id, "scheduled")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({ "status": "completed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(&appointment_id, &pet_id, "completed")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = update_appointment_status(
        State(Arc::new(config)),
        create_auth_header(&token),
        Path(appointment_id),
        Json(UpdateStatusRequest {
            status: AppointmentStatus::Completed,
        }),
    )
    .await;

    assert!(result.is_ok(), "update failed: {:?}", result.err());
    assert_eq!(result.unwrap().0["status"], "completed");
}

#[tokio::test]
async fn test_cancelled_appointment_cannot_transition() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::receptionist("reception@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    let appointment_id = Uuid::new_v4();
    let pet_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(&appointment_id, &pet_id, "cancelled")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = update_appointment_status(
        State(Arc::new(config)),
        create_auth_header(&token),
        Path(appointment_id),
        Json(UpdateStatusRequest {
            status: AppointmentStatus::Completed,
        }),
    )
    .await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::Conflict(msg) => assert!(msg.contains("scheduled")),
        other => panic!("Expected Conflict error, got {:?}", other),
    }
}
