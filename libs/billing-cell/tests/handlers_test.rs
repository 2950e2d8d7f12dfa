use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use billing_cell::handlers::{add_item, get_invoice, mark_paid, remove_item};
use billing_cell::models::{AddItemRequest, MarkPaidRequest};
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

fn bill_row(bill_id: &Uuid, visit_id: &Uuid, total: f64, status: Option<&str>) -> serde_json::Value {
    json!({
        "id": bill_id,
        "visit_id": visit_id,
        "total_amount": total,
        "status": status,
        "payment_mode": "Cash",
        "created_at": "2024-01-01T00:00:00Z"
    })
}

fn item_row(bill_id: &Uuid, description: &str, amount: f64, quantity: i32) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "bill_id": bill_id,
        "description": description,
        "category": "Consultation",
        "amount": amount,
        "quantity": quantity
    })
}

#[tokio::test]
async fn test_add_item_creates_bill_and_recomputes_total() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::receptionist("reception@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    let visit_id = Uuid::new_v4();
    let bill_id = Uuid::new_v4();

    // No bill yet for this visit
    Mock::given(method("GET"))
        .and(path("/rest/v1/bills"))
        .and(query_param("visit_id", format!("eq.{}", visit_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bills"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            bill_row(&bill_id, &visit_id, 0.0, None)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bill_items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            item_row(&bill_id, "X-Ray", 150.0, 2)
        ])))
        .mount(&mock_server)
        .await;

    // The authoritative post-insert item set: both rows, 500×1 + 150×2
    Mock::given(method("GET"))
        .and(path("/rest/v1/bill_items"))
        .and(query_param("bill_id", format!("eq.{}", bill_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            item_row(&bill_id, "Consultation", 500.0, 1),
            item_row(&bill_id, "X-Ray", 150.0, 2),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bills"))
        .and(query_param("id", format!("eq.{}", bill_id)))
        .and(body_partial_json(json!({ "total_amount": 800.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            bill_row(&bill_id, &visit_id, 800.0, None)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = add_item(
        State(Arc::new(config)),
        create_auth_header(&token),
        Path(visit_id),
        Json(AddItemRequest {
            description: "X-Ray".to_string(),
            category: Some("Treatment".to_string()),
            amount: 150.0,
            quantity: Some(2),
            payment_mode: Some("Cash".to_string()),
        }),
    )
    .await;

    assert!(result.is_ok(), "add_item failed: {:?}", result.err());
    let response = result.unwrap().0;
    assert_eq!(response["total_amount"], 800.0);
    assert_eq!(response["bill"]["total_amount"], 800.0);
    assert_eq!(response["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_remove_item_recomputes_from_remaining_rows() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::receptionist("reception@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    let visit_id = Uuid::new_v4();
    let bill_id = Uuid::new_v4();
    let item_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/bill_items"))
        .and(query_param("id", format!("eq.{}", item_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"bill_id": bill_id}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/bill_items"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bill_items"))
        .and(query_param("bill_id", format!("eq.{}", bill_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            item_row(&bill_id, "Consultation", 500.0, 1),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bills"))
        .and(body_partial_json(json!({ "total_amount": 500.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            bill_row(&bill_id, &visit_id, 500.0, None)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = remove_item(
        State(Arc::new(config)),
        create_auth_header(&token),
        Path(item_id),
    )
    .await;

    assert!(result.is_ok(), "remove_item failed: {:?}", result.err());
    assert_eq!(result.unwrap().0["total_amount"], 500.0);
}

#[tokio::test]
async fn test_add_item_rejects_nonpositive_amount() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::receptionist("reception@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    let result = add_item(
        State(Arc::new(config)),
        create_auth_header(&token),
        Path(Uuid::new_v4()),
        Json(AddItemRequest {
            description: "Consultation".to_string(),
            category: None,
            amount: 0.0,
            quantity: Some(1),
            payment_mode: None,
        }),
    )
    .await;

    assert!(matches!(result.unwrap_err(), AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_mark_paid_sets_terminal_status() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::receptionist("reception@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    let visit_id = Uuid::new_v4();
    let bill_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/bills"))
        .and(query_param("id", format!("eq.{}", bill_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            bill_row(&bill_id, &visit_id, 800.0, None)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bills"))
        .and(body_partial_json(json!({ "status": "paid" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            bill_row(&bill_id, &visit_id, 800.0, Some("paid"))
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = mark_paid(
        State(Arc::new(config)),
        create_auth_header(&token),
        Path(bill_id),
        Json(MarkPaidRequest {
            payment_mode: Some("Online".to_string()),
        }),
    )
    .await;

    assert!(result.is_ok(), "mark_paid failed: {:?}", result.err());
    assert_eq!(result.unwrap().0["status"], "paid");
}

#[tokio::test]
async fn test_mark_paid_twice_is_conflict() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::receptionist("reception@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    let visit_id = Uuid::new_v4();
    let bill_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/bills"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            bill_row(&bill_id, &visit_id, 800.0, Some("paid"))
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bills"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = mark_paid(
        State(Arc::new(config)),
        create_auth_header(&token),
        Path(bill_id),
        Json(MarkPaidRequest { payment_mode: None }),
    )
    .await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::Conflict(msg) => assert!(msg.contains("already paid")),
        other => panic!("Expected Conflict error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invoice_assembles_printable_data() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::receptionist("reception@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    let visit_id = Uuid::new_v4();
    let bill_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/bills"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": bill_id,
                "visit_id": visit_id,
                "total_amount": 800.0,
                "status": "paid",
                "payment_mode": "Cash",
                "created_at": "2024-01-01T00:00:00Z",
                "visits": {
                    "case_number": "240101-007",
                    "pets": {
                        "name": "Bruno",
                        "owners": {"name": "Asha Rao", "mobile": "9876543210"}
                    }
                }
            }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bill_items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            item_row(&bill_id, "Consultation", 500.0, 1),
            item_row(&bill_id, "X-Ray", 150.0, 2),
        ])))
        .mount(&mock_server)
        .await;

    let result = get_invoice(
        State(Arc::new(config)),
        create_auth_header(&token),
        Path(bill_id),
    )
    .await;

    assert!(result.is_ok(), "get_invoice failed: {:?}", result.err());
    let invoice = result.unwrap().0;
    assert_eq!(invoice["case_number"], "240101-007");
    assert_eq!(invoice["owner_name"], "Asha Rao");
    assert_eq!(invoice["pet_name"], "Bruno");
    assert_eq!(invoice["total_amount"], 800.0);
    assert_eq!(invoice["lines"][1]["subtotal"], 300.0);
}
