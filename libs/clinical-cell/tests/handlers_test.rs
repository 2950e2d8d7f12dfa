use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clinical_cell::handlers::{add_diagnosis, add_treatment, list_treatments, save_exam};
use clinical_cell::models::{CreateDiagnosisRequest, CreateTreatmentRequest, UpsertExamRequest};
use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestUser};

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

fn create_user_extension(staff: &TestUser) -> Extension<User> {
    Extension(staff.to_user())
}

async fn mount_role(server: &MockServer, user_id: &str, role: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/user_roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::role_row(user_id, role)
        ])))
        .mount(server)
        .await;
}

fn exam_row(exam_id: &str, visit_id: &Uuid) -> serde_json::Value {
    json!({
        "id": exam_id,
        "visit_id": visit_id,
        "temperature": 101.3,
        "heart_rate": "92",
        "appetite": "Normal",
        "alimentary": "normal",
        "created_at": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn test_save_exam_inserts_when_none_exists() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let doctor = TestUser::doctor("doc@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&doctor, &config.supabase_jwt_secret, Some(24));
    let visit_id = Uuid::new_v4();

    mount_role(&mock_server, &doctor.id, "doctor").await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/clinical_exams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/clinical_exams"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            exam_row(&Uuid::new_v4().to_string(), &visit_id)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = UpsertExamRequest {
        temperature: Some(101.3),
        heart_rate: Some("92".to_string()),
        appetite: Some("Normal".to_string()),
        ..Default::default()
    };

    let result = save_exam(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_user_extension(&doctor),
        Path(visit_id),
        Json(request),
    )
    .await;

    assert!(result.is_ok(), "save_exam failed: {:?}", result.err());
    assert_eq!(result.unwrap().0["temperature"], 101.3);
}

#[tokio::test]
async fn test_save_exam_updates_existing_row() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let doctor = TestUser::doctor("doc@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&doctor, &config.supabase_jwt_secret, Some(24));
    let visit_id = Uuid::new_v4();
    let exam_id = Uuid::new_v4().to_string();

    mount_role(&mock_server, &doctor.id, "doctor").await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/clinical_exams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": exam_id}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/clinical_exams"))
        .and(query_param("id", format!("eq.{}", exam_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            exam_row(&exam_id, &visit_id)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/clinical_exams"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = save_exam(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_user_extension(&doctor),
        Path(visit_id),
        Json(UpsertExamRequest::default()),
    )
    .await;

    assert!(result.is_ok(), "save_exam failed: {:?}", result.err());
}

#[tokio::test]
async fn test_save_exam_rejects_receptionist() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::receptionist("reception@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    mount_role(&mock_server, &staff.id, "receptionist").await;

    let result = save_exam(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_user_extension(&staff),
        Path(Uuid::new_v4()),
        Json(UpsertExamRequest::default()),
    )
    .await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::Auth(msg) => assert!(msg.contains("Only doctors")),
        other => panic!("Expected Auth error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_add_diagnosis_as_doctor() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let doctor = TestUser::doctor("doc@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&doctor, &config.supabase_jwt_secret, Some(24));
    let visit_id = Uuid::new_v4();

    mount_role(&mock_server, &doctor.id, "doctor").await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/diagnoses"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            {
                "id": Uuid::new_v4(),
                "visit_id": visit_id,
                "test_type": "CBC",
                "result": "WBC elevated",
                "notes": null,
                "report_url": null,
                "created_at": "2024-01-01T00:00:00Z"
            }
        ])))
        .mount(&mock_server)
        .await;

    let result = add_diagnosis(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_user_extension(&doctor),
        Path(visit_id),
        Json(CreateDiagnosisRequest {
            test_type: "CBC".to_string(),
            result: Some("WBC elevated".to_string()),
            notes: None,
            report_url: None,
        }),
    )
    .await;

    assert!(result.is_ok(), "add_diagnosis failed: {:?}", result.err());
    assert_eq!(result.unwrap().0["test_type"], "CBC");
}

#[tokio::test]
async fn test_add_treatment_rejects_receptionist() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::receptionist("reception@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));

    mount_role(&mock_server, &staff.id, "receptionist").await;

    // The write must be blocked before any treatment insert goes out
    Mock::given(method("POST"))
        .and(path("/rest/v1/treatments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = add_treatment(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_user_extension(&staff),
        Path(Uuid::new_v4()),
        Json(CreateTreatmentRequest {
            category: "Antibiotic".to_string(),
            medicine_name: "Amoxicillin".to_string(),
            dosage: Some("250mg".to_string()),
            notes: None,
        }),
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_list_treatments_open_to_staff() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let staff = TestUser::receptionist("reception@royalpetclinic.test");
    let token = JwtTestUtils::create_test_token(&staff, &config.supabase_jwt_secret, Some(24));
    let visit_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/treatments"))
        .and(query_param("visit_id", format!("eq.{}", visit_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": Uuid::new_v4(),
                "visit_id": visit_id,
                "category": "Antibiotic",
                "medicine_name": "Amoxicillin",
                "dosage": "250mg",
                "notes": null,
                "created_at": "2024-01-01T00:00:00Z"
            }
        ])))
        .mount(&mock_server)
        .await;

    let result = list_treatments(
        State(Arc::new(config)),
        create_auth_header(&token),
        Path(visit_id),
    )
    .await;

    assert!(result.is_ok(), "list_treatments failed: {:?}", result.err());
    let response = result.unwrap().0;
    assert_eq!(response["total"], 1);
    assert_eq!(response["treatments"][0]["medicine_name"], "Amoxicillin");
}
