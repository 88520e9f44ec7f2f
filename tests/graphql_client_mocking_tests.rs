//! GraphQL remote client tests
//!
//! These tests use wiremock to stand in for the GraphQL endpoint and the
//! object store, so the client is exercised over real HTTP without a backend.

use idv_register::config::{RemoteConfig, WorkflowConfig};
use idv_register::registration::{
    Action, CaptureTarget, RegistrationSession, RegistrationStatus, SubmitOutcome, TextField,
    UploadedImage,
};
use idv_register::remote::{GraphQlRemoteClient, RemoteError, RemoteServiceClient, UserRecord};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "pool-token";

/// Mock backend exposing `/graphql` and an object store under `/storage`
struct BackendMock {
    server: MockServer,
}

impl BackendMock {
    async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    fn config(&self) -> RemoteConfig {
        RemoteConfig {
            graphql_endpoint: format!("{}/graphql", self.server.uri()),
            storage_endpoint: format!("{}/storage/", self.server.uri()),
            auth_token: Some(TOKEN.to_string()),
            requests_per_second: 100,
            burst_capacity: 100,
            request_timeout_seconds: Some(5),
        }
    }

    fn client(&self) -> GraphQlRemoteClient {
        GraphQlRemoteClient::new(&self.config()).expect("client builds")
    }

    async fn mock_operation(&self, operation: &str, response: serde_json::Value, expected: u64) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", TOKEN))
            .and(body_string_contains(operation))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .expect(expected)
            .mount(&self.server)
            .await;
    }

    async fn mock_upload(&self, key: &str, status: u16) {
        Mock::given(method("PUT"))
            .and(path(format!("/storage/{key}")))
            .and(header("content-type", "image/jpeg"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&self.server)
            .await;
    }
}

fn record() -> UserRecord {
    UserRecord {
        tenant_id: "Amazon".to_string(),
        user_id: "jdoe".to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        dob: "1990-01-01".to_string(),
        registration_status: "error-initialentry".to_string(),
        face_image_key: "regimages/jdoe.jpg".to_string(),
    }
}

#[tokio::test]
async fn test_create_user_record_sends_table_fields() {
    let backend = BackendMock::new().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "variables": {
                "input": {
                    "companyid": "Amazon",
                    "userid": "jdoe",
                    "faceimage": "regimages/jdoe.jpg",
                    "registrationstatus": "error-initialentry"
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "createUserInfo": { "companyid": "Amazon", "userid": "jdoe" } }
        })))
        .expect(1)
        .mount(&backend.server)
        .await;

    let id = backend.client().create_user_record(&record()).await.unwrap();
    assert_eq!(id.0, "jdoe");
}

#[tokio::test]
async fn test_duplicate_record_is_reported_as_conflict() {
    let backend = BackendMock::new().await;
    backend
        .mock_operation(
            "createUserInfo",
            json!({
                "data": { "createUserInfo": null },
                "errors": [{
                    "message": "The conditional request failed",
                    "errorType": "DynamoDB:ConditionalCheckFailedException"
                }]
            }),
            1,
        )
        .await;

    let err = backend.client().create_user_record(&record()).await.unwrap_err();
    assert!(err.is_conflict(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_rejected_token_is_unauthorized() {
    let backend = BackendMock::new().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired token"))
        .mount(&backend.server)
        .await;

    let err = backend.client().delete_user("{}").await.unwrap_err();
    assert_eq!(
        err,
        RemoteError::Unauthorized {
            message: "expired token".to_string()
        }
    );
}

#[tokio::test]
async fn test_upload_puts_bytes_under_key() {
    let backend = BackendMock::new().await;
    backend.mock_upload("regimages/jdoe.jpg", 200).await;

    let receipt = backend
        .client()
        .upload_blob("regimages/jdoe.jpg", b"face".to_vec(), "image/jpeg")
        .await
        .unwrap();
    assert!(receipt.has_valid_key());
    assert_eq!(receipt.key.as_deref(), Some("regimages/jdoe.jpg"));
}

#[tokio::test]
async fn test_upload_refusal_is_an_http_error() {
    let backend = BackendMock::new().await;
    backend.mock_upload("regimages/jdoe.jpg", 503).await;

    let err = backend
        .client()
        .upload_blob("regimages/jdoe.jpg", b"face".to_vec(), "image/jpeg")
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Http { status: 503, .. }));
}

#[tokio::test]
async fn test_detect_text_reads_lines() {
    let backend = BackendMock::new().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "imageDataBase64": "Y2FyZA==" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "detecttextinidcard": { "DetectedText": ["JANE", "DOE"] } }
        })))
        .mount(&backend.server)
        .await;

    let detected = backend.client().detect_id_card_text("Y2FyZA==").await.unwrap();
    assert_eq!(detected.detected_text, vec!["JANE", "DOE"]);
}

#[tokio::test]
async fn test_verification_result_is_decoded() {
    let backend = BackendMock::new().await;
    backend
        .mock_operation(
            "registernewuserwithidcard",
            json!({
                "data": {
                    "registernewuserwithidcard": { "Success": false, "Message": "duplicate id" }
                }
            }),
            1,
        )
        .await;

    let result = backend
        .client()
        .register_user_with_id_card("{}", "ZmFjZQ==", "Y2FyZA==")
        .await
        .unwrap();
    assert!(!result.success);
    assert_eq!(result.message, "duplicate id");
}

#[tokio::test]
async fn test_session_registers_end_to_end() {
    let backend = BackendMock::new().await;
    backend
        .mock_operation(
            "createUserInfo",
            json!({ "data": { "createUserInfo": { "companyid": "Amazon", "userid": "jdoe" } } }),
            1,
        )
        .await;
    backend.mock_upload("regimages/jdoe.jpg", 200).await;
    backend
        .mock_operation(
            "registernewuserwithidcard",
            json!({ "data": { "registernewuserwithidcard": { "Success": true, "Message": "" } } }),
            1,
        )
        .await;
    backend
        .mock_operation("deleteuser", json!({ "data": { "deleteuser": null } }), 0)
        .await;

    let session = RegistrationSession::new(Arc::new(backend.client()), WorkflowConfig::default());
    session.set_text(TextField::UserId, "jdoe");
    session.set_text(TextField::FirstName, "Jane");
    session.set_text(TextField::LastName, "Doe");
    session.set_text(TextField::DateOfBirth, "1990-01-01");
    session.capture(CaptureTarget::Selfie, "data:image/jpeg;base64,ZmFjZQ==");
    session.capture(CaptureTarget::IdCard, "data:image/jpeg;base64,Y2FyZA==");
    session.dispatch(Action::SetUploadedIdCard(Some(UploadedImage::new(
        "card.jpg",
        "data:image/jpeg;base64,Y2FyZA==",
    ))));

    let outcome = session.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Registered { .. }), "{outcome:?}");
    assert_eq!(session.state().status, RegistrationStatus::Success);
}

#[tokio::test]
async fn test_session_deletes_record_when_verification_fails() {
    let backend = BackendMock::new().await;
    backend
        .mock_operation(
            "createUserInfo",
            json!({ "data": { "createUserInfo": { "companyid": "Amazon", "userid": "jdoe" } } }),
            1,
        )
        .await;
    backend.mock_upload("regimages/jdoe.jpg", 200).await;
    backend
        .mock_operation(
            "registernewuserwithidcard",
            json!({
                "data": {
                    "registernewuserwithidcard": { "Success": false, "Message": "face mismatch" }
                }
            }),
            1,
        )
        .await;
    backend
        .mock_operation("deleteuser", json!({ "data": { "deleteuser": "ok" } }), 1)
        .await;

    let session = RegistrationSession::new(Arc::new(backend.client()), WorkflowConfig::default());
    session.set_text(TextField::UserId, "jdoe");
    session.set_text(TextField::FirstName, "Jane");
    session.set_text(TextField::LastName, "Doe");
    session.set_text(TextField::DateOfBirth, "1990-01-01");
    session.capture(CaptureTarget::Selfie, "data:image/jpeg;base64,ZmFjZQ==");
    session.capture(CaptureTarget::IdCard, "data:image/jpeg;base64,Y2FyZA==");
    session.dispatch(Action::SetUploadedIdCard(Some(UploadedImage::new(
        "card.jpg",
        "data:image/jpeg;base64,Y2FyZA==",
    ))));

    let outcome = session.submit().await;
    assert!(matches!(outcome, SubmitOutcome::VerificationRejected { .. }));
    let state = session.state();
    assert_eq!(state.error_message, "face mismatch");
    assert!(!state.busy);
}
