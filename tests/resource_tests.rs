//! Integration tests for the applicant, document and workflow run operations.
//!
//! Each test runs the typed operations against a local mock server and checks
//! the request that was sent as well as how the response was interpreted.

use std::time::Duration;

use chrono::NaiveDate;
use onfido::resources::{
    CreateApplicantPayload, CreateWorkflowRunPayload, DocumentFile, DocumentSide, DocumentType,
    ListApplicantsOption, ListWorkflowRunsOption, UploadDocumentPayload, WorkflowRunStatus,
};
use onfido::rest::{Pagination, SortDirection};
use onfido::{ApiToken, Context, Error, OnfidoClient, OnfidoConfig};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer) -> OnfidoClient {
    let config = OnfidoConfig::builder()
        .api_token(ApiToken::new("test-token").unwrap())
        .base_url(server.uri())
        .retries(3, Duration::from_millis(10))
        .build()
        .unwrap();
    OnfidoClient::new(config).unwrap()
}

/// Matches requests whose body contains the given text.
struct BodyContains(&'static str);

impl Match for BodyContains {
    fn matches(&self, request: &Request) -> bool {
        String::from_utf8_lossy(&request.body).contains(self.0)
    }
}

fn applicant_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "first_name": "Jane",
        "last_name": "Doe",
        "created_at": "2024-05-01T10:00:00Z",
        "sandbox": true
    })
}

// ============================================================================
// Applicants
// ============================================================================

#[tokio::test]
async fn test_create_applicant_sends_json_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3.6/applicants"))
        .and(body_json(json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "dob": "1990-01-31"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(applicant_json("app-1")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let payload = CreateApplicantPayload::new("Jane", "Doe")
        .dob(NaiveDate::from_ymd_opt(1990, 1, 31).unwrap());
    let applicant = client
        .create_applicant(&Context::background(), &payload)
        .await
        .unwrap();

    assert_eq!(applicant.id, "app-1");
    assert_eq!(applicant.last_name.as_deref(), Some("Doe"));
}

#[tokio::test]
async fn test_create_applicant_missing_field_is_validation_error_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3.6/applicants"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": {
                "type": "validation_error",
                "message": "There was a validation error on this request",
                "fields": {"last_name": ["can't be blank"]}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let payload = CreateApplicantPayload {
        first_name: Some("Jane".to_string()),
        ..CreateApplicantPayload::default()
    };
    let err = client
        .create_applicant(&Context::background(), &payload)
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(err.to_string().contains("last_name"));
}

#[tokio::test]
async fn test_retrieve_deleted_applicant_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v3.6/applicants/app-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3.6/applicants/app-1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"type": "resource_not_found", "message": "The resource could not be found"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ctx = Context::background();
    client.delete_applicant(&ctx, "app-1").await.unwrap();

    let err = client.retrieve_applicant(&ctx, "app-1").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.error_type(), Some("resource_not_found"));
}

#[tokio::test]
async fn test_update_and_restore_applicant() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v3.6/applicants/app-1"))
        .and(body_json(json!({"email": "jane@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(applicant_json("app-1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v3.6/applicants/app-1/restore"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ctx = Context::background();
    let payload = CreateApplicantPayload::default().email("jane@example.com");

    let applicant = client
        .update_applicant(&ctx, "app-1", &payload)
        .await
        .unwrap();
    assert_eq!(applicant.id, "app-1");

    client.restore_applicant(&ctx, "app-1").await.unwrap();
}

#[tokio::test]
async fn test_list_applicants_unwraps_envelope_and_sends_options() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3.6/applicants"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2"))
        .and(query_param("include_deleted", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "2")
                .set_body_json(json!({
                    "applicants": [applicant_json("a1"), applicant_json("a2")]
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let list = client
        .list_applicants(
            &Context::background(),
            &[
                Pagination::Page(1).into(),
                Pagination::Limit(2).into(),
                ListApplicantsOption::IncludeDeleted,
            ],
        )
        .await
        .unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(list[1].id, "a2");
    assert_eq!(list.page().total, Some(2));
    assert!(!list.page().has_next_page());
}

#[tokio::test]
async fn test_empty_ids_fail_without_request() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let ctx = Context::background();

    assert!(matches!(
        client.retrieve_applicant(&ctx, "").await,
        Err(Error::Validation { field: "applicant_id" })
    ));
    assert!(client.delete_applicant(&ctx, "").await.unwrap_err().is_validation());
    assert!(client.restore_applicant(&ctx, " ").await.unwrap_err().is_validation());
    assert!(client.download_document(&ctx, "").await.unwrap_err().is_validation());
    assert!(client.list_documents(&ctx, "").await.unwrap_err().is_validation());
    assert!(matches!(
        client.retrieve_workflow_run(&ctx, "").await,
        Err(Error::Validation { field: "workflow_run_id" })
    ));
    assert!(client
        .retrieve_workflow_run_evidence_summary_file(&ctx, "")
        .await
        .unwrap_err()
        .is_validation());

    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

// ============================================================================
// Documents
// ============================================================================

#[tokio::test]
async fn test_upload_document_sends_multipart_with_sniffed_type() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3.6/documents"))
        .and(BodyContains("name=\"applicant_id\"\r\n\r\napp-1\r\n"))
        .and(BodyContains("name=\"type\"\r\n\r\ndriving_licence\r\n"))
        .and(BodyContains("name=\"side\"\r\n\r\nfront\r\n"))
        .and(BodyContains("filename=\"licence.dat\"\r\nContent-Type: image/jpeg"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "doc-1",
            "applicant_id": "app-1",
            "type": "driving_licence",
            "side": "front",
            "file_type": "jpg"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let payload = UploadDocumentPayload::new(
        "app-1",
        DocumentType::DrivingLicence,
        DocumentFile::new("licence.dat", b"\xFF\xD8\xFF\xE0jpeg-data".to_vec()),
    )
    .side(DocumentSide::Front);

    let document = client
        .upload_document(&Context::background(), &payload)
        .await
        .unwrap();

    assert_eq!(document.id, "doc-1");
    assert_eq!(document.document_type, DocumentType::DrivingLicence);
}

#[tokio::test]
async fn test_list_documents_filters_by_applicant() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3.6/documents"))
        .and(query_param("applicant_id", "app-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"id": "doc-1", "type": "passport"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let documents = client
        .list_documents(&Context::background(), "app-1")
        .await
        .unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].document_type, DocumentType::Passport);
}

#[tokio::test]
async fn test_download_document_returns_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3.6/documents/doc-1/download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7 content".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bytes = client
        .download_document(&Context::background(), "doc-1")
        .await
        .unwrap();

    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_download_with_empty_body_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3.6/documents/doc-1/video/download"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .download_document_video(&Context::background(), "doc-1")
        .await
        .unwrap_err();

    match err {
        Error::Api(e) => assert!(e.is_unknown()),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_download_nfc_face_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3.6/documents/doc-1/nfc_face"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"type": "resource_not_found", "message": "NFC face not found"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .download_document_nfc_face(&Context::background(), "doc-1")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

// ============================================================================
// Workflow Runs
// ============================================================================

#[tokio::test]
async fn test_create_workflow_run() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3.6/workflow_runs"))
        .and(body_json(json!({
            "applicant_id": "app-1",
            "workflow_id": "wf-1",
            "tags": ["onboarding"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "run-1",
            "applicant_id": "app-1",
            "workflow_id": "wf-1",
            "workflow_version_id": 3,
            "status": "processing"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let payload = CreateWorkflowRunPayload::new("app-1", "wf-1").tags(["onboarding"]);
    let run = client
        .create_workflow_run(&Context::background(), &payload)
        .await
        .unwrap();

    assert_eq!(run.id, "run-1");
    assert_eq!(run.status, Some(WorkflowRunStatus::Processing));
}

#[tokio::test]
async fn test_list_workflow_runs_reads_bare_array_and_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3.6/workflow_runs"))
        .and(query_param("status", "approved"))
        .and(query_param("tags", "a,b"))
        .and(query_param("created_at_gt", "2024-01-01"))
        .and(query_param("sort", "asc"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "1")
                .set_body_json(json!([{"id": "run-1", "status": "approved"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let runs = client
        .list_workflow_runs(
            &Context::background(),
            &[
                ListWorkflowRunsOption::Status(WorkflowRunStatus::Approved),
                ListWorkflowRunsOption::Tags(vec!["a".to_string(), "b".to_string()]),
                ListWorkflowRunsOption::CreatedAfter(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
                ListWorkflowRunsOption::Sort(SortDirection::Asc),
            ],
        )
        .await
        .unwrap();

    assert_eq!(runs.len(), 1);
    assert_eq!(runs.page().total, Some(1));
}

#[tokio::test]
async fn test_evidence_summary_resolves_location() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3.6/workflow_runs/run-1/signed_evidence_file"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "https://storage.example/evidence.pdf?sig=abc"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let summary = client
        .retrieve_workflow_run_evidence_summary_file(&Context::background(), "run-1")
        .await
        .unwrap();

    assert_eq!(summary.url, "https://storage.example/evidence.pdf?sig=abc");
}

#[tokio::test]
async fn test_evidence_summary_without_location_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3.6/workflow_runs/run-1/signed_evidence_file"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .retrieve_workflow_run_evidence_summary_file(&Context::background(), "run-1")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api(ref e) if e.is_unknown()));
}
