//! End-to-end API tests over in-memory stores

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use core_kernel::StorageReference;
use domain_loads::MockLoadStore;
use domain_receipts::{MockBlobStore, MockReceiptLedger, RecordingObserver};
use interface_api::config::ApiConfig;
use interface_api::dto::loads::{DeleteLoadResponse, LoadResponse};
use interface_api::dto::receipts::{DeleteReceiptResponse, ReceiptEntry, SaveReceiptResponse};
use interface_api::{create_router, AppState, Ports};
use test_utils::{
    assert_canonical, assert_no_load_references, fake_load_fields, LoadFieldsBuilder, RawReferenceFixtures,
    ReferenceFixtures,
};

struct TestApp {
    server: TestServer,
    loads: MockLoadStore,
    ledger: MockReceiptLedger,
    blobs: MockBlobStore,
    observer: RecordingObserver,
}

impl TestApp {
    fn new() -> Self {
        let loads = MockLoadStore::new();
        let ledger = MockReceiptLedger::new();
        let blobs = MockBlobStore::new();
        let observer = RecordingObserver::new();
        let ports = Ports {
            loads: Arc::new(loads.clone()),
            ledger: Arc::new(ledger.clone()),
            blobs: Arc::new(blobs.clone()),
        };
        let state = AppState::with_observer(ApiConfig::default(), ports, Arc::new(observer.clone())).unwrap();
        let server = TestServer::new(create_router(state)).unwrap();
        Self {
            server,
            loads,
            ledger,
            blobs,
            observer,
        }
    }

    async fn create_load(&self) -> LoadResponse {
        let response = self
            .server
            .post("/api/v1/loads")
            .json(&LoadFieldsBuilder::new().build_json())
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    async fn attach(&self, load: &LoadResponse, raw: &str) -> axum_test::TestResponse {
        self.server
            .post(&format!("/api/v1/loads/{}/receipt", load.id.as_uuid()))
            .json(&json!({ "storageReference": raw }))
            .await
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = TestApp::new();
        let response = app.server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_unavailable_blob_store() {
        let app = TestApp::new();
        app.server.get("/health/ready").await.assert_status_ok();

        app.blobs.set_unavailable(true);
        let response = app.server.get("/health/ready").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.json::<Value>()["status"], "unavailable");
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let app = TestApp::new();
        let response = app.server.get("/health").await;
        assert!(response.headers().get("x-request-id").is_some());
    }
}

mod loads {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_load() {
        let app = TestApp::new();
        let created = app.create_load().await;
        assert!(created.receipt_storage_id.is_none());

        let fetched: LoadResponse = app
            .server
            .get(&format!("/api/v1/loads/{}", created.id.as_uuid()))
            .await
            .json();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.current_location, "Pune");
    }

    #[tokio::test]
    async fn test_create_accepts_random_valid_fields() {
        let app = TestApp::new();
        for _ in 0..10 {
            let fields = fake_load_fields();
            let response = app
                .server
                .post("/api/v1/loads")
                .json(&LoadFieldsBuilder::from_fields(fields.clone()).build_json())
                .await;
            response.assert_status(StatusCode::CREATED);
            let created: LoadResponse = response.json();
            assert_eq!(created.current_location, fields.current_location);
        }
        assert_eq!(app.loads.len().await, 10);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let app = TestApp::new();
        let body = LoadFieldsBuilder::new().from_location("  ").contact_number("abc").build_json();

        let response = app.server.post("/api/v1/loads").json(&body).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let error: Value = response.json();
        assert_eq!(error["error"], "validation_error");
        assert_eq!(error["details"].as_array().map(Vec::len), Some(2));
        assert!(app.loads.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_load_is_404() {
        let app = TestApp::new();
        let response = app
            .server
            .get("/api/v1/loads/00000000-0000-0000-0000-000000000000")
            .await;
        response.assert_status_not_found();
        assert_eq!(response.json::<Value>()["error"], "not_found");
    }

    #[tokio::test]
    async fn test_update_keeps_receipt() {
        let app = TestApp::new();
        let load = app.create_load().await;
        app.attach(&load, ReferenceFixtures::PRIMARY).await.assert_status_ok();

        let updated: LoadResponse = app
            .server
            .put(&format!("/api/v1/loads/{}", load.id.as_uuid()))
            .json(&LoadFieldsBuilder::new().to_location("Goa").build_json())
            .await
            .json();
        assert_eq!(updated.destination_location, "Goa");
        assert_eq!(updated.receipt_storage_id, Some(ReferenceFixtures::primary()));
    }

    #[tokio::test]
    async fn test_list_today_and_by_location() {
        let app = TestApp::new();
        let load = app.create_load().await;

        let today: Vec<LoadResponse> = app.server.get("/api/v1/loads/today").await.json();
        assert!(today.iter().any(|l| l.id == load.id));

        let at_pune: Vec<LoadResponse> = app
            .server
            .get("/api/v1/loads")
            .add_query_param("location", "Pune")
            .await
            .json();
        assert_eq!(at_pune.len(), 1);

        let at_delhi: Vec<LoadResponse> = app
            .server
            .get("/api/v1/loads")
            .add_query_param("location", "Delhi")
            .await
            .json();
        assert!(at_delhi.is_empty());
    }

    #[tokio::test]
    async fn test_delete_load_cascades_to_blob() {
        let app = TestApp::new();
        let load = app.create_load().await;
        app.attach(&load, ReferenceFixtures::PRIMARY).await.assert_status_ok();
        app.blobs.put(ReferenceFixtures::primary()).await;

        let report: DeleteLoadResponse = app
            .server
            .delete(&format!("/api/v1/loads/{}", load.id.as_uuid()))
            .await
            .json();
        assert!(report.blob_delete_attempted);
        assert!(report.warnings.is_empty());
        assert!(!app.blobs.contains(&ReferenceFixtures::primary()).await);
        assert!(app.loads.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_load_survives_blob_failure() {
        let app = TestApp::new();
        let load = app.create_load().await;
        app.attach(&load, ReferenceFixtures::PRIMARY).await.assert_status_ok();
        app.blobs.set_fail_deletes(true);

        let response = app
            .server
            .delete(&format!("/api/v1/loads/{}", load.id.as_uuid()))
            .await;
        response.assert_status_ok();
        let report: DeleteLoadResponse = response.json();
        assert_eq!(report.warnings.len(), 1);
        assert!(app.loads.is_empty().await);
        assert_eq!(app.observer.names(), vec!["blob_delete_failed"]);
    }
}

mod receipts {
    use super::*;

    #[tokio::test]
    async fn test_attach_normalizes_every_raw_shape() {
        let app = TestApp::new();
        for raw in [
            RawReferenceFixtures::compact(),
            RawReferenceFixtures::token_url(),
            RawReferenceFixtures::path_url(),
        ] {
            let load = app.create_load().await;
            let attached: LoadResponse = app.attach(&load, &raw).await.json();
            let stored = attached.receipt_storage_id.unwrap();
            assert_canonical(stored.as_str());
            assert_eq!(stored, ReferenceFixtures::primary());
        }
    }

    #[tokio::test]
    async fn test_attach_rejects_invalid_reference() {
        let app = TestApp::new();
        let load = app.create_load().await;

        let response = app.attach(&load, "not-a-reference").await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let error: Value = response.json();
        assert_eq!(error["error"], "invalid_reference");
        assert_eq!(error["raw"], "not-a-reference");
    }

    #[tokio::test]
    async fn test_list_merges_load_and_standalone_receipts() {
        let app = TestApp::new();
        let load = app.create_load().await;
        app.attach(&load, ReferenceFixtures::PRIMARY).await.assert_status_ok();

        let response = app
            .server
            .post("/api/v1/receipts")
            .json(&json!({ "storageReference": ReferenceFixtures::SECONDARY.replace('-', "") }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let saved: SaveReceiptResponse = response.json();
        assert_eq!(saved.storage_reference, ReferenceFixtures::secondary());

        let listed: Vec<ReceiptEntry> = app.server.get("/api/v1/receipts").await.json();
        let refs: Vec<&str> = listed.iter().map(|r| r.storage_reference.as_str()).collect();
        assert_eq!(refs, vec![ReferenceFixtures::PRIMARY, ReferenceFixtures::SECONDARY]);
    }

    #[tokio::test]
    async fn test_new_receipts_since() {
        let app = TestApp::new();
        let with_receipt = app.create_load().await;
        app.create_load().await;
        app.attach(&with_receipt, ReferenceFixtures::PRIMARY).await.assert_status_ok();

        let found: Vec<LoadResponse> = app
            .server
            .get("/api/v1/receipts/new")
            .add_query_param("since", "2020-01-01T00:00:00Z")
            .await
            .json();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, with_receipt.id);
    }

    #[tokio::test]
    async fn test_delete_by_reference_clears_everything() {
        let app = TestApp::new();
        let load = app.create_load().await;
        app.attach(&load, ReferenceFixtures::PRIMARY).await.assert_status_ok();
        app.server
            .post("/api/v1/receipts")
            .json(&json!({ "storageReference": ReferenceFixtures::PRIMARY }))
            .await
            .assert_status(StatusCode::CREATED);
        app.blobs.put(ReferenceFixtures::primary()).await;

        let report: DeleteReceiptResponse = app
            .server
            .delete(&format!("/api/v1/receipts/{}", ReferenceFixtures::PRIMARY))
            .await
            .json();
        assert!(report.blob_deleted);
        assert_eq!(report.loads_cleared, 1);
        assert_eq!(report.receipts_removed, 1);
        assert!(app.ledger.is_empty().await);

        let reloaded = app.loads.snapshot(load.id).await.unwrap();
        assert_no_load_references(&[reloaded], &ReferenceFixtures::primary());
    }

    #[tokio::test]
    async fn test_delete_by_percent_encoded_token_url() {
        let app = TestApp::new();
        let load = app.create_load().await;
        app.attach(&load, ReferenceFixtures::PRIMARY).await.assert_status_ok();

        // https://store/x?token=<PRIMARY>&exp=1
        let encoded = format!(
            "https%3A%2F%2Fstore%2Fx%3Ftoken%3D{}%26exp%3D1",
            ReferenceFixtures::PRIMARY
        );
        let response = app.server.delete(&format!("/api/v1/receipts/{}", encoded)).await;
        response.assert_status_ok();
        let report: DeleteReceiptResponse = response.json();
        assert_eq!(report.loads_cleared, 1);

        let reloaded = app.loads.snapshot(load.id).await.unwrap();
        assert_no_load_references(&[reloaded], &ReferenceFixtures::primary());
    }

    #[tokio::test]
    async fn test_delete_by_reference_fails_when_record_store_is_down() {
        let app = TestApp::new();
        app.ledger.set_unavailable(true);

        let response = app
            .server
            .delete(&format!("/api/v1/receipts/{}", ReferenceFixtures::PRIMARY))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<Value>()["error"], "storage_operation_failed");
        assert!(app.observer.names().contains(&"record_store_failed"));
    }

    #[tokio::test]
    async fn test_delete_standalone_receipt() {
        let app = TestApp::new();
        let saved: SaveReceiptResponse = app
            .server
            .post("/api/v1/receipts")
            .json(&json!({ "storageReference": ReferenceFixtures::PRIMARY }))
            .await
            .json();

        app.server
            .delete(&format!("/api/v1/receipts/standalone/{}", saved.receipt_id.as_uuid()))
            .await
            .assert_status_ok();
        assert!(app.ledger.is_empty().await);

        app.server
            .delete(&format!("/api/v1/receipts/standalone/{}", saved.receipt_id.as_uuid()))
            .await
            .assert_status_not_found();
    }
}

mod uploads {
    use super::*;

    #[tokio::test]
    async fn test_upload_target_carries_canonical_reference() {
        let app = TestApp::new();
        let response = app.server.post("/api/v1/uploads").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert!(body["uploadUrl"].as_str().is_some_and(|u| u.starts_with("https://")));
        let reference = body["storageReference"].as_str().unwrap();
        assert_canonical(reference);
    }

    #[tokio::test]
    async fn test_upload_target_when_store_is_down() {
        let app = TestApp::new();
        app.blobs.set_unavailable(true);

        let response = app.server.post("/api/v1/uploads").await;
        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_eq!(app.observer.names(), vec!["upload_issuance_failed"]);
    }

    #[tokio::test]
    async fn test_download_url_resolution() {
        let app = TestApp::new();
        app.blobs.put(ReferenceFixtures::primary()).await;

        let response = app
            .server
            .post("/api/v1/downloads")
            .json(&json!({ "storageReference": RawReferenceFixtures::token_url() }))
            .await;
        response.assert_status_ok();
        let url = response.json::<Value>()["url"].as_str().unwrap().to_string();
        assert!(url.ends_with(ReferenceFixtures::PRIMARY));

        let missing = app
            .server
            .post("/api/v1/downloads")
            .json(&json!({ "storageReference": ReferenceFixtures::SECONDARY }))
            .await;
        missing.assert_status_not_found();
        assert_eq!(missing.json::<Value>()["error"], "blob_not_found");

        let invalid = app
            .server
            .post("/api/v1/downloads")
            .json(&json!({ "storageReference": "" }))
            .await;
        invalid.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_upload_then_attach() {
        let app = TestApp::new();
        let target: Value = app.server.post("/api/v1/uploads").await.json();
        let load = app.create_load().await;

        let attached: LoadResponse = app
            .attach(&load, target["uploadUrl"].as_str().unwrap())
            .await
            .json();
        let expected = StorageReference::parse(target["storageReference"].as_str().unwrap()).unwrap();
        assert_eq!(attached.receipt_storage_id, Some(expected));
    }
}
