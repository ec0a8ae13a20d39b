mod helpers;

use helpers::{bearer, client_for, stalling_server, TEST_KEY};
use mockito::{Matcher, Server};
use serde_json::json;
use std::io::Write;
use thurgood_client::{
    ApiClient, ClientConfig, ClientError, CredentialResolver, IngestionTrigger,
};

const TRANSCRIPT: &str = "WITNESS: I do not recall.\n";

fn slot_body(upload_url: &str, next_step: bool) -> String {
    let mut body = json!({
        "objectId": "obj_1",
        "uploadUrl": upload_url,
        "expiresIn": 3600,
        "s3Key": "vaults/v_1/obj_1"
    });
    if next_step {
        body["nextStep"] = json!({ "method": "POST", "endpoint": "/vault/v_1/ingest/obj_1" });
    }
    body.to_string()
}

#[tokio::test]
async fn test_upload_transfers_bytes_and_starts_ingestion() {
    let mut server = Server::new_async().await;
    let upload_url = format!("{}/blob/obj_1", server.url());

    let slot = server
        .mock("POST", "/vault/v_1/upload")
        .match_header("authorization", bearer().as_str())
        .match_body(Matcher::Json(json!({
            "filename": "deposition.pdf",
            "contentType": "application/pdf",
            "sizeBytes": 11,
            "auto_index": true
        })))
        .with_status(200)
        .with_body(slot_body(&upload_url, true))
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/blob/obj_1")
        .match_header("content-type", "application/pdf")
        .match_header("authorization", Matcher::Missing)
        .match_body("%PDF-1.7 ok")
        .with_status(200)
        .create_async()
        .await;
    let ingest = server
        .mock("POST", "/vault/v_1/ingest/obj_1")
        .with_status(200)
        .with_body(r#"{"status": "processing"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client
        .upload_bytes("v_1", "deposition.pdf", b"%PDF-1.7 ok".to_vec(), true)
        .await
        .unwrap();

    assert_eq!(outcome.object_id, "obj_1");
    assert_eq!(outcome.size_bytes, 11);
    assert_eq!(outcome.ingestion, IngestionTrigger::Started);
    assert!(outcome.ingestion_error.is_none());
    assert_eq!(outcome.storage_key.as_deref(), Some("vaults/v_1/obj_1"));
    slot.assert_async().await;
    put.assert_async().await;
    ingest.assert_async().await;
}

#[tokio::test]
async fn test_failed_transfer_never_triggers_ingestion() {
    let mut server = Server::new_async().await;
    let upload_url = format!("{}/blob/obj_1", server.url());

    server
        .mock("POST", "/vault/v_1/upload")
        .with_status(200)
        .with_body(slot_body(&upload_url, true))
        .create_async()
        .await;
    server
        .mock("PUT", "/blob/obj_1")
        .with_status(403)
        .with_body("SignatureDoesNotMatch")
        .create_async()
        .await;
    let ingest = server
        .mock("POST", "/vault/v_1/ingest/obj_1")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .upload_bytes("v_1", "notes.txt", b"hello".to_vec(), true)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("SignatureDoesNotMatch"));
    ingest.assert_async().await;
}

#[tokio::test]
async fn test_ingestion_failure_is_soft() {
    let mut server = Server::new_async().await;
    let upload_url = format!("{}/blob/obj_1", server.url());

    server
        .mock("POST", "/vault/v_1/upload")
        .with_status(200)
        .with_body(slot_body(&upload_url, true))
        .create_async()
        .await;
    server
        .mock("PUT", "/blob/obj_1")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("POST", "/vault/v_1/ingest/obj_1")
        .with_status(500)
        .with_body("indexer unavailable")
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client
        .upload_bytes("v_1", "notes.txt", b"hello".to_vec(), true)
        .await
        .unwrap();

    assert_eq!(outcome.object_id, "obj_1");
    assert_eq!(outcome.ingestion, IngestionTrigger::FailedToStart);
    assert_eq!(outcome.ingestion.to_string(), "failed to start");
    assert!(outcome
        .ingestion_error
        .as_deref()
        .unwrap()
        .contains("indexer unavailable"));
}

#[tokio::test]
async fn test_ingestion_skipped_without_next_step_or_auto_index() {
    let mut server = Server::new_async().await;
    let upload_url = format!("{}/blob/obj_1", server.url());

    server
        .mock("POST", "/vault/v_1/upload")
        .with_status(200)
        .with_body(slot_body(&upload_url, false))
        .expect(2)
        .create_async()
        .await;
    server
        .mock("PUT", "/blob/obj_1")
        .with_status(200)
        .expect(2)
        .create_async()
        .await;
    let ingest = server
        .mock("POST", "/vault/v_1/ingest/obj_1")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let requested = client
        .upload_bytes("v_1", "a.txt", b"a".to_vec(), true)
        .await
        .unwrap();
    let not_requested = client
        .upload_bytes("v_1", "a.txt", b"a".to_vec(), false)
        .await
        .unwrap();

    assert_eq!(requested.ingestion, IngestionTrigger::Skipped);
    assert_eq!(not_requested.ingestion, IngestionTrigger::Skipped);
    ingest.assert_async().await;
}

#[tokio::test]
async fn test_expired_slot_is_not_used() {
    let mut server = Server::new_async().await;
    let upload_url = format!("{}/blob/obj_1", server.url());

    server
        .mock("POST", "/vault/v_1/upload")
        .with_status(200)
        .with_body(
            json!({ "objectId": "obj_1", "uploadUrl": upload_url, "expiresIn": 0 }).to_string(),
        )
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/blob/obj_1")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .upload_bytes("v_1", "a.txt", b"a".to_vec(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    put.assert_async().await;
}

#[tokio::test]
async fn test_file_round_trip() {
    let content = TRANSCRIPT.as_bytes().to_vec();
    let mut source = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    source.write_all(&content).unwrap();

    let mut server = Server::new_async().await;
    let upload_url = format!("{}/blob/obj_1", server.url());

    server
        .mock("POST", "/vault/v_1/upload")
        .match_body(Matcher::PartialJson(json!({ "contentType": "text/plain" })))
        .with_status(200)
        .with_body(slot_body(&upload_url, false))
        .create_async()
        .await;
    server
        .mock("PUT", "/blob/obj_1")
        .match_body(TRANSCRIPT)
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("GET", "/vault/v_1/objects/obj_1/download")
        .with_status(200)
        .with_header("content-type", "application/octet-stream")
        .with_body(content.clone())
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client
        .upload_file("v_1", source.path(), false)
        .await
        .unwrap();
    assert_eq!(outcome.size_bytes, content.len() as u64);

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("copies").join("transcript.txt");
    let written = client
        .save_object("v_1", &outcome.object_id, &target)
        .await
        .unwrap();

    assert_eq!(written, content.len() as u64);
    assert_eq!(std::fs::read(&target).unwrap(), content);
}

#[tokio::test]
async fn test_parent_dir_paths_rejected() {
    let server = Server::new_async().await;
    let client = client_for(&server);

    let err = client
        .upload_file("v_1", std::path::Path::new("../secrets.txt"), false)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_stalled_transfer_times_out_without_ingestion() {
    let mut server = Server::new_async().await;
    let storage = stalling_server(b"").await;
    let upload_url = format!("{}/blob/obj_1", storage);

    server
        .mock("POST", "/vault/v_1/upload")
        .with_status(200)
        .with_body(slot_body(&upload_url, true))
        .create_async()
        .await;
    let ingest = server
        .mock("POST", "/vault/v_1/ingest/obj_1")
        .expect(0)
        .create_async()
        .await;

    let mut config = ClientConfig::new(server.url());
    config.transfer_timeout_ms = 200;
    let client = ApiClient::new(&config, CredentialResolver::fixed(TEST_KEY)).unwrap();

    let err = client
        .upload_bytes("v_1", "exhibit-a.txt", TRANSCRIPT.as_bytes().to_vec(), true)
        .await
        .unwrap_err();

    match err {
        ClientError::Timeout { timeout_ms } => assert_eq!(timeout_ms, 200),
        other => panic!("expected Timeout, got {:?}", other),
    }
    ingest.assert_async().await;
}
