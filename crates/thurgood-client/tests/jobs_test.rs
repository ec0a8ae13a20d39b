mod helpers;

use helpers::client_for;
use mockito::{Matcher, Server};
use serde_json::json;
use thurgood_client::{ClientError, Ocr, OcrDownload, OcrFormat, Transcription};
use thurgood_core::models::{
    Job, JobPhase, OcrRequest, OcrStatus, Transcript, TranscriptionRequest, TranscriptionSource,
    TranscriptionStatus,
};

#[tokio::test]
async fn test_submit_ocr_returns_initial_job() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/ocr/v1/process")
        .match_body(Matcher::Json(json!({ "document_url": "https://files.example/brief.pdf" })))
        .with_status(200)
        .with_body(r#"{"id": "ocr_1", "status": "pending"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let job = client
        .submit_ocr(&OcrRequest {
            document_url: "https://files.example/brief.pdf".to_string(),
            engine: None,
            features: None,
        })
        .await
        .unwrap();

    assert_eq!(job.id(), "ocr_1");
    assert_eq!(job.status(), OcrStatus::Pending);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_status_polls_are_idempotent_reads() {
    let mut server = Server::new_async().await;
    let status = server
        .mock("GET", "/ocr/v1/ocr_1")
        .with_status(200)
        .with_body(r#"{"id": "ocr_1", "status": "processing", "progress": 40}"#)
        .expect(2)
        .create_async()
        .await;
    let resubmit = server
        .mock("POST", "/ocr/v1/process")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let first = client.ocr_status("ocr_1").await.unwrap();
    let second = client.poll_job::<Ocr>("ocr_1").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.phase(), JobPhase::Running);
    status.assert_async().await;
    resubmit.assert_async().await;
}

#[tokio::test]
async fn test_ocr_pdf_without_target_fails_before_network() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/ocr/v1/ocr_1/download/pdf")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .download_ocr("ocr_1", OcrFormat::Pdf, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_ocr_downloads_inline_and_saved() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/ocr/v1/ocr_1/download/text")
        .with_status(200)
        .with_body("IN THE SUPREME COURT")
        .create_async()
        .await;
    server
        .mock("GET", "/ocr/v1/ocr_1/download/json")
        .with_status(200)
        .with_body(r#"{"pages": [{"number": 1}]}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/ocr/v1/ocr_1/download/pdf")
        .with_status(200)
        .with_body("%PDF-searchable")
        .create_async()
        .await;

    let client = client_for(&server);

    let text = client
        .download_ocr("ocr_1", OcrFormat::Text, None)
        .await
        .unwrap();
    assert!(matches!(text, OcrDownload::Text { ref text } if text == "IN THE SUPREME COURT"));

    let document = client
        .download_ocr("ocr_1", OcrFormat::Json, None)
        .await
        .unwrap();
    match document {
        OcrDownload::Json { document } => assert_eq!(document["pages"][0]["number"], 1),
        other => panic!("expected Json download, got {:?}", other),
    }

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("brief.pdf");
    let saved = client
        .download_ocr("ocr_1", OcrFormat::Pdf, Some(&target))
        .await
        .unwrap();
    assert!(matches!(saved, OcrDownload::Saved { size_bytes: 15, .. }));
    assert_eq!(std::fs::read(&target).unwrap(), b"%PDF-searchable");

    let json_target = dir.path().join("brief.json");
    client
        .download_ocr("ocr_1", OcrFormat::Json, Some(&json_target))
        .await
        .unwrap();
    assert_eq!(
        std::fs::read_to_string(&json_target).unwrap(),
        r#"{"pages": [{"number": 1}]}"#
    );
}

#[tokio::test]
async fn test_transcription_from_vault_and_status() {
    let mut server = Server::new_async().await;
    let submit = server
        .mock("POST", "/voice/transcription")
        .match_body(Matcher::Json(json!({
            "vault_id": "v_1",
            "object_id": "obj_9",
            "speaker_labels": true
        })))
        .with_status(200)
        .with_body(r#"{"id": "tr_1", "status": "queued"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/voice/transcription/tr_1")
        .with_status(200)
        .with_body(
            json!({
                "id": "tr_1",
                "status": "completed",
                "utterances": [
                    {"text": "State your name.", "start": 0, "end": 1200, "speaker": "A"},
                    {"text": "Jane Roe.", "start": 1300, "end": 2000, "speaker": "B"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let source =
        TranscriptionSource::from_parts(Some("v_1".into()), Some("obj_9".into()), None).unwrap();
    let mut request = TranscriptionRequest::new(source);
    request.speaker_labels = true;

    let job = client.submit_transcription(&request).await.unwrap();
    assert_eq!(job.status(), TranscriptionStatus::Queued);

    let done = client.poll_job::<Transcription>("tr_1").await.unwrap();
    assert!(done.phase().is_terminal());
    assert!(matches!(done.transcript(), Transcript::Diarized(u) if u.len() == 2));
    submit.assert_async().await;
}

#[tokio::test]
async fn test_failed_transcription_is_reported_not_raised() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/voice/transcription/tr_2")
        .with_status(200)
        .with_body(r#"{"id": "tr_2", "status": "error", "error": "unsupported codec"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let job = client.transcription_status("tr_2").await.unwrap();

    assert_eq!(job.phase(), JobPhase::Failed);
    assert_eq!(job.error.as_deref(), Some("unsupported codec"));
}
