//! Transcription integration tests against a mock HTTP service

use voxnotes::application::ports::{Transcriber, TranscriptionError};
use voxnotes::domain::notes::{AudioClip, AudioMimeType};
use voxnotes::infrastructure::transcription::HttpTranscriber;

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn clip() -> AudioClip {
    AudioClip::new(vec![1, 2, 3, 4], AudioMimeType::Wav)
}

async fn server_with(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcribe"))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

fn transcriber(server: &MockServer) -> HttpTranscriber {
    HttpTranscriber::new(format!("{}/transcribe", server.uri()), "test-key")
}

#[tokio::test]
async fn transcribes_audio_with_auth_and_base64_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcribe"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "audio": "AQIDBA==",
            "mime_type": "audio/wav",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "hello world"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let text = transcriber(&server).transcribe(&clip()).await.unwrap();
    assert_eq!(text, "hello world");
}

#[tokio::test]
async fn trims_surrounding_whitespace() {
    let server = server_with(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "  padded \n"})),
    )
    .await;

    let text = transcriber(&server).transcribe(&clip()).await.unwrap();
    assert_eq!(text, "padded");
}

#[tokio::test]
async fn unauthorized_maps_to_invalid_api_key() {
    let server = server_with(ResponseTemplate::new(401)).await;

    let err = transcriber(&server).transcribe(&clip()).await.unwrap_err();
    assert!(matches!(err, TranscriptionError::InvalidApiKey));
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let server = server_with(ResponseTemplate::new(429)).await;

    let err = transcriber(&server).transcribe(&clip()).await.unwrap_err();
    assert!(matches!(err, TranscriptionError::RateLimited));
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let server = server_with(ResponseTemplate::new(500).set_body_string("boom")).await;

    let err = transcriber(&server).transcribe(&clip()).await.unwrap_err();
    match err {
        TranscriptionError::ApiError(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("boom"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn error_body_maps_to_api_error() {
    let server = server_with(ResponseTemplate::new(200).set_body_json(
        serde_json::json!({"error": {"message": "unsupported audio"}}),
    ))
    .await;

    let err = transcriber(&server).transcribe(&clip()).await.unwrap_err();
    match err {
        TranscriptionError::ApiError(message) => assert_eq!(message, "unsupported audio"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn empty_text_maps_to_empty_response() {
    let server = server_with(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "   "})),
    )
    .await;

    let err = transcriber(&server).transcribe(&clip()).await.unwrap_err();
    assert!(matches!(err, TranscriptionError::EmptyResponse));
}

#[tokio::test]
async fn missing_text_maps_to_empty_response() {
    let server =
        server_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({}))).await;

    let err = transcriber(&server).transcribe(&clip()).await.unwrap_err();
    assert!(matches!(err, TranscriptionError::EmptyResponse));
}

#[tokio::test]
async fn malformed_body_maps_to_parse_error() {
    let server = server_with(ResponseTemplate::new(200).set_body_string("not json")).await;

    let err = transcriber(&server).transcribe(&clip()).await.unwrap_err();
    assert!(matches!(err, TranscriptionError::ParseError(_)));
}

#[tokio::test]
async fn unreachable_service_maps_to_request_failed() {
    let transcriber = HttpTranscriber::new("http://127.0.0.1:1/transcribe", "test-key");

    let err = transcriber.transcribe(&clip()).await.unwrap_err();
    assert!(matches!(err, TranscriptionError::RequestFailed(_)));
}
