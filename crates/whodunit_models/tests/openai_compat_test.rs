//! HTTP-level tests for the OpenAI-compatible client.

use serde_json::json;
use whodunit_core::GenerateRequest;
use whodunit_error::{ModelsErrorKind, WhodunitErrorKind};
use whodunit_interface::CompletionDriver;
use whodunit_models::OpenAICompatibleClient;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAICompatibleClient {
    OpenAICompatibleClient::new(
        "test-key".to_string(),
        "mystery-model".to_string(),
        format!("{}/v1/chat/completions", server.uri()),
    )
}

#[tokio::test]
async fn test_generate_posts_chat_body_and_reads_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "mystery-model",
            "messages": [
                {"role": "system", "content": "You write mysteries."},
                {"role": "user", "content": "Name the victim."}
            ],
            "temperature": 0.5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Lady Ashcombe."}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerateRequest::prompt("You write mysteries.", "Name the victim.")
        .with_sampling(Some(0.5), None);
    let response = client_for(&server).generate(&request).await.unwrap();

    assert_eq!(response.text(), "Lady Ashcombe.");
    assert_eq!(*response.usage().unwrap().total_tokens(), 15);
}

#[tokio::test]
async fn test_non_success_status_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate(&GenerateRequest::prompt("s", "u"))
        .await
        .unwrap_err();

    match err.kind() {
        WhodunitErrorKind::Models(e) => assert_eq!(
            e.kind,
            ModelsErrorKind::Api {
                status: 429,
                message: "rate limited".to_string()
            }
        ),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_empty_choices_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate(&GenerateRequest::prompt("s", "u"))
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        WhodunitErrorKind::Models(e) if matches!(e.kind, ModelsErrorKind::ResponseParsing(_))
    ));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_an_http_error() {
    let client = OpenAICompatibleClient::new(
        "k".to_string(),
        "m".to_string(),
        "http://127.0.0.1:1/v1/chat/completions".to_string(),
    );
    let err = client
        .generate(&GenerateRequest::prompt("s", "u"))
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), WhodunitErrorKind::Http(_)));
}
