mod fixtures;

use fixtures::{CompletionMockServer, TEST_API_KEY, TEST_MODEL};
use orderbot_llm_api::{
    complete_with_retry, ClientFactory, ClientSettings, CompletionClient, CompletionError,
    OpenAiClient, RetryPolicy,
};
use orderbot_types::Conversation;
use pretty_assertions::assert_eq;
use std::time::Duration;

fn client_for(server: &CompletionMockServer) -> OpenAiClient {
    OpenAiClient::new(
        Some(TEST_API_KEY.to_string()),
        TEST_MODEL.to_string(),
        server.completions_url(),
    )
}

fn order_conversation() -> Conversation {
    let mut conversation = Conversation::new("คุณคือ OrderBot");
    conversation.push_user("ขอพิซซ่าชีสไซส์กลาง");
    conversation
}

#[tokio::test]
async fn test_success_returns_first_choice_content() {
    let server = CompletionMockServer::new().await;
    server.mock_success("รับทราบครับ เพิ่มอะไรอีกไหม?").await;

    let completion = client_for(&server)
        .complete(order_conversation().turns())
        .await
        .unwrap();

    assert_eq!(completion.content, "รับทราบครับ เพิ่มอะไรอีกไหม?");
    assert_eq!(completion.usage.map(|u| u.total_tokens), Some(30));
}

#[tokio::test]
async fn test_request_body_replays_conversation_in_order() {
    let server = CompletionMockServer::new().await;
    server.mock_success("ok").await;

    let mut conversation = order_conversation();
    conversation.push_assistant("ไซส์กลางนะครับ");
    conversation.push_user("เพิ่มเห็ด");

    client_for(&server)
        .complete(conversation.turns())
        .await
        .unwrap();

    let bodies = server.received_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        serde_json::json!({
            "model": TEST_MODEL,
            "messages": [
                {"role": "system", "content": "คุณคือ OrderBot"},
                {"role": "user", "content": "ขอพิซซ่าชีสไซส์กลาง"},
                {"role": "assistant", "content": "ไซส์กลางนะครับ"},
                {"role": "user", "content": "เพิ่มเห็ด"},
            ]
        })
    );
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let server = CompletionMockServer::new().await;
    server
        .mock_error(401, "invalid_request_error", "Incorrect API key provided")
        .await;

    let err = client_for(&server)
        .complete(order_conversation().turns())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CompletionError::Auth("Incorrect API key provided".to_string())
    );
}

#[tokio::test]
async fn test_rate_limit_maps_to_rate_limited_with_retry_after() {
    let server = CompletionMockServer::new().await;
    server.mock_rate_limit(12).await;

    let err = client_for(&server)
        .complete(order_conversation().turns())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CompletionError::RateLimited {
            message: "Rate limit reached for requests".to_string(),
            retry_after: Some(12),
        }
    );
}

#[tokio::test]
async fn test_server_error_maps_to_unknown() {
    let server = CompletionMockServer::new().await;
    server.mock_error(500, "server_error", "The server had an error").await;

    let err = client_for(&server)
        .complete(order_conversation().turns())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CompletionError::Unknown("HTTP 500: The server had an error".to_string())
    );
}

#[tokio::test]
async fn test_garbage_body_maps_to_malformed_response() {
    let server = CompletionMockServer::new().await;
    server.mock_raw_body("not json at all").await;

    let err = client_for(&server)
        .complete(order_conversation().turns())
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_unreachable_server_maps_to_network_error() {
    // Reserve a free port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let url = format!("http://127.0.0.1:{}/v1/chat/completions", port);

    let client = OpenAiClient::new(None, TEST_MODEL.to_string(), url);
    let err = client
        .complete(order_conversation().turns())
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::Network(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_factory_normalizes_bare_server_url() {
    let server = CompletionMockServer::new().await;
    server.mock_success("hello from the factory").await;

    let client = ClientFactory::create(&ClientSettings {
        api_key: Some(TEST_API_KEY.to_string()),
        model: TEST_MODEL.to_string(),
        api_url: server.uri(),
        verbose: false,
    });

    let completion = client.complete(order_conversation().turns()).await.unwrap();
    assert_eq!(completion.content, "hello from the factory");
}

#[tokio::test]
async fn test_retry_policy_does_not_retry_auth_failures() {
    let server = CompletionMockServer::new().await;
    server.mock_error(403, "permission_error", "Forbidden model").await;

    let client = client_for(&server);
    let policy = RetryPolicy::new(3).with_base_delay(Duration::from_millis(1));
    let err = complete_with_retry(&client, order_conversation().turns(), &policy)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "auth");
    assert_eq!(server.received_bodies().await.len(), 1);
}
