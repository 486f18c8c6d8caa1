use serde_json::json;
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gpt-3.5-turbo";

/// Mock completion server for exercising the HTTP client
pub struct CompletionMockServer {
    server: MockServer,
}

impl CompletionMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.server.uri())
    }

    /// Mock a successful chat completion
    pub async fn mock_success(&self, response_content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-test123",
                "object": "chat.completion",
                "created": 1700000000,
                "model": TEST_MODEL,
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": response_content
                    },
                    "finish_reason": "stop"
                }],
                "usage": {
                    "prompt_tokens": 10,
                    "completion_tokens": 20,
                    "total_tokens": 30
                }
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock an error status with an OpenAI-style error body
    pub async fn mock_error(&self, status: u16, error_type: &str, message: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {
                    "message": message,
                    "type": error_type,
                    "param": null,
                    "code": null
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a 429 carrying a Retry-After header
    pub async fn mock_rate_limit(&self, retry_after_secs: u64) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({
                        "error": {
                            "message": "Rate limit reached for requests",
                            "type": "requests"
                        }
                    }))
                    .insert_header("Retry-After", retry_after_secs.to_string().as_str()),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a 200 whose body is not a completion
    pub async fn mock_raw_body(&self, body: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Requests received so far, decoded as JSON
    pub async fn received_bodies(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}
