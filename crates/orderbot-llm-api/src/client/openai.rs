use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use orderbot_logging::{log_request, log_response};
use orderbot_types::Turn;

use crate::client::{ChatMessage, Completion, CompletionClient, TokenUsage};
use crate::error::{CompletionError, Result};

/// Client for OpenAI's chat-completions API and servers that speak the same
/// protocol (llama.cpp, vLLM, Groq).
pub struct OpenAiClient {
    api_key: Option<String>,
    model: String,
    api_url: String,
    require_api_key: bool,
    verbose: bool,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, model: String, api_url: String) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model,
            api_url,
            require_api_key: false,
            verbose: false,
            client: reqwest::Client::new(),
        }
    }

    /// Print every request and response to the console
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Fail with [`CompletionError::Auth`] instead of sending keyless requests
    pub fn with_required_api_key(mut self, required: bool) -> Self {
        self.require_api_key = required;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn build_request(&self, turns: &[Turn]) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.model,
            messages: turns.iter().map(ChatMessage::from).collect(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, turns: &[Turn]) -> Result<Completion> {
        if self.require_api_key && self.api_key.is_none() {
            return Err(CompletionError::Auth(
                "no API key configured (set OPENAI_API_KEY)".to_string(),
            ));
        }

        let request = self.build_request(turns);

        let request_json = serde_json::to_value(&request)
            .map_err(|e| CompletionError::Unknown(format!("failed to encode request: {}", e)))?;
        log_request(
            &self.api_url,
            &request_json,
            self.api_key.as_deref().unwrap_or(""),
            self.verbose,
        );

        let mut builder = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(&request_json);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await?;
        log_response(status, &body, self.verbose);

        if !status.is_success() {
            return Err(CompletionError::from_status(status, &body, retry_after));
        }

        parse_completion(&body)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Extract choice 0's message content from a chat-completions body
pub(crate) fn parse_completion(body: &str) -> Result<Completion> {
    let chat_response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let choice = chat_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::MalformedResponse("response has no choices".to_string()))?;

    let content = choice.message.content.ok_or_else(|| {
        CompletionError::MalformedResponse("first choice has no message content".to_string())
    })?;

    Ok(Completion {
        content,
        usage: chat_response.usage,
    })
}
