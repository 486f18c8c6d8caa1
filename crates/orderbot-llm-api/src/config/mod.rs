use std::env;

pub mod factory;
pub use factory::ClientFactory;

/// Default OpenAI API URL
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Model the order bot was tuned against
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Environment variable holding the completion service key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Settings needed to build a completion client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub verbose: bool,
}

impl ClientSettings {
    /// OpenAI defaults with the key taken from `OPENAI_API_KEY`
    pub fn from_env() -> Self {
        Self {
            api_key: env::var(API_KEY_ENV).ok(),
            model: DEFAULT_MODEL.to_string(),
            api_url: OPENAI_API_URL.to_string(),
            verbose: false,
        }
    }

    /// The hosted OpenAI endpoint rejects keyless requests; local servers usually don't.
    pub fn requires_api_key(&self) -> bool {
        reqwest::Url::parse(&self.api_url)
            .ok()
            .and_then(|url| url.host_str().map(|h| h.ends_with("openai.com")))
            .unwrap_or(false)
    }
}

/// Normalize API URL by ensuring it has the correct path for OpenAI-compatible endpoints
pub fn normalize_api_url(url: &str) -> String {
    // If URL already contains a path with "completions", use it as-is
    if url.contains("/completions") {
        return url.to_string();
    }

    let base = url.trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{}/chat/completions", base)
    } else {
        // Append the standard OpenAI-compatible path
        format!("{}/v1/chat/completions", base)
    }
}
