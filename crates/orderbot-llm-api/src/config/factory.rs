use std::sync::Arc;

use crate::client::{openai::OpenAiClient, CompletionClient};
use crate::config::{normalize_api_url, ClientSettings};

/// Client factory for creating completion clients
pub struct ClientFactory;

impl ClientFactory {
    /// Create a completion client from resolved settings
    ///
    /// The URL is normalized so a bare server address such as
    /// `http://localhost:8080` reaches its `/v1/chat/completions` route.
    pub fn create(settings: &ClientSettings) -> Arc<dyn CompletionClient> {
        let api_url = normalize_api_url(&settings.api_url);
        let client = OpenAiClient::new(settings.api_key.clone(), settings.model.clone(), api_url)
            .with_required_api_key(settings.requires_api_key())
            .with_verbose(settings.verbose);

        log::info!(
            "Completion client ready: model={} url={}",
            settings.model,
            client.api_url()
        );

        Arc::new(client)
    }
}
