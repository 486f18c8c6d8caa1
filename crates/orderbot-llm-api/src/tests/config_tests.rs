#[cfg(test)]
mod config_tests {
    use crate::config::{normalize_api_url, ClientFactory, ClientSettings, DEFAULT_MODEL, OPENAI_API_URL};

    fn settings(api_url: &str) -> ClientSettings {
        ClientSettings {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_url: api_url.to_string(),
            verbose: false,
        }
    }

    #[test]
    fn test_normalize_keeps_full_completions_url() {
        assert_eq!(normalize_api_url(OPENAI_API_URL), OPENAI_API_URL);
    }

    #[test]
    fn test_normalize_appends_path_to_bare_host() {
        assert_eq!(
            normalize_api_url("http://localhost:8080"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_normalize_handles_trailing_slash() {
        assert_eq!(
            normalize_api_url("http://localhost:8080/"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_normalize_extends_v1_base() {
        assert_eq!(
            normalize_api_url("https://api.groq.com/openai/v1"),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_openai_host_requires_key() {
        assert!(settings(OPENAI_API_URL).requires_api_key());
    }

    #[test]
    fn test_local_server_does_not_require_key() {
        assert!(!settings("http://localhost:8080").requires_api_key());
        assert!(!settings("not a url").requires_api_key());
    }

    #[test]
    fn test_factory_uses_configured_model() {
        let mut s = settings("http://localhost:8080");
        s.model = "llama-3.1-8b".to_string();

        let client = ClientFactory::create(&s);
        assert_eq!(client.model(), "llama-3.1-8b");
    }
}
