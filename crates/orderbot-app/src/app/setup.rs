use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use orderbot_chat::{OrderBot, PromptConfig};
use orderbot_llm_api::{
    normalize_api_url, ClientFactory, ClientSettings, RetryPolicy, API_KEY_ENV, DEFAULT_MODEL,
    OPENAI_API_URL,
};

use crate::cli::Cli;
use crate::config::{env_var, resolve_setting, API_URL_ENV, MODEL_ENV, PROMPT_FILE_ENV};

/// Application configuration derived from CLI arguments and environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_settings: ClientSettings,
    pub prompt: PromptConfig,
    pub retry: RetryPolicy,
    pub log_dir: Option<PathBuf>,
    pub session_idle_timeout: Duration,
}

/// Set up application configuration from CLI arguments
pub fn setup_from_cli(cli: &Cli) -> Result<AppConfig> {
    let config = AppConfig::resolve(cli, env_var)?;

    if config.missing_api_key() {
        log::warn!(
            "{} is not set; requests to {} will fail with an authentication error",
            API_KEY_ENV,
            config.client_settings.api_url
        );
        eprintln!(
            "{} {} is not set. Every message will be answered with an authentication error.",
            "⚠️".yellow(),
            API_KEY_ENV
        );
    }

    Ok(config)
}

impl AppConfig {
    /// Precedence: CLI flags > ORDERBOT_* env > defaults
    pub fn resolve<F>(cli: &Cli, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model = resolve_setting(cli.model.as_deref(), MODEL_ENV, &lookup)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_url = resolve_setting(cli.api_url.as_deref(), API_URL_ENV, &lookup)
            .map(|url| normalize_api_url(&url))
            .unwrap_or_else(|| OPENAI_API_URL.to_string());

        let prompt_file = cli
            .prompt_file
            .clone()
            .or_else(|| lookup(PROMPT_FILE_ENV).map(PathBuf::from));
        let prompt = PromptConfig::load(prompt_file.as_deref())?;

        let client_settings = ClientSettings {
            api_key: lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()),
            model,
            api_url,
            verbose: cli.verbose,
        };

        Ok(Self {
            client_settings,
            prompt,
            retry: RetryPolicy::new(cli.max_retries),
            log_dir: cli.log_dir.clone(),
            session_idle_timeout: Duration::from_secs(cli.session_idle_timeout),
        })
    }

    pub fn missing_api_key(&self) -> bool {
        self.client_settings.api_key.is_none() && self.client_settings.requires_api_key()
    }

    pub fn build_bot(&self) -> Arc<OrderBot> {
        let client = ClientFactory::create(&self.client_settings);
        Arc::new(OrderBot::new(client, self.prompt.clone()).with_retry_policy(self.retry))
    }
}
