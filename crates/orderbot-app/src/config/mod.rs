pub mod helpers;

pub use helpers::{env_var, resolve_setting};

/// Model override
pub const MODEL_ENV: &str = "ORDERBOT_MODEL";
/// Completion service URL override
pub const API_URL_ENV: &str = "ORDERBOT_API_URL";
/// Prompt TOML file
pub const PROMPT_FILE_ENV: &str = "ORDERBOT_PROMPT_FILE";
