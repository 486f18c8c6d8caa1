use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

/// CLI arguments for orderbot
#[derive(Parser, Debug)]
#[command(name = "orderbot")]
#[command(about = "OrderBot - pizza ordering assistant backed by a chat-completion model")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Serve the web chat UI (default when -i is not given)
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub web: bool,

    /// Web server port
    #[arg(long, default_value = "8080", env = "ORDERBOT_WEB_PORT")]
    pub web_port: u16,

    /// Web server bind address
    #[arg(long, default_value = "127.0.0.1", env = "ORDERBOT_WEB_BIND")]
    pub web_bind: String,

    /// Directory with extra static files, served under /static
    #[arg(long, value_name = "DIR")]
    pub web_dir: Option<PathBuf>,

    /// Chat in the terminal instead of serving the web UI
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub interactive: bool,

    /// Model name sent to the completion service (env: ORDERBOT_MODEL)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Completion service URL, e.g. http://localhost:8080 for llama.cpp
    /// (env: ORDERBOT_API_URL)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// TOML file with system_prompt, greeting and error_prefix
    /// (env: ORDERBOT_PROMPT_FILE)
    #[arg(long, value_name = "PATH")]
    pub prompt_file: Option<PathBuf>,

    /// Retry network and rate-limit failures this many times
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub max_retries: u32,

    /// Evict web sessions without clients after this many idle seconds
    #[arg(long, value_name = "SECS", default_value_t = 1800)]
    pub session_idle_timeout: u64,

    /// Write a JSONL transcript per session into this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Enable verbose debug output (shows completion requests and responses)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub generate: Option<Shell>,
}
