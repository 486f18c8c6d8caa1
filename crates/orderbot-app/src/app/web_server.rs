use anyhow::{Context, Result};
use colored::Colorize;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::app::setup::AppConfig;
use crate::cli::Cli;
use crate::web::{SessionManager, WebServer, WebServerConfig};

/// Run the web server
pub async fn run_web_server(cli: &Cli, config: AppConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", cli.web_bind, cli.web_port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", cli.web_bind, cli.web_port))?;

    println!("{}", "🍕 Starting OrderBot web server...".bright_cyan().bold());
    println!("   Address: {}", addr);
    println!(
        "   Model: {} via {}",
        config.client_settings.model, config.client_settings.api_url
    );
    if let Some(log_dir) = &config.log_dir {
        println!("   Transcripts: {}", log_dir.display());
    }

    let session_manager = Arc::new(SessionManager::new(
        config.build_bot(),
        config.log_dir.clone(),
    ));

    let server = WebServer::new(
        WebServerConfig {
            bind_addr: addr,
            web_dir: cli.web_dir.clone(),
            session_idle_timeout: config.session_idle_timeout,
        },
        session_manager,
    );
    server.start().await
}
