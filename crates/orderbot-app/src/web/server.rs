use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::web::{routes, session_manager::SessionManager};

/// Longest pause between idle-session sweeps
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Web server configuration
pub struct WebServerConfig {
    pub bind_addr: SocketAddr,
    pub web_dir: Option<PathBuf>,
    pub session_idle_timeout: Duration,
}

/// Web server instance
pub struct WebServer {
    config: WebServerConfig,
    session_manager: Arc<SessionManager>,
}

impl WebServer {
    pub fn new(config: WebServerConfig, session_manager: Arc<SessionManager>) -> Self {
        Self {
            config,
            session_manager,
        }
    }

    pub fn router(&self) -> axum::Router {
        let app_state = routes::AppState {
            session_manager: self.session_manager.clone(),
        };

        let mut app = routes::create_router(app_state);

        // Add CORS layer for development
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);

        if let Some(web_dir) = &self.config.web_dir {
            if web_dir.exists() {
                log::info!("Serving static files from: {}", web_dir.display());
                app = app.nest_service("/static", ServeDir::new(web_dir));
            } else {
                log::warn!("Static directory {} does not exist", web_dir.display());
            }
        }

        app
    }

    /// Start the web server
    pub async fn start(self) -> Result<()> {
        let app = self.router();
        let sweeper = spawn_idle_sweeper(
            self.session_manager.clone(),
            self.config.session_idle_timeout,
        );

        println!("🌐 Web server starting on http://{}", self.config.bind_addr);
        println!("   WebSocket endpoint: ws://{}/ws", self.config.bind_addr);
        println!("   API endpoints: http://{}/api/sessions", self.config.bind_addr);

        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.config.bind_addr))?;
        let result = axum::serve(listener, app).await;
        sweeper.abort();
        result.context("Web server failed")?;

        Ok(())
    }
}

fn sweep_interval(idle_timeout: Duration) -> Duration {
    (idle_timeout / 2).clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL)
}

/// Periodically evict sessions nobody is attached to
pub fn spawn_idle_sweeper(
    session_manager: Arc<SessionManager>,
    idle_timeout: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval(idle_timeout));
        loop {
            ticker.tick().await;
            let removed = session_manager.cleanup_inactive(idle_timeout).await;
            if removed > 0 {
                log::info!("Evicted {} idle session(s)", removed);
            }
        }
    })
}
