use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use orderbot_types::{Role, SessionId, Turn};

#[derive(Serialize)]
struct LogEntry<'a> {
    timestamp: String, // ISO‑8601 Local time
    session_id: String,
    role: Role,
    content: &'a str,
}

/// Append-only JSONL transcript of one session.
///
/// Write failures are reported through `log` and never surface to the caller,
/// so a full disk cannot break an exchange.
pub struct TranscriptLogger {
    session_id: SessionId,
    file_path: PathBuf,
    file: Option<tokio::fs::File>,
}

impl TranscriptLogger {
    /// Open `<log_dir>/orderbot-<session_id>.jsonl` for appending.
    pub async fn new(log_dir: &Path, session_id: SessionId) -> Result<Self> {
        fs::create_dir_all(log_dir)
            .await
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        let file_path = log_dir.join(format!("orderbot-{}.jsonl", session_id));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await
            .with_context(|| format!("Failed to open transcript {}", file_path.display()))?;

        Ok(Self {
            session_id,
            file_path,
            file: Some(file),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub async fn log_turn(&mut self, turn: &Turn) {
        self.log(turn.role(), turn.content()).await;
    }

    pub async fn log(&mut self, role: Role, content: &str) {
        let Some(file) = self.file.as_mut() else {
            return;
        };

        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            session_id: self.session_id.to_string(),
            role,
            content,
        };

        let mut line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                log::warn!("Failed to serialize transcript entry: {}", e);
                return;
            }
        };
        line.push('\n');

        if let Err(e) = file.write_all(line.as_bytes()).await {
            log::warn!(
                "Transcript logging disabled for {}: {}",
                self.file_path.display(),
                e
            );
            self.file = None;
            return;
        }
        // tokio's File reports a failed write on flush
        if let Err(e) = file.flush().await {
            log::warn!(
                "Transcript logging disabled for {}: {}",
                self.file_path.display(),
                e
            );
            self.file = None;
        }
    }
}
