// Logging module - request debugging and session transcripts
pub mod request_logger;
pub mod transcript_logger;

pub use request_logger::{log_request, log_response, redact_api_key};
pub use transcript_logger::TranscriptLogger;

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}
