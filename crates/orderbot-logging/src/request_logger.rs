use colored::Colorize;

use crate::safe_truncate;

const MAX_BODY_CHARS: usize = 5000;

/// Keep the first characters of an API key and mask the rest
pub fn redact_api_key(api_key: &str) -> String {
    if api_key.is_empty() {
        return "(none)".to_string();
    }
    format!("{}***", api_key.chars().take(6).collect::<String>())
}

/// Log a completion request for debugging (console output)
pub fn log_request(url: &str, request: &serde_json::Value, api_key: &str, verbose: bool) {
    log::debug!("POST {} ({} bytes)", url, request.to_string().len());

    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 COMPLETION REQUEST".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());

    // Parse URL to show host and port
    if let Ok(parsed_url) = reqwest::Url::parse(url) {
        println!("{}: {}", "URL".bright_yellow(), url);
        println!("{}: {}", "Host".bright_yellow(), parsed_url.host_str().unwrap_or("unknown"));
        println!(
            "{}: {}",
            "Port".bright_yellow(),
            parsed_url
                .port_or_known_default()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
    } else {
        println!("{}: {}", "URL".bright_yellow(), url);
    }

    println!("\n{}", "Headers:".bright_yellow());
    println!("  Content-Type: application/json");
    println!("  Authorization: Bearer {}", redact_api_key(api_key));

    println!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(request) {
        Ok(json) => print_truncated(&json),
        Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// Log a completion response for debugging (console output)
pub fn log_response(status: reqwest::StatusCode, body: &str, verbose: bool) {
    log::debug!("completion response: {} ({} bytes)", status, body.len());

    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_green());
    println!("{}", "📥 COMPLETION RESPONSE".bright_green().bold());
    println!("{}", "═".repeat(80).bright_green());

    println!(
        "{}: {} {}",
        "Status".bright_yellow(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    println!("\n{}", "Response Body:".bright_yellow());
    // Try to pretty-print JSON, fall back to raw text
    let pretty = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok());
    print_truncated(pretty.as_deref().unwrap_or(body));

    println!("{}", "═".repeat(80).bright_green());
    println!();
}

fn print_truncated(text: &str) {
    if text.chars().count() > MAX_BODY_CHARS {
        println!("{}", safe_truncate(text, MAX_BODY_CHARS));
        println!(
            "\n{}",
            format!("... (truncated, total {} bytes)", text.len()).bright_black()
        );
    } else {
        println!("{}", text);
    }
}
