use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use uuid::Uuid;

use orderbot_chat::{ChatChannel, ChatSession};
use orderbot_logging::TranscriptLogger;

use crate::app::setup::AppConfig;

/// Prints bot output to the terminal
pub struct TerminalChannel;

#[async_trait]
impl ChatChannel for TerminalChannel {
    async fn send_text(&self, text: &str) {
        println!("\n{} {}\n", "OrderBot:".bright_blue().bold(), text);
    }

    async fn send_error(&self, text: &str) {
        println!("\n{} {}\n", "❌".bright_red(), text.red());
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ReplInput<'a> {
    Empty,
    Exit,
    Restart,
    Message(&'a str),
}

fn classify(line: &str) -> ReplInput<'_> {
    let line = line.trim();
    match line {
        "" => ReplInput::Empty,
        "exit" | "quit" => ReplInput::Exit,
        "/restart" => ReplInput::Restart,
        _ => ReplInput::Message(line),
    }
}

/// Run interactive REPL mode: one session for the lifetime of the process
pub async fn run_repl_mode(config: AppConfig) -> Result<()> {
    println!("{}", "🍕 OrderBot - pizza ordering assistant".bright_cyan().bold());
    println!(
        "{}",
        format!(
            "Model: {} • Endpoint: {}",
            config.client_settings.model, config.client_settings.api_url
        )
        .bright_black()
    );
    println!(
        "{}",
        "Type 'exit' or 'quit' to exit, or '/restart' to start a new order\n".bright_black()
    );

    let bot = config.build_bot();
    let channel = TerminalChannel;
    let session_id = Uuid::new_v4();

    let mut session = ChatSession::new(session_id, &bot);
    if let Some(log_dir) = &config.log_dir {
        match TranscriptLogger::new(log_dir, session_id).await {
            Ok(transcript) => {
                println!(
                    "{}",
                    format!("Transcript: {}", transcript.file_path().display()).bright_black()
                );
                session = session.with_transcript(transcript);
            }
            Err(e) => eprintln!("{} Logging disabled: {:#}", "⚠️".yellow(), e),
        }
    }

    session.start(&bot, &channel).await;

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(&format!("{} ", "You:".bright_green().bold()));

        match readline {
            Ok(line) => match classify(&line) {
                ReplInput::Empty => continue,
                ReplInput::Exit => {
                    println!("{}", "Goodbye!".bright_cyan());
                    break;
                }
                ReplInput::Restart => {
                    println!("{}", "Starting a new order...".bright_black());
                    session.start(&bot, &channel).await;
                }
                ReplInput::Message(text) => {
                    rl.add_history_entry(text)?;
                    session.handle(&bot, text, &channel).await;
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".bright_black());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".bright_red().bold(), err);
                break;
            }
        }
    }

    if session.total_tokens_used() > 0 {
        log::info!(
            "Session {} used {} tokens",
            session.id(),
            session.total_tokens_used()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_commands() {
        assert_eq!(classify("   "), ReplInput::Empty);
        assert_eq!(classify("exit"), ReplInput::Exit);
        assert_eq!(classify(" quit \n"), ReplInput::Exit);
        assert_eq!(classify("/restart"), ReplInput::Restart);
    }

    #[test]
    fn test_classify_trims_messages() {
        assert_eq!(
            classify("  ขอพิซซ่าชีสไซส์กลาง  "),
            ReplInput::Message("ขอพิซซ่าชีสไซส์กลาง")
        );
        // Only exact commands are intercepted
        assert_eq!(classify("exit please"), ReplInput::Message("exit please"));
    }
}
