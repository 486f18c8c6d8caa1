use anyhow::Result;
use clap::{CommandFactory, Parser};

use orderbot::app::{run_repl_mode, run_web_server, setup_from_cli};
use orderbot::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Shell completions
    if let Some(shell) = cli.generate {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let app_config = setup_from_cli(&cli)?;

    if cli.interactive && !cli.web {
        return run_repl_mode(app_config).await;
    }

    run_web_server(&cli, app_config).await
}
