// src/main.rs — kcopilot entry point

use clap::Parser;

use kcopilot::cli::{Cli, Commands, Context};
use kcopilot::infra::config::Config;
use kcopilot::infra::logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging (respects RUST_LOG). Stderr output would tear the
    // full-screen dashboard, so it is silent there unless asked for.
    let level = if matches!(cli.command, Some(Commands::Dashboard)) {
        "off"
    } else {
        "warn"
    };
    logger::init_logging(level);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load config (falls back to defaults if no config.toml)
    let config_path = Config::locate(cli.config.as_deref().map(std::path::Path::new));
    let config = Config::load(config_path.as_deref())?;

    let ctx = Context::new(config, config_path, cli.api_url.as_deref())?;
    tracing::debug!(api = %ctx.api_url, "backend");

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Login { username, password } => {
            kcopilot::cli::auth::run_login(&ctx, username, password).await
        }
        Commands::Register {
            username,
            email,
            password,
        } => kcopilot::cli::auth::run_register(&ctx, username, email, password).await,
        Commands::Logout => {
            kcopilot::cli::auth::run_logout(&ctx);
            Ok(())
        }
        Commands::Whoami => kcopilot::cli::auth::run_whoami(&ctx).await,
        Commands::Status => kcopilot::cli::status::show_status(&ctx).await,
        Commands::Docs { action } => kcopilot::cli::docs::run_docs(&ctx, action).await,
        Commands::Ask { question } => kcopilot::cli::ask::run_ask(&ctx, &question.join(" ")).await,
        Commands::Chat => kcopilot::cli::chat::run_chat(&ctx).await,
        Commands::Dashboard => kcopilot::tui::run_dashboard(&ctx).await,
    }
}
