use anyhow::{Context, Result};
use chat_widget::app::App;
use chat_widget::backend::HttpBackend;
use chat_widget::config::Config;
use chat_widget::{commands, logging};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "chat-widget")]
#[command(version)]
#[command(about = "Terminal chat widget for a simple message backend", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config and CHAT_WIDGET_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Config file (defaults to ~/.chat-widget/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message and print the result
    Send { message: String },
    /// Print the message list
    Messages,
    /// Write a default config file
    InitConfig,
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(Commands::InitConfig) = cli.command {
        let path = match cli.config {
            Some(path) => path,
            None => Config::default_path().context("Could not find home directory")?,
        };
        commands::init_config(&path)?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.server.base_url = url;
    }

    match cli.command {
        None => {
            let log_path = logging::init_file(&config)?;
            tracing::info!(
                url = %config.server.base_url,
                log = %log_path.display(),
                "starting chat widget"
            );

            let backend = HttpBackend::new(&config.server)
                .with_context(|| format!("Invalid backend URL '{}'", config.server.base_url))?;
            App::new(&config, Arc::new(backend)).run().await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Send { message }) => {
            logging::init_stderr(&config)?;
            Ok(exit_code(commands::send_message(&config, &message).await?))
        }
        Some(Commands::Messages) => {
            logging::init_stderr(&config)?;
            Ok(exit_code(commands::list_messages(&config).await?))
        }
        Some(Commands::InitConfig) => unreachable!("handled before loading config"),
    }
}
