use article::DEFAULT_LANGUAGE;
use clap::{Parser, Subcommand};
use config::ModelConfig;
use telegram::TelegramBot;

mod config;
mod console;
mod http;
mod logging;
mod telegram;
mod utilities;

/// German noun articles, translations and case examples.
#[derive(Debug, Parser)]
#[command(name = "article-bot", version)]
struct Cli {
    #[command(flatten)]
    model: ModelConfig,

    /// Emit logs as JSON lines.
    #[arg(long, env = "LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up a word and print the JSON answer. Without a word, start an interactive prompt.
    Ask {
        word: Option<String>,
        #[arg(default_value = DEFAULT_LANGUAGE)]
        language: String,
    },
    /// Serve the HTTP API, plus the Telegram webhook when a token is set.
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
        telegram_token: Option<String>,
    },
    /// Run the Telegram bot with long polling.
    Poll {
        #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
        telegram_token: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_json);

    let service = cli.model.service();
    match cli.command {
        Command::Ask {
            word: Some(word),
            language,
        } => {
            let output = console::process_request(&service, &word, &language).await?;
            println!("{output}");
        }
        Command::Ask { word: None, .. } => {
            console::interactive(&service).await?;
        }
        Command::Serve {
            bind,
            telegram_token,
        } => {
            http::serve(&bind, service, telegram_token).await?;
        }
        Command::Poll { telegram_token } => {
            TelegramBot::new(telegram_token, service).poll().await?;
        }
    }
    Ok(())
}
