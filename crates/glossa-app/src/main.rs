use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glossa_config::Config;
use glossa_types::LookupRequest;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub mod batch;
pub mod state;
pub mod usage;

use self::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "glossa")]
#[command(about = "Look up words in the context of their sentence")]
#[command(version)]
struct Cli {
    /// User id attached to token usage records
    #[arg(long, global = true, env = "GLOSSA_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a single word and print the result as JSON
    Lookup {
        #[arg(short, long)]
        word: String,
        #[arg(short, long)]
        sentence: String,
        /// Language name ("German") or code ("de")
        #[arg(short, long)]
        language: String,
    },
    /// Read JSON lines of {word, sentence, language} from stdin
    Batch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::new();

    init_tracing(config.log_json);

    let state = Arc::new(AppState::new(config));

    match cli.command {
        Command::Lookup {
            word,
            sentence,
            language,
        } => {
            let request = LookupRequest {
                word,
                sentence,
                language,
            };
            let outcome = state.pipeline.lookup(&request).await;
            for record in &outcome.usage {
                state.usage.record(cli.user.as_deref(), record).await;
            }

            let json = serde_json::to_string_pretty(&outcome.result)
                .context("Failed to serialize result")?;
            println!("{json}");
        }
        Command::Batch => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let count = batch::run_batch(state, cli.user, stdin, tokio::io::stdout()).await?;
            tracing::info!(count, "Batch complete");
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only results
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
