//! polls CLI - run the polls server and manage questions
//!
//! - `serve`: HTTP server (PostgreSQL, or `--in-memory`)
//! - `question add`: create a question with choices
//! - `seed`: insert the sample question

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polls_server::PollsConfig;

mod commands;
mod env;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "polls",
    author,
    version,
    about = "Publish questions, collect votes, show results"
)]
struct Cli {
    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    /// Config file (default: ~/.polls/config.toml)
    #[arg(long, global = true, env = "POLLS_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database URL (overrides config file)
    #[arg(long, global = true, env = "DATABASE_URL", value_name = "URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Manage questions
    Question(commands::question::QuestionArgs),
    /// Insert the sample "What's new?" question
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so clap's env fallbacks see .env values
    let env_files = env::load_dotenv();
    let cli = Cli::parse();

    if let Err(err) = tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    }) {
        eprintln!("polls: logging disabled: {:#}", err);
    }

    for path in &env_files {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let mut config =
        PollsConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = cli.database_url {
        config.database_url = Some(url);
    }

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await,
        Commands::Question(args) => commands::run_question(args, config).await,
        Commands::Seed => commands::run_seed(config).await,
    };

    tracing_setup::shutdown();
    result
}
