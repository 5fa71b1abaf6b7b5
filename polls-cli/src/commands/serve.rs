//! HTTP server command
//!
//! Runs the polls server against PostgreSQL, or against an in-memory store
//! with one sample question when `--in-memory` is given.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use polls_server::polls::seed_sample;
use polls_server::{run_server, AppState, MemoryStore, PollStore, PollsConfig};

use super::connect;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3030)
    #[arg(long, short = 'b', env = "POLLS_BIND")]
    pub bind: Option<SocketAddr>,

    /// Keep questions in memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    pub in_memory: bool,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl ServeArgs {
    /// Flags win over the config file and environment
    fn apply(&self, config: &mut PollsConfig) {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if self.cors_permissive {
            config.cors_permissive = true;
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = secs;
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: PollsConfig) -> Result<()> {
    args.apply(&mut config);

    let store: Arc<dyn PollStore> = if args.in_memory {
        let store = MemoryStore::new();
        let seeded = seed_sample(&store, Utc::now())
            .await
            .context("Failed to seed in-memory store")?;
        tracing::info!(question_id = seeded.question.id, "using in-memory store");
        Arc::new(store)
    } else {
        Arc::new(connect(&config).await?)
    };

    tracing::info!("Starting polls server on {}", config.bind);

    // Blocks until shutdown
    run_server(AppState::new(store), config.server_config())
        .await
        .context("Server error")?;

    Ok(())
}
