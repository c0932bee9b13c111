#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

use std::{sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use prassign_server::{ServerConfig, run_server, state::AppState};
use prassign_storage::{MemoryStorage, PostgresStorage};

#[derive(Debug, Parser)]
#[command(name = "prassign-server", about = "Assigns pull request reviewers from the author's team")]
struct Args {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_DSN")]
    database_dsn: Option<String>,

    #[arg(long, env = "CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    connect_timeout_secs: u64,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Keep all data in process memory instead of PostgreSQL
    #[arg(long, env = "IN_MEMORY")]
    in_memory: bool,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = ServerConfig::new(args.host, args.port)
        .with_connect_timeout(Duration::from_secs(args.connect_timeout_secs));

    if args.in_memory {
        log::warn!("Running with in-memory storage; data is lost on exit");
        run_server(config, AppState::from_storage(Arc::new(MemoryStorage::new()))).await?;
        return Ok(());
    }

    let dsn = args
        .database_dsn
        .filter(|dsn| !dsn.trim().is_empty())
        .context("DATABASE_DSN is required unless --in-memory is set")?;

    let storage = Arc::new(
        PostgresStorage::connect(&dsn, config.connect_timeout)
            .await
            .context("failed to connect to postgres")?,
    );
    storage
        .migrate()
        .await
        .context("failed to create database schema")?;

    let result = run_server(config, AppState::from_storage(storage.clone())).await;
    storage.close().await;

    result.context("server stopped with an error")
}
