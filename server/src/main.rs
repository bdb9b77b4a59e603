mod config;
mod http;
mod persistence;
mod service;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use http::{Router, Server};
use persistence::sqlite::Database;
use service::Services;

/// REST service for the library and league domains.
#[derive(Parser)]
#[command(name = "clubhouse-server", about = "Library and league CRUD service")]
struct Cli {
    /// Address to listen on. Overrides `CLUBHOUSE_ADDR`.
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// SQLite database file. Overrides `CLUBHOUSE_DB_PATH`.
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing();

    tracing::info!("Starting clubhouse server");

    let db_path = cli.db.unwrap_or_else(config::get_db_path);
    let addr = cli.addr.unwrap_or_else(config::get_addr);
    let timeout = Duration::from_millis(config::get_request_timeout_ms());

    tracing::info!("Using database: {}", db_path.display());
    let db = Database::open(&db_path, config::get_max_connections()).await?;

    let router = Router::new(Services::new(&db), timeout)?;
    let server = Server::bind(addr, router).await?;

    server
        .serve_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    db.pool().close().await;
    tracing::info!("Server stopped");
    Ok(())
}

/// Stdout logging with span durations, or a daily rolling file when
/// `CLUBHOUSE_LOG_DIR` is set. The returned guard flushes the file writer.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match config::get_log_dir() {
        Some(log_dir) => {
            let file_appender = tracing_appender::rolling::daily(log_dir, "clubhouse-server");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_span_events(FmtSpan::CLOSE)
                .init();
            None
        }
    }
}
