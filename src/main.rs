use std::time::Duration;

use clap::Parser;
use noteearly::{
    db::{Db, PoolSettings},
    names,
    services::progress::ProgressOptions,
    AppState,
};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// PostgreSQL connection string.
    #[arg(long, env)]
    database_url: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = names::DEFAULT_ADDRESS)]
    address: String,

    /// Upper bound on pooled database connections.
    #[arg(long, env, default_value_t = 10)]
    max_connections: u32,

    /// Seconds to wait for a free pooled connection.
    #[arg(long, env, default_value_t = 5)]
    acquire_timeout_secs: u64,

    /// Only accept the paragraph right after the highest one reached.
    #[arg(long, env)]
    strict_sequencing: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| names::DEFAULT_LOG_FILTER.to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let db = Db::new(
        &args.database_url,
        PoolSettings {
            max_connections: args.max_connections,
            acquire_timeout: Duration::from_secs(args.acquire_timeout_secs),
        },
    )
    .await?;

    let options = ProgressOptions {
        strict_sequencing: args.strict_sequencing,
    };
    let app = noteearly::router(AppState::new(db, options));

    let address = args.address.parse::<std::net::SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!(
        %address,
        strict_sequencing = options.strict_sequencing,
        "noteearly v{} listening",
        noteearly::utils::VERSION
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
