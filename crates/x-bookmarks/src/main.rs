//! X Bookmarks login service - Entry Point

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use x_bookmarks::{AuthServer, config::Config, server::transport::DEFAULT_MAX_CONCURRENT_REQUESTS};

#[derive(Parser, Debug)]
#[command(name = "x-bookmarks")]
#[command(about = "OAuth 2.0 + PKCE login service for the X bookmarks API")]
#[command(version)]
struct Cli {
    /// HTTP server port
    #[arg(long, default_value = "8080", env = "PORT")]
    port: u16,

    /// Running in production (marks the session cookie Secure)
    #[arg(long)]
    production: bool,

    /// Maximum number of requests handled at once
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT_REQUESTS, env = "MAX_CONCURRENT_REQUESTS")]
    max_concurrent_requests: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the variables may come from the environment
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        production = cli.production,
        "Starting X bookmarks login service"
    );

    let mut config = Config::from_env()?;
    config.secure_cookies = cli.production;
    tracing::debug!(?config, "Loaded configuration");

    let server = AuthServer::new(config)?.with_max_concurrent_requests(cli.max_concurrent_requests);
    server.run_http(cli.port).await?;

    Ok(())
}
