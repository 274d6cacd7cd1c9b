use clap::Parser;
use tracing_subscriber::EnvFilter;

use catalog_api::{config::Config, server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();

    if let Err(err) = server::serve(config).await {
        tracing::error!(error = %err, "server exited with an error");
        std::process::exit(1);
    }
}
