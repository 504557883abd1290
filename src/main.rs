use std::sync::Arc;

use bank_account::{api, config::Config, repository::JsonFileRepository, service::AccountService};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main] // using Tokio runtime for the HTTP server
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Set up the components
    let repository = JsonFileRepository::new(&config.store);
    let store = repository.path().display().to_string();
    let service = Arc::new(AccountService::new(repository));
    let app = api::router(service);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!(
        addr = %listener.local_addr()?,
        store = %store,
        "starting server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
