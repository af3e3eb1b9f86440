//! # Steelworks API
//!
//! Backend for the RN All Steel website.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - SMTP relay and Google Places client
//! - HTTP server

use anyhow::Result;
use tracing::info;

use steelworks_api::config::Settings;
use steelworks_api::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    steelworks_api::telemetry::init_tracing();

    info!("Starting Steelworks API...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
