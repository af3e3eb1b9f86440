//! Application Startup
//!
//! Application building and server initialization.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::application::services::{MailDispatcher, MailRelay, ReviewsProxy};
use crate::config::Settings;
use crate::domain::{MailTransport, PlacesClient};
use crate::infrastructure::cache::ReviewCache;
use crate::infrastructure::mail::SmtpMailer;
use crate::infrastructure::places::GooglePlacesClient;
use crate::presentation::http::{handlers::health, routes};
use crate::presentation::middleware::{cors, create_security_headers_layer, RateLimiter};
use crate::shared::error::ErrorResponse;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub mail: Arc<MailDispatcher>,
    pub reviews: Arc<ReviewsProxy>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Wire the production components from settings.
    ///
    /// Incomplete SMTP settings leave the dispatcher unconfigured and
    /// missing place credentials disable the reviews proxy; neither stops
    /// the server from starting.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let relay = match settings.mail.relay() {
            Ok(config) => match SmtpMailer::new(&config) {
                Ok(mailer) => {
                    tracing::info!(host = %config.host, port = config.port, "SMTP relay configured");
                    let transport: Arc<dyn MailTransport> = Arc::new(mailer);
                    Some(MailRelay::from_config(transport, &config))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "SMTP relay rejected, mail disabled");
                    None
                }
            },
            Err(missing) => {
                tracing::warn!(missing = ?missing, "SMTP settings incomplete, mail disabled");
                None
            }
        };
        let mail = MailDispatcher::new(relay, settings.mail.utc_offset_minutes);

        let client: Option<Arc<dyn PlacesClient>> = match settings.reviews.credentials() {
            Some(credentials) => {
                let client = GooglePlacesClient::new(
                    settings.reviews.base_url.clone(),
                    credentials,
                    settings.reviews.timeout(),
                )
                .context("Failed to build places HTTP client")?;
                Some(Arc::new(client))
            }
            None => {
                tracing::warn!("GOOGLE_MAPS_API_KEY or GOOGLE_PLACE_ID missing, reviews disabled");
                None
            }
        };
        let cache = Arc::new(ReviewCache::new(settings.reviews.ttl()));

        Ok(Self::new(
            mail,
            ReviewsProxy::new(client, cache),
            RateLimiter::new(&settings.rate_limit),
        ))
    }

    pub fn new(mail: MailDispatcher, reviews: ReviewsProxy, rate_limiter: RateLimiter) -> Self {
        Self {
            mail: Arc::new(mail),
            reviews: Arc::new(reviews),
            rate_limiter: Arc::new(rate_limiter),
        }
    }
}

/// Build the router with the full middleware stack.
pub fn build_router(state: AppState, settings: &Settings) -> Router {
    routes::create_router(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(create_security_headers_layer(&settings.security))
        .layer(cors::create_cors_layer(&settings.cors))
        .layer(TraceLayer::new_for_http())
}

/// Turn a handler panic into the standard JSON 500.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("internal_error", "Internal server error")),
    )
        .into_response()
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();

        let state = AppState::from_settings(&settings)?;
        let router = build_router(state, &settings);

        // Bind to address
        let addr = settings.server_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
