//! Application settings and configuration structures.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Rate limiting for the form endpoints
    pub rate_limit: RateLimitSettings,

    /// Response security headers
    pub security: SecuritySettings,

    /// Outbound SMTP relay for form submissions
    pub mail: MailSettings,

    /// Google Places reviews proxy
    pub reviews: ReviewsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// Sliding-window limits applied per client to the form endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    /// Requests allowed per window
    pub requests_per_window: u32,

    /// Window duration in seconds
    pub window_seconds: u64,

    /// Extra requests tolerated above the base limit
    pub burst_allowance: u32,
}

/// Security header configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SecuritySettings {
    /// Emit Strict-Transport-Security (only behind HTTPS)
    pub enable_hsts: bool,
}

/// SMTP relay configuration.
///
/// Every connection value is optional so the server can boot without a
/// relay; submissions are then answered with a "not configured" error.
#[derive(Debug, Clone, Deserialize)]
pub struct MailSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,

    /// Destination mailbox for form notifications
    pub to: Option<String>,

    /// `From` header; falls back to `"{sender_name}" <{username}>`
    pub from: Option<String>,

    /// Display name used when `from` is not set
    pub sender_name: String,

    /// SMTP command timeout in seconds
    pub timeout_secs: u64,

    /// Offset from UTC, in minutes, used for timestamps in notification bodies
    pub utc_offset_minutes: i32,
}

/// Google Places reviews proxy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewsSettings {
    pub api_key: Option<String>,
    pub place_id: Option<String>,

    /// Cache time-to-live in milliseconds
    pub ttl_ms: u64,

    /// Place details endpoint
    pub base_url: String,

    /// Upstream request timeout in seconds
    pub timeout_secs: u64,
}

fn default_sender_name() -> String {
    "RN All Steel".into()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_utc_offset_minutes() -> i32 {
    330
}

/// Place details endpoint of the Google Places API.
pub const GOOGLE_PLACE_DETAILS_URL: &str =
    "https://maps.googleapis.com/maps/api/place/details/json";

/// Default review cache lifetime (5 minutes).
pub const DEFAULT_REVIEWS_TTL_MS: u64 = 5 * 60 * 1000;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. `APP__`-prefixed environment variables
    /// 4. The flat variables the site has always used (`SMTP_HOST`,
    ///    `GOOGLE_MAPS_API_KEY`, ...), highest priority
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the rate limit window is zero.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            // 5 submissions per minute, 2 retries of slack
            .set_default("rate_limit.requests_per_window", 5)?
            .set_default("rate_limit.window_seconds", 60)?
            .set_default("rate_limit.burst_allowance", 2)?
            .set_default("security.enable_hsts", false)?
            .set_default("mail.sender_name", default_sender_name())?
            .set_default("mail.timeout_secs", default_timeout_secs())?
            .set_default("mail.utc_offset_minutes", default_utc_offset_minutes())?
            .set_default("reviews.ttl_ms", DEFAULT_REVIEWS_TTL_MS)?
            .set_default("reviews.base_url", GOOGLE_PLACE_DETAILS_URL)?
            .set_default("reviews.timeout_secs", 10)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__MAIL__HOST=smtp.example.com -> mail.host
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", env_value("SERVER_HOST"))?
            .set_override_option("server.port", env_value("SERVER_PORT"))?
            .set_override_option("mail.host", env_value("SMTP_HOST"))?
            .set_override_option("mail.port", port_value("SMTP_PORT", env_value("SMTP_PORT")))?
            .set_override_option("mail.username", env_value("SMTP_USER"))?
            .set_override_option("mail.password", env_value("SMTP_PASS"))?
            .set_override_option("mail.to", env_value("CONTACT_TO_EMAIL"))?
            .set_override_option("mail.from", env_value("SMTP_FROM_EMAIL"))?
            .set_override_option("reviews.api_key", env_value("GOOGLE_MAPS_API_KEY"))?
            .set_override_option("reviews.place_id", env_value("GOOGLE_PLACE_ID"))?
            .set_override_option("reviews.ttl_ms", env_value("GOOGLE_REVIEWS_TTL_MS"))?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                if settings.rate_limit.window_seconds == 0 {
                    return Err(ConfigError::Message(
                        "rate_limit.window_seconds must be greater than zero".into(),
                    ));
                }
                Ok(settings)
            })
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Read a flat environment variable, treating blank values as unset.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Keep a flat port variable only when it is a valid port number. Anything
/// else reads as unset so the relay reports it as missing.
fn port_value(name: &str, raw: Option<String>) -> Option<String> {
    let raw = raw?;
    match raw.trim().parse::<u16>() {
        Ok(port) => Some(port.to_string()),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "Ignoring invalid port");
            None
        }
    }
}

/// Trim an optional setting and drop it when blank.
fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// A complete SMTP relay definition, resolved from [`MailSettings`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
    pub recipient: String,
    pub timeout: Duration,
}

impl MailSettings {
    /// Resolve the relay definition.
    ///
    /// Returns the names of the missing settings when the relay is
    /// incomplete.
    pub fn relay(&self) -> Result<RelayConfig, Vec<&'static str>> {
        let host = present(&self.host);
        let username = present(&self.username);
        let password = present(&self.password);
        let recipient = present(&self.to);

        let mut missing = Vec::new();
        if host.is_none() {
            missing.push("SMTP_HOST");
        }
        if self.port.is_none() {
            missing.push("SMTP_PORT");
        }
        if username.is_none() {
            missing.push("SMTP_USER");
        }
        if password.is_none() {
            missing.push("SMTP_PASS");
        }
        if recipient.is_none() {
            missing.push("CONTACT_TO_EMAIL");
        }

        match (host, self.port, username, password, recipient) {
            (Some(host), Some(port), Some(username), Some(password), Some(recipient)) => {
                let sender = present(&self.from)
                    .unwrap_or_else(|| format!("\"{}\" <{}>", self.sender_name, username));
                Ok(RelayConfig {
                    host,
                    port,
                    username,
                    password,
                    sender,
                    recipient,
                    timeout: Duration::from_secs(self.timeout_secs),
                })
            }
            _ => Err(missing),
        }
    }
}

/// Credentials identifying the place whose reviews are proxied.
#[derive(Debug, Clone)]
pub struct PlaceCredentials {
    pub api_key: String,
    pub place_id: String,
}

impl ReviewsSettings {
    /// Returns `None` when either the API key or the place id is missing,
    /// which disables the proxy.
    pub fn credentials(&self) -> Option<PlaceCredentials> {
        Some(PlaceCredentials {
            api_key: present(&self.api_key)?,
            place_id: present(&self.place_id)?,
        })
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
