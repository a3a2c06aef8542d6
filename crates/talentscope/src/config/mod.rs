use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub text_service: TextServiceConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let text_service = TextServiceConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            text_service,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Settings for the external text-understanding service used to grade
/// free-text quiz answers. The API key is user-supplied (BYOK); when absent
/// the scorer runs in degraded mode and every free-text answer takes the
/// neutral fallback path.
#[derive(Debug, Clone)]
pub struct TextServiceConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Maximum number of scoring requests allowed; `None` means unmetered.
    pub request_budget: Option<u32>,
    pub timeout: Duration,
}

impl TextServiceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let endpoint = env::var("TEXT_SERVICE_ENDPOINT")
            .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string());
        let model =
            env::var("TEXT_SERVICE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let api_key = env::var("TEXT_SERVICE_API_KEY").ok().filter(|key| !key.is_empty());

        let request_budget = match env::var("TEXT_SERVICE_REQUEST_BUDGET") {
            Ok(raw) => Some(
                raw.parse::<u32>()
                    .map_err(|_| ConfigError::InvalidBudget)?,
            ),
            Err(_) => None,
        };

        let timeout_ms = env::var("TEXT_SERVICE_TIMEOUT_MS")
            .unwrap_or_else(|_| "20000".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        Ok(Self {
            endpoint,
            model,
            api_key,
            request_budget,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBudget,
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBudget => {
                write!(f, "TEXT_SERVICE_REQUEST_BUDGET must be a non-negative integer")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "TEXT_SERVICE_TIMEOUT_MS must be a duration in milliseconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
