//! Server configuration for the rates API.
//!
//! Supports programmatic construction, command line arguments, and
//! environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CALC_SERVER_PORT` | 8080 | Server port |
//! | `CALC_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `CALC_LOG_LEVEL` | info | Log level |
//! | `CALC_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `CALC_ENABLE_CORS` | true | Enable CORS |
//! | `CALC_CORS_ORIGINS` | * | Allowed origins |
//! | `CALC_BASE_URL` | http://localhost:8080 | Base URL for pagination links |
//! | `CALC_DATABASE_URL` | (in-memory) | SQLite database path |
//! | `CALC_DEFAULT_PAGE_SIZE` | 200 | Default page size |
//! | `CALC_MAX_PAGE_SIZE` | 2000 | Maximum page size |

use clap::Parser;

/// Server configuration for the rates API.
///
/// Construct from environment variables with [`ServerConfig::from_env`],
/// from command line arguments with [`ServerConfig::parse`], or
/// programmatically via struct update syntax over [`Default`].
#[derive(Debug, Clone, Parser)]
#[command(name = "calc-server")]
#[command(about = "CALC labor rates API server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "CALC_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "CALC_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "CALC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "CALC_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "CALC_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "CALC_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "CALC_CORS_METHODS", default_value = "GET,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "CALC_CORS_HEADERS",
        default_value = "Content-Type,Accept"
    )]
    pub cors_headers: String,

    /// Base URL for the server (used to build pagination links).
    #[arg(long, env = "CALC_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// SQLite database path. When absent an in-memory database is used.
    #[arg(long, env = "CALC_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Default page size for rate listings.
    #[arg(long, env = "CALC_DEFAULT_PAGE_SIZE", default_value = "200")]
    pub default_page_size: usize,

    /// Maximum page size for rate listings.
    #[arg(long, env = "CALC_MAX_PAGE_SIZE", default_value = "2000")]
    pub max_page_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,OPTIONS".to_string(),
            cors_headers: "Content-Type,Accept".to_string(),
            base_url: "http://localhost:8080".to_string(),
            database_url: None,
            default_page_size: 200,
            max_page_size: 2000,
        }
    }
}

impl ServerConfig {
    /// Creates a ServerConfig from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Creates a configuration suitable for testing: ephemeral port, small
    /// pages, short timeout, CORS off.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://localhost:0".to_string(),
            database_url: None,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}
