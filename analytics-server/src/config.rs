//! Analytics server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Analytics server configuration, loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Allowed CORS origins (comma-separated env var)
    pub cors_origins: Vec<String>,
    /// Environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8001),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
            environment,
        })
    }
}

/// Parse a comma-separated (optionally bracketed) origin list
pub fn parse_origins(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);
    inner
        .split(',')
        .map(|s| {
            s.trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim_end_matches('/')
        })
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
