//! Catalog server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Catalog server configuration, loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Allowed CORS origins (comma-separated env var)
    pub cors_origins: Vec<String>,
    /// Search index URL; unset means the in-memory index is used
    pub search_url: Option<String>,
    pub search_username: Option<String>,
    pub search_password: Option<String>,
    /// Name of the product index
    pub search_index: String,
    /// Bound on the outbound product-event queue
    pub event_queue_capacity: usize,
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
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
            search_url: std::env::var("SEARCH_URL").ok().filter(|s| !s.is_empty()),
            search_username: std::env::var("SEARCH_USERNAME")
                .ok()
                .filter(|s| !s.is_empty()),
            search_password: std::env::var("SEARCH_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
            search_index: std::env::var("SEARCH_INDEX").unwrap_or_else(|_| "products".into()),
            event_queue_capacity: std::env::var("EVENT_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
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
        .map(|s| s.trim().trim_matches(|c| c == '"' || c == '\'').trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_bracketed_origin_lists() {
        assert_eq!(
            parse_origins("http://localhost, http://127.0.0.1/"),
            vec!["http://localhost", "http://127.0.0.1"]
        );
        assert_eq!(
            parse_origins(r#"["http://a.test", "http://b.test"]"#),
            vec!["http://a.test", "http://b.test"]
        );
        assert!(parse_origins("").is_empty());
    }
}
