//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in minutes
    pub jwt_expiration_minutes: i64,
    /// Root directory for uploaded images
    pub uploads_dir: String,
    /// Maximum accepted image payload in bytes
    pub max_image_bytes: usize,
    /// Comma-separated allowed CORS origins, "*" for any
    pub cors_origins: String,
    /// Environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(1440),
            uploads_dir: std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".into()),
            max_image_bytes: std::env::var("MAX_IMAGE_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            cors_origins: std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()),
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_fails_outside_development() {
        let err = Config::require_secret("COMANDA_TEST_UNSET_SECRET", "production").unwrap_err();
        assert!(err.to_string().contains("must be set"));

        let err = Config::require_secret("COMANDA_TEST_UNSET_SECRET", "staging").unwrap_err();
        assert!(err.to_string().contains("must be set"));
    }

    #[test]
    fn test_missing_secret_gets_dev_fallback() {
        let val = Config::require_secret("COMANDA_TEST_UNSET_SECRET", "development").unwrap();
        assert_eq!(val, "dev-COMANDA_TEST_UNSET_SECRET-not-for-production");
    }

    #[test]
    fn test_set_secret_passes_through() {
        // PATH is set and non-empty in any environment that can run tests
        let val = Config::require_secret("PATH", "production").unwrap();
        assert!(!val.is_empty());
    }
}
