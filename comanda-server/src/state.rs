//! Application state for comanda-server

use sqlx::PgPool;
use std::path::PathBuf;

use crate::auth::JwtService;
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT token service
    pub jwt: JwtService,
    /// Root directory for uploaded images
    pub uploads_dir: PathBuf,
    /// Maximum accepted image payload in bytes
    pub max_image_bytes: usize,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let uploads_dir = PathBuf::from(&config.uploads_dir);
        std::fs::create_dir_all(&uploads_dir)?;

        Ok(Self {
            pool,
            jwt: JwtService::new(&config.jwt_secret, config.jwt_expiration_minutes),
            uploads_dir,
            max_image_bytes: config.max_image_bytes,
        })
    }
}
