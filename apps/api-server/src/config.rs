//! Application configuration loaded from environment variables.
//! Nothing security-relevant is hardcoded; the token secret lives in
//! the environment (see `JwtTokenService::from_env`).

use std::env;

#[cfg(feature = "mongo")]
use waypost_infra::store::MongoConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "mongo")]
    pub mongo: Option<MongoConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        #[cfg(feature = "mongo")]
        let mongo = env::var("MONGODB_URI").ok().map(|uri| MongoConfig {
            uri,
            database: env::var("MONGODB_DATABASE").unwrap_or_else(|_| "waypost".to_string()),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            #[cfg(feature = "mongo")]
            mongo,
        }
    }
}
