//! Runtime configuration, read from the environment with local-dev
//! defaults. Nothing here is required; the server runs out of the box.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub export_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            host: env::var("FUNNELSMITH_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("FUNNELSMITH_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_path: env::var("FUNNELSMITH_DB")
                .unwrap_or_else(|_| "funnelsmith.sqlite".to_string()),
            export_dir: env::var("FUNNELSMITH_EXPORT_DIR").unwrap_or_else(|_| "exports".to_string()),
        }
    }
}
