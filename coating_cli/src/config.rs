//! Environment configuration for the CLI.

use std::env;
use std::path::PathBuf;

use coating_core::permissions::Role;

/// Settings read from the environment at startup
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Quote book to save into; quotes are only printed when unset
    pub book_path: Option<PathBuf>,
    /// User id recorded as quote owner and lock holder
    pub user_id: String,
    pub user_name: String,
    pub role: Role,
    /// `EnvFilter` directive, e.g. "info" or "coating_core=debug"
    pub log_level: String,
    /// "pretty" or "json"
    pub log_format: String,
}

impl CliConfig {
    pub fn from_env() -> Self {
        let role = env::var("HORIZON_ROLE")
            .ok()
            .and_then(|r| r.parse().ok())
            .unwrap_or(Role::Estimator);

        CliConfig {
            book_path: env::var("HORIZON_BOOK").ok().filter(|p| !p.trim().is_empty()).map(PathBuf::from),
            user_id: env::var("HORIZON_USER").unwrap_or_else(|_| "local".to_string()),
            user_name: env::var("HORIZON_USER_NAME").unwrap_or_else(|_| "Local Estimator".to_string()),
            role,
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
        }
    }
}
