use std::time::Duration;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub login_max_attempts: usize,
    pub login_window: Duration,
    pub submit_max_attempts: usize,
    pub submit_window: Duration,
    pub upload_max_attempts: usize,
    pub upload_window: Duration,
    /// How long an unowned upload may linger before the cleanup sweep deletes it.
    pub orphan_retention: Duration,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env_or("DATABASE_URL", "sqlite:data/app.db"),
            bind_addr: env_or("BIND_ADDR", "127.0.0.1:8080"),
            upload_dir: env_or("UPLOAD_DIR", "data/uploads"),
            max_upload_bytes: env_u64("MAX_UPLOAD_BYTES", 5 * 1024 * 1024) as usize,
            login_max_attempts: env_u64("LOGIN_MAX_ATTEMPTS", 5) as usize,
            login_window: Duration::from_secs(env_u64("LOGIN_WINDOW_SECS", 900)),
            submit_max_attempts: env_u64("SUBMIT_MAX_ATTEMPTS", 5) as usize,
            submit_window: Duration::from_secs(env_u64("SUBMIT_WINDOW_SECS", 3600)),
            upload_max_attempts: env_u64("UPLOAD_MAX_ATTEMPTS", 20) as usize,
            upload_window: Duration::from_secs(env_u64("UPLOAD_WINDOW_SECS", 3600)),
            orphan_retention: Duration::from_secs(env_u64("ORPHAN_RETENTION_SECS", 24 * 3600)),
        }
    }
}
