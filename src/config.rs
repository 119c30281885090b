//! Runtime configuration from `CHURCH_*` environment variables

use std::env;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_LOG_DIR: &str = "./logs";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
pub const DEFAULT_AUTH_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub log_dir: PathBuf,
    pub max_body_bytes: usize,
    /// Key for password hashes and session tokens
    pub auth_secret: String,
    pub seed_demo: bool,
    /// Refuse decisions on expenditures that are already settled
    pub strict_approvals: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            auth_secret: DEFAULT_AUTH_SECRET.to_string(),
            seed_demo: false,
            strict_approvals: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env_string("CHURCH_BIND_ADDR", &defaults.bind_addr),
            log_dir: PathBuf::from(env_string("CHURCH_LOG_DIR", DEFAULT_LOG_DIR)),
            max_body_bytes: env_usize("CHURCH_MAX_BODY_BYTES", defaults.max_body_bytes),
            auth_secret: env_string("CHURCH_AUTH_SECRET", &defaults.auth_secret),
            seed_demo: env_bool("CHURCH_SEED_DEMO", defaults.seed_demo),
            strict_approvals: env_bool("CHURCH_STRICT_APPROVALS", defaults.strict_approvals),
        }
    }
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name).ok().and_then(|v| parse_bool(&v)).unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}
