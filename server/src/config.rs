//! Configuration for the clubhouse server.
//!
//! Every value has a compile-time default and can be overridden at runtime
//! via a dedicated environment variable. Command-line flags parsed in
//! `main.rs` take precedence over both.

use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_CONFIG_DIR: &str = ".config/clubhouse/data";
const DEV_DATA_DIR: &str = "./data";
const DB_FILE_NAME: &str = "clubhouse.db";

/// Default time allowed for a client to send its request body (milliseconds).
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Default size of the SQLite connection pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Get the data directory for persistence.
///
/// Priority:
/// 1. `CLUBHOUSE_DATA_DIR` env variable if set
/// 2. `$HOME/.config/clubhouse/data` if HOME is set
/// 3. `./data` as fallback
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CLUBHOUSE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(DEFAULT_CONFIG_DIR);
    }

    PathBuf::from(DEV_DATA_DIR)
}

/// Get the SQLite database file path.
///
/// Priority:
/// 1. `CLUBHOUSE_DB_PATH` env variable if set
/// 2. `clubhouse.db` inside [`get_data_dir`]
pub fn get_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("CLUBHOUSE_DB_PATH") {
        return PathBuf::from(path);
    }

    get_data_dir().join(DB_FILE_NAME)
}

/// Get the HTTP listen address.
///
/// Priority:
/// 1. `CLUBHOUSE_ADDR` env variable if set and parseable
/// 2. `127.0.0.1:8080`
pub fn get_addr() -> SocketAddr {
    std::env::var("CLUBHOUSE_ADDR")
        .ok()
        .and_then(|addr| addr.parse().ok())
        .unwrap_or_else(default_addr)
}

/// Get the request body timeout in milliseconds.
///
/// Falls back to the default if `CLUBHOUSE_REQUEST_TIMEOUT_MS` cannot be
/// parsed as a `u64`.
pub fn get_request_timeout_ms() -> u64 {
    if let Ok(timeout) = std::env::var("CLUBHOUSE_REQUEST_TIMEOUT_MS") {
        return timeout.parse().unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);
    }

    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Get the maximum number of pooled database connections.
pub fn get_max_connections() -> u32 {
    if let Ok(max) = std::env::var("CLUBHOUSE_MAX_CONNECTIONS") {
        return max.parse().unwrap_or(DEFAULT_MAX_CONNECTIONS);
    }

    DEFAULT_MAX_CONNECTIONS
}

/// Directory for daily rolling log files. Logs go to stdout when unset.
pub fn get_log_dir() -> Option<PathBuf> {
    std::env::var("CLUBHOUSE_LOG_DIR").ok().map(PathBuf::from)
}

/// `127.0.0.1:8080`.
fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}
