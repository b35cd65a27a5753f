use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "GBM Tracker";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment overrides.
pub const DB_PATH_ENV: &str = "GBM_TRACKER_DB";
pub const BIND_ADDR_ENV: &str = "GBM_TRACKER_ADDR";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DB_FILE_NAME: &str = "gbm_tracker.db";

/// Get the application data directory
/// ~/GBMTracker/ on all platforms. Falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("GBMTracker")
}

/// Database file: `$GBM_TRACKER_DB`, else `<app data>/gbm_tracker.db`.
pub fn database_path() -> PathBuf {
    database_path_from(std::env::var_os(DB_PATH_ENV).map(PathBuf::from))
}

fn database_path_from(override_path: Option<PathBuf>) -> PathBuf {
    override_path
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| app_data_dir().join(DB_FILE_NAME))
}

/// Listen address for the HTTP API: `$GBM_TRACKER_ADDR`, else 127.0.0.1:8000.
pub fn bind_addr() -> SocketAddr {
    parse_bind_addr(std::env::var(BIND_ADDR_ENV).ok().as_deref())
}

fn parse_bind_addr(raw: Option<&str>) -> SocketAddr {
    let default: SocketAddr = SocketAddr::from(([127, 0, 0, 1], 8000));
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(
                value,
                fallback = DEFAULT_BIND_ADDR,
                "Invalid {BIND_ADDR_ENV}, using default"
            );
            default
        }),
    }
}

/// Tracing filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "gbm_tracker_lib=info,tower=warn,hyper=warn"
}
