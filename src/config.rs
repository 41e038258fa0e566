use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Carebook";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Days past today covered by a doctor's availability window (inclusive).
pub const AVAILABILITY_WINDOW_DAYS: i64 = 7;

/// The two slot labels offered on the availability form.
pub const MORNING_SLOT: &str = "08:00 - 12:00 am";
pub const EVENING_SLOT: &str = "04:00 - 9:00 pm";

/// Visit type written when a visit is completed without notes.
pub const DEFAULT_VISIT_TYPE: &str = "In-person";

/// Dashboard list sizes.
pub const RECENT_ACTIVITY_LIMIT: u32 = 5;
pub const TIMELINE_FEED_LIMIT: u32 = 10;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Get the application data directory
/// ~/Carebook/ on all platforms, falling back to the working directory
/// when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Database file. `CAREBOOK_DB` overrides the default location.
pub fn database_path() -> PathBuf {
    match std::env::var_os("CAREBOOK_DB") {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => app_data_dir().join("carebook.db"),
    }
}

/// HTTP listen address. `CAREBOOK_BIND` overrides the default.
pub fn bind_addr() -> Result<SocketAddr, AddrParseError> {
    std::env::var("CAREBOOK_BIND")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,carebook_lib=debug"
    } else {
        "warn,carebook_lib=info"
    }
}
