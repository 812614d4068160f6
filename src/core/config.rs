use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::catalog::LookupPolicy;

/// Configuration constants for the bot
/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Spreadsheet that backs the product table
/// Read from EXCEL_PATH environment variable
/// Loaded at startup if present, overwritten after a successful admin upload
/// Default: base.xlsx
pub static EXCEL_PATH: Lazy<String> =
    Lazy::new(|| env::var("EXCEL_PATH").unwrap_or_else(|_| "base.xlsx".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Public URL of the scanner page opened from the reply keyboard
/// Read from WEB_APP_URL environment variable
/// When unset the scan button is not shown
pub static WEB_APP_URL: Lazy<Option<String>> = Lazy::new(|| {
    env::var("WEB_APP_URL")
        .ok()
        .and_then(|s| if s.trim().is_empty() { None } else { Some(s.trim().to_string()) })
});

/// Code-kind selection used by the query router
/// Read from LOOKUP_POLICY environment variable ("ean_first" or "length")
/// Default: ean_first
pub static LOOKUP_POLICY: Lazy<LookupPolicy> =
    Lazy::new(|| lookup_policy_from(env::var("LOOKUP_POLICY").ok().as_deref()));

/// Unrecognized values are logged and replaced by the default policy.
fn lookup_policy_from(raw: Option<&str>) -> LookupPolicy {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return LookupPolicy::default();
    };
    LookupPolicy::parse_from_str(raw).unwrap_or_else(|| {
        let fallback = LookupPolicy::default();
        log::warn!("Unknown LOOKUP_POLICY {:?}, using {}", raw, fallback);
        fallback
    })
}

/// Admin configuration
pub mod admin {
    use once_cell::sync::Lazy;
    use std::env;

    /// Telegram user id of the only user allowed to replace the table
    /// Read from ADMIN_ID, falls back to ADMIN_USER_ID
    /// Defaults to 0 if not set (nobody can upload)
    pub static ADMIN_ID: Lazy<i64> = Lazy::new(|| {
        env::var("ADMIN_ID")
            .or_else(|_| env::var("ADMIN_USER_ID"))
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    });
}

/// HTTP server configuration (health check and scanner page)
pub mod web {
    use once_cell::sync::Lazy;
    use std::env;

    /// Port for the HTTP server
    /// Read from PORT environment variable (set by the hosting platform)
    /// Default: 10000
    pub static PORT: Lazy<u16> = Lazy::new(|| {
        env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10000)
    });
}

/// Upload limits
pub mod upload {
    /// Largest document the Bot API lets a bot download (20 MB)
    pub const MAX_UPLOAD_BYTES: u32 = 20 * 1024 * 1024;

    /// Extensions accepted as a replacement table
    pub const ACCEPTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm"];
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Bot API server configuration utilities
pub mod bot_api {
    /// Returns the BOT_API_URL environment variable if set.
    pub fn get_url() -> Option<String> {
        std::env::var("BOT_API_URL").ok().filter(|url| !url.trim().is_empty())
    }
}
