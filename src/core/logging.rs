//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Configuration summary printed once at startup

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at application startup
///
/// Token is never printed, only whether it is set.
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🤖 Planogram bot configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if config::BOT_TOKEN.is_empty() {
        log::error!("❌ BOT_TOKEN: not set");
    } else {
        log::info!("✅ BOT_TOKEN: set");
    }

    let excel_path = std::path::Path::new(config::EXCEL_PATH.as_str());
    if excel_path.exists() {
        log::info!("✅ EXCEL_PATH: {}", excel_path.display());
    } else {
        log::warn!(
            "⚠️  EXCEL_PATH: {} (file not found, waiting for admin upload)",
            excel_path.display()
        );
    }

    if *config::admin::ADMIN_ID == 0 {
        log::warn!("⚠️  ADMIN_ID: not set, table uploads are disabled");
    } else {
        log::info!("✅ ADMIN_ID: {}", *config::admin::ADMIN_ID);
    }

    match config::WEB_APP_URL.as_deref() {
        Some(url) => log::info!("✅ WEB_APP_URL: {}", url),
        None => log::warn!("⚠️  WEB_APP_URL: not set, scan button hidden"),
    }

    log::info!("🔎 LOOKUP_POLICY: {}", *config::LOOKUP_POLICY);
    log::info!("🌐 PORT: {}", *config::web::PORT);
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
