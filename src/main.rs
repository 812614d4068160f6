use anyhow::Result;
use dotenvy::dotenv;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::time::sleep;

use planogram_bot::catalog::card::render_hit;
use planogram_bot::catalog::query::resolve;
use planogram_bot::catalog::store::build_catalog;
use planogram_bot::cli::{Cli, Commands};
use planogram_bot::core::{config, init_logger, log_startup_configuration, web_server};
use planogram_bot::sheet;
use planogram_bot::telegram::admin::load_backing_file;
use planogram_bot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};
use planogram_bot::{AppError, TableStore};

/// How long to wait for the Bot API on startup (attempts × delay)
const STARTUP_MAX_RETRIES: u32 = 60;
const STARTUP_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Check { file, json, code }) => run_check(&file, json, code.as_deref()),
        Some(Commands::Run) | None => run_bot().await,
    }
}

/// Offline validation of a spreadsheet: prints what the bot would load
fn run_check(file: &Path, json: bool, code: Option<&str>) -> Result<()> {
    let bytes = std::fs::read(file).map_err(|e| anyhow::anyhow!("Cannot read {}: {}", file.display(), e))?;
    let table = sheet::read_first_sheet(&bytes)?;
    let catalog = build_catalog(&table, file.display().to_string())?;
    let stats = catalog.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("✅ {} is valid", file.display());
        println!("   Products: {}", stats.products);
        println!("   Rows:     {}", stats.rows);
    }

    if let Some(code) = code {
        match resolve(&catalog, code, *config::LOOKUP_POLICY) {
            Ok(hit) => {
                for message in render_hit(&hit) {
                    println!("\n{}", message);
                }
            }
            Err(e) => println!("\n{}", e),
        }
    }

    Ok(())
}

/// Loads the backing spreadsheet if it exists. A bad file is logged and the
/// bot starts with an empty table.
async fn load_initial_table(store: &TableStore, path: &str) {
    match load_backing_file(store, path).await {
        Ok(Some(count)) => log::info!("✅ Loaded {} products from {}", count, path),
        Ok(None) => log::warn!("📭 {} not found, waiting for an admin upload", path),
        Err(e) => log::error!("❌ {} rejected: {}", path, e),
    }
}

async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");
    log_startup_configuration();

    if config::BOT_TOKEN.is_empty() {
        return Err(AppError::Config("BOT_TOKEN environment variable not set".to_string()).into());
    }

    let store = Arc::new(TableStore::new());
    load_initial_table(&store, &config::EXCEL_PATH).await;

    // Start the web server first so the hosting platform sees an open port
    let port = *config::web::PORT;
    tokio::spawn(async move {
        if let Err(e) = web_server::start_web_server(port).await {
            log::error!("Web server error: {}", e);
        }
    });

    // Create bot instance
    let bot = create_bot()?;

    // Retry if Bot API is still initializing
    let mut startup_retry = 0;
    let bot_info = loop {
        match bot.get_me().await {
            Ok(info) => break info,
            Err(e) => {
                startup_retry += 1;
                if startup_retry >= STARTUP_MAX_RETRIES {
                    return Err(anyhow::anyhow!(
                        "Failed to connect to Bot API after {} retries: {}",
                        startup_retry,
                        e
                    ));
                }
                log::warn!(
                    "Bot API not ready (attempt {}/{}): {}. Retrying in {}s...",
                    startup_retry,
                    STARTUP_MAX_RETRIES,
                    e,
                    STARTUP_RETRY_DELAY.as_secs()
                );
                sleep(STARTUP_RETRY_DELAY).await;
            }
        }
    };
    log::info!("Bot username: {:?}, Bot ID: {}", bot_info.username, bot_info.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let handler = schema(HandlerDeps::from_config(Arc::clone(&store)));
    let listener = Polling::builder(bot.clone()).build();

    log::info!("================================================");
    log::info!("📡 Ready to receive updates!");
    log::info!("================================================");

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
