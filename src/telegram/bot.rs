//! Bot initialization utilities
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Registration of the command list in the Telegram UI

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use crate::core::config;
use crate::core::error::{AppError, AppResult};

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Я умею:")]
pub enum Command {
    #[command(description = "приветствие и клавиатура со сканером")]
    Start,
    #[command(description = "как искать товар")]
    Help,
    #[command(description = "статистика базы")]
    Stats,
    #[command(description = "состояние загруженной базы")]
    Status,
    #[command(description = "загрузить новую базу (только для администратора)")]
    Upload,
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(AppError::Config)` - Failed to create bot (invalid URL, client build error)
pub fn create_bot() -> AppResult<Bot> {
    let client = ClientBuilder::new()
        .timeout(config::network::timeout())
        .build()
        .map_err(|e| AppError::Config(format!("Cannot build HTTP client: {}", e)))?;
    let bot = Bot::with_client(config::BOT_TOKEN.as_str(), client);

    let bot = match config::bot_api::get_url() {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            let url = url::Url::parse(&bot_api_url)
                .map_err(|e| AppError::Config(format!("Invalid BOT_API_URL: {}", e)))?;
            bot.set_api_url(url)
        }
        None => bot,
    };

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(vec![
        BotCommand::new("start", "приветствие и клавиатура со сканером"),
        BotCommand::new("help", "как искать товар"),
        BotCommand::new("stats", "статистика базы"),
        BotCommand::new("status", "состояние загруженной базы"),
        BotCommand::new("upload", "загрузить новую базу (только для администратора)"),
    ])
    .await?;

    Ok(())
}
