//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::{
    handle_code_query, handle_help_command, handle_start_command, handle_stats_command, handle_status_command,
    handle_upload_command,
};
use super::types::{HandlerDeps, HandlerError};
use super::uploads::document_handler;
use crate::telegram::bot::Command;
use crate::telegram::menu::MenuButton;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// # Arguments
/// * `deps` - Handler dependencies (table store, router, admin id, ...)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        // Command handler
        .branch(command_handler(deps.clone()))
        // Admin table upload
        .branch(document_handler(deps.clone()))
        // Barcodes sent back by the scanner Mini App
        .branch(webapp_handler(deps.clone()))
        // Keyboard buttons and typed codes
        .branch(message_handler(deps))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);

                match cmd {
                    Command::Start => handle_start_command(&bot, &msg, &deps).await?,
                    Command::Help => handle_help_command(&bot, &msg, &deps).await?,
                    Command::Stats => handle_stats_command(&bot, &msg, &deps).await?,
                    Command::Status => handle_status_command(&bot, &msg, &deps).await?,
                    Command::Upload => handle_upload_command(&bot, &msg, &deps).await?,
                }
                Ok(())
            }
        },
    ))
}

/// Handler for Web App data from the scanner page
fn webapp_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.web_app_data().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                if let Some(web_app_data) = msg.web_app_data() {
                    log::info!("📸 Scanner sent code: {}", web_app_data.data);
                    handle_code_query(&bot, msg.chat.id, &web_app_data.data, &deps).await?;
                }
                Ok(())
            }
        })
}

fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let text = msg.text().unwrap_or_default();

                match MenuButton::from_text(text) {
                    Some(MenuButton::Stats) => handle_stats_command(&bot, &msg, &deps).await?,
                    Some(MenuButton::Help) => handle_help_command(&bot, &msg, &deps).await?,
                    None => handle_code_query(&bot, msg.chat.id, text, &deps).await?,
                }
                Ok(())
            }
        })
}
