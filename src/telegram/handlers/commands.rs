//! Command and lookup handlers

use teloxide::prelude::*;
use teloxide::types::{Message, ParseMode};

use super::types::{HandlerDeps, HandlerError};
use crate::telegram::admin::is_admin_with;
use crate::telegram::menu::main_keyboard;
use crate::telegram::replies;

/// Handle /start and /help: greeting plus the reply keyboard
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, replies::WELCOME)
        .parse_mode(ParseMode::Html)
        .reply_markup(main_keyboard(deps.web_app_url.as_deref()))
        .await?;
    Ok(())
}

pub(super) async fn handle_help_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, replies::HELP)
        .parse_mode(ParseMode::Html)
        .reply_markup(main_keyboard(deps.web_app_url.as_deref()))
        .await?;
    Ok(())
}

pub(super) async fn handle_stats_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let stats = deps.store.stats().await;
    bot.send_message(msg.chat.id, replies::stats_reply(stats.as_ref()))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

pub(super) async fn handle_status_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let stats = deps.store.stats().await;
    let path = deps.excel_path.display().to_string();
    bot.send_message(msg.chat.id, replies::status_reply(stats.as_ref(), &path))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Handle /upload: only explains how to send the file, the document handler
/// does the actual work.
pub(super) async fn handle_upload_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let user_id = msg.from.as_ref().and_then(|u| i64::try_from(u.id.0).ok()).unwrap_or(0);

    let text = if is_admin_with(user_id, deps.admin_id) {
        replies::UPLOAD_INSTRUCTIONS
    } else {
        log::warn!("⛔ /upload requested by non-admin user {}", user_id);
        replies::UPLOAD_FORBIDDEN
    };
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Runs a lookup and sends the resulting messages.
///
/// Used for typed text and for scanner payloads alike.
pub(super) async fn handle_code_query(
    bot: &Bot,
    chat_id: ChatId,
    raw_text: &str,
    deps: &HandlerDeps,
) -> Result<(), HandlerError> {
    let result = deps.router.query(raw_text).await;
    match &result {
        Ok(hit) => log::info!(
            "🔎 {} {} → {} record(s){}",
            hit.matched,
            hit.code,
            hit.records.len(),
            hit.truncated
                .map(|t| format!(", {} total", t.total))
                .unwrap_or_default()
        ),
        Err(e) => log::info!("🔎 Lookup from chat {} failed: {}", chat_id, e),
    }

    for text in replies::query_reply(&result) {
        bot.send_message(chat_id, text).parse_mode(ParseMode::Html).await?;
    }
    Ok(())
}
