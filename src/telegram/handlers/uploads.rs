//! Table upload handler for the administrator

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{Document, Message, ParseMode};

use super::types::{HandlerDeps, HandlerError};
use crate::core::config::upload::{ACCEPTED_EXTENSIONS, MAX_UPLOAD_BYTES};
use crate::core::utils::has_extension;
use crate::telegram::admin::{download_file_from_telegram, is_admin_with, persist_table};
use crate::telegram::replies;

/// Handler for documents: only the administrator may replace the table
pub(super) fn document_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.document().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                if let Some(document) = msg.document() {
                    handle_document(&bot, &msg, document, &deps).await?;
                }
                Ok(())
            }
        })
}

/// Reason a document is refused before anything is downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
enum Precheck {
    Forbidden,
    WrongType,
    TooLarge(u32),
}

fn precheck(user_id: i64, admin_id: i64, file_name: Option<&str>, size: u32) -> Result<(), Precheck> {
    if !is_admin_with(user_id, admin_id) {
        return Err(Precheck::Forbidden);
    }
    if !file_name.is_some_and(|name| has_extension(name, ACCEPTED_EXTENSIONS)) {
        return Err(Precheck::WrongType);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(Precheck::TooLarge(size));
    }
    Ok(())
}

async fn handle_document(bot: &Bot, msg: &Message, document: &Document, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let chat_id = msg.chat.id;
    let user_id = msg.from.as_ref().and_then(|u| i64::try_from(u.id.0).ok()).unwrap_or(0);
    let file_name = document.file_name.as_deref();

    if let Err(refusal) = precheck(user_id, deps.admin_id, file_name, document.file.size) {
        let text = match refusal {
            Precheck::Forbidden => {
                log::warn!("⛔ Document from non-admin user {} ignored", user_id);
                replies::UPLOAD_FORBIDDEN.to_string()
            }
            Precheck::WrongType => {
                log::info!("Document {:?} is not a spreadsheet", file_name);
                replies::UPLOAD_WRONG_TYPE.to_string()
            }
            Precheck::TooLarge(size) => {
                log::warn!("Document {:?} is too large: {} bytes", file_name, size);
                replies::upload_too_large(size, MAX_UPLOAD_BYTES)
            }
        };
        bot.send_message(chat_id, text).await?;
        return Ok(());
    }

    log::info!("📤 Admin {} uploads {:?} ({} bytes)", user_id, file_name, document.file.size);
    bot.send_message(chat_id, replies::UPLOAD_STARTED).await?;

    let bytes = match download_file_from_telegram(bot, &document.file.id).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("❌ Failed to download uploaded table: {:?}", e);
            bot.send_message(chat_id, replies::UPLOAD_DOWNLOAD_FAILED).await?;
            return Ok(());
        }
    };

    let source = file_name.unwrap_or("upload").to_string();
    let bytes: Arc<[u8]> = Arc::from(bytes);

    // Load and persist under one lock so the file on disk is the live table
    let _guard = deps.upload_lock.lock().await;
    let text = match deps.store.load_blocking(Arc::clone(&bytes), source).await {
        Ok(count) => {
            log::info!("✅ Table replaced: {} records", count);
            match persist_table(&deps.excel_path, &bytes).await {
                Ok(()) => replies::upload_loaded(count),
                Err(e) => {
                    log::error!("❌ Failed to save table to {}: {}", deps.excel_path.display(), e);
                    replies::upload_not_persisted(count)
                }
            }
        }
        Err(e) => {
            log::warn!("⚠️ Uploaded table rejected: {}", e);
            replies::upload_rejected(&e)
        }
    };

    bot.send_message(chat_id, text).parse_mode(ParseMode::Html).await?;
    Ok(())
}
