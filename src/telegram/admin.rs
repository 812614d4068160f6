//! Administrator-only operations: table upload and persistence

use std::path::{Path, PathBuf};
use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::FileId;
use url::Url;

use crate::catalog::TableStore;
use crate::core::config;
use crate::core::config::admin::ADMIN_ID;
use crate::core::error::{AppError, AppResult};

/// Check if user is admin
pub fn is_admin(user_id: i64) -> bool {
    is_admin_with(user_id, *ADMIN_ID)
}

/// Same check against an explicit admin id. `0` means no admin is configured
/// and nobody passes.
pub fn is_admin_with(user_id: i64, admin_id: i64) -> bool {
    admin_id != 0 && user_id == admin_id
}

/// Downloads a document sent to the bot into memory.
///
/// Goes through `getFile` and then fetches the file over HTTP from the same
/// Bot API server the bot talks to.
pub async fn download_file_from_telegram(bot: &Bot, file_id: &FileId) -> anyhow::Result<Vec<u8>> {
    log::info!("📥 Starting download for file_id: {}", file_id.0);

    let file = bot.get_file(file_id.clone()).await?;
    log::info!(
        "✅ File info retrieved: path = {}, size = {} bytes",
        file.path,
        file.size
    );

    let file_url = build_file_url(&bot.api_url(), bot.token(), &file.path)?;

    let client = reqwest::Client::builder().timeout(config::network::timeout()).build()?;
    let resp = client.get(file_url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!(
            "Telegram file download failed (path={}, status={}): {}",
            file.path,
            status,
            body
        ));
    }

    let bytes = resp.bytes().await?;
    log::info!(
        "📊 Downloaded {} bytes ({:.2} MB)",
        bytes.len(),
        bytes.len() as f64 / (1024.0 * 1024.0)
    );

    Ok(bytes.to_vec())
}

fn build_file_url(base: &Url, token: &str, file_path: &str) -> anyhow::Result<Url> {
    let mut url = base.clone();

    // Local Bot API returns absolute paths inside its data directory
    let container_prefix = "/var/lib/telegram-bot-api/";
    let relative = file_path.strip_prefix(container_prefix).unwrap_or(file_path);

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("BOT_API_URL cannot be a base URL"))?;
        segments.pop_if_empty();
        segments.push("file");
        segments.push(&format!("bot{token}"));
        for seg in relative.split('/') {
            if !seg.is_empty() {
                segments.push(seg);
            }
        }
    }

    Ok(url)
}

/// Writes the accepted table to `path` via a sibling temp file and rename,
/// so a crash never leaves a truncated spreadsheet behind.
pub async fn persist_table(path: impl AsRef<Path>, bytes: &[u8]) -> AppResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp_path = temp_path_for(path);
    if let Err(e) = tokio::fs::write(&tmp_path, bytes).await {
        tokio::fs::remove_file(&tmp_path).await.ok();
        return Err(AppError::Io(e));
    }
    tokio::fs::rename(&tmp_path, path).await?;

    log::info!("💾 Table saved to {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Loads the backing spreadsheet into `store` at startup.
///
/// `Ok(None)` when the file does not exist yet; the store is untouched on
/// every error.
pub async fn load_backing_file(store: &TableStore, path: impl AsRef<Path>) -> AppResult<Option<usize>> {
    let path = path.as_ref();
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(AppError::Io(e)),
    };

    let count = store
        .load_blocking(Arc::from(bytes), path.display().to_string())
        .await?;
    Ok(Some(count))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("base.xlsx");
    path.with_file_name(format!("{}.part", name))
}
