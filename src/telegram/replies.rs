//! Texts sent back to the chat
//!
//! Everything here is a pure function of plain data so handlers stay thin and
//! the wording is covered by unit tests.

use indoc::indoc;

use crate::catalog::card::{render_hit, render_stats, render_status};
use crate::catalog::{CatalogStats, LoadError, QueryError, QueryHit};
use crate::core::utils::{html_escape, pluralize_products};

pub const WELCOME: &str = indoc! {"
    👋 Добро пожаловать!

    📸 Нажмите кнопку сканера
    ⌨️ Или отправьте SAP/EAN код"};

pub const HELP: &str = indoc! {"
    ℹ️ <b>Как найти товар</b>

    • Отправьте EAN (штрихкод) или SAP код цифрами
    • Или нажмите «📸 Сканировать» и наведите камеру на штрихкод

    Команды:
    /stats — статистика базы
    /status — состояние базы
    /upload — загрузить новую базу (администратор)"};

pub const NOT_LOADED: &str = "📭 База не загружена. Попросите администратора прислать файл .xlsx";
pub const INVALID_INPUT: &str = "⚠️ Введите только цифры или используйте сканер";

pub const UPLOAD_INSTRUCTIONS: &str = indoc! {"
    📤 Пришлите файл базы документом (.xlsx).

    Первая строка листа — заголовки:
    EAN, SAP, Название, Ряд, Стеллаж, Полка, Позиция, Фейсинг, Упаковка"};

pub const UPLOAD_FORBIDDEN: &str = "⛔ Загружать базу может только администратор";
pub const UPLOAD_WRONG_TYPE: &str = "❌ Нужен файл Excel в формате .xlsx";
pub const UPLOAD_DOWNLOAD_FAILED: &str = "❌ Не удалось скачать файл из Telegram, попробуйте ещё раз";
pub const UPLOAD_STARTED: &str = "⏳ Загружаю базу…";

/// Messages answering one lookup, in sending order.
pub fn query_reply(result: &Result<QueryHit, QueryError>) -> Vec<String> {
    match result {
        Ok(hit) => render_hit(hit),
        Err(QueryError::NotLoaded) => vec![NOT_LOADED.to_string()],
        Err(QueryError::InvalidInput(_)) => vec![INVALID_INPUT.to_string()],
        Err(QueryError::NotFound(code)) => vec![format!("❌ Товар {} не найден", html_escape(code))],
    }
}

pub fn stats_reply(stats: Option<&CatalogStats>) -> String {
    match stats {
        Some(stats) => render_stats(stats),
        None => NOT_LOADED.to_string(),
    }
}

pub fn status_reply(stats: Option<&CatalogStats>, path: &str) -> String {
    match stats {
        Some(stats) => render_status(stats, path),
        None => format!("{}\n\nФайл: <code>{}</code>", NOT_LOADED, html_escape(path)),
    }
}

pub fn upload_too_large(size: u32, limit: u32) -> String {
    format!(
        "❌ Файл слишком большой: {:.1} МБ (максимум {} МБ)",
        f64::from(size) / (1024.0 * 1024.0),
        limit / (1024 * 1024)
    )
}

pub fn upload_loaded(count: usize) -> String {
    format!("✅ База обновлена: {} {}", count, pluralize_products(count))
}

/// Loaded and installed, but writing the backing file failed. The new table
/// is live until the next restart.
pub fn upload_not_persisted(count: usize) -> String {
    format!(
        "{}\n⚠️ Файл не сохранён на диск, после перезапуска будет загружена прежняя база",
        upload_loaded(count)
    )
}

pub fn upload_rejected(err: &LoadError) -> String {
    let reason = match err {
        LoadError::MissingColumns(missing) => format!("нет колонок: {}", missing.join(", ")),
        LoadError::Sheet(e) => format!("файл не читается ({})", e),
        LoadError::Interrupted(_) => "обработка файла прервалась".to_string(),
    };
    format!(
        "❌ База не обновлена, {}\n\nПрежняя база продолжает работать.",
        html_escape(&reason)
    )
}
