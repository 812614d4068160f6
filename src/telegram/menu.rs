//! Reply keyboard shown under the input field

use teloxide::types::{ButtonRequest, KeyboardButton, KeyboardMarkup, WebAppInfo};

pub const SCAN_BUTTON: &str = "📸 Сканировать";
pub const STATS_BUTTON: &str = "📊 Статистика";
pub const HELP_BUTTON: &str = "ℹ️ Помощь";

/// Plain-text buttons mapped back to commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    Stats,
    Help,
}

impl MenuButton {
    pub fn from_text(text: &str) -> Option<Self> {
        match text.trim() {
            STATS_BUTTON => Some(MenuButton::Stats),
            HELP_BUTTON => Some(MenuButton::Help),
            _ => None,
        }
    }
}

/// Builds the main keyboard.
///
/// The scanner button needs a public HTTPS page; it is left out when no URL
/// is configured or the URL does not parse.
pub fn main_keyboard(web_app_url: Option<&str>) -> KeyboardMarkup {
    let mut rows = Vec::new();

    if let Some(raw) = web_app_url {
        match url::Url::parse(raw) {
            Ok(url) => rows.push(vec![
                KeyboardButton::new(SCAN_BUTTON).request(ButtonRequest::WebApp(WebAppInfo { url }))
            ]),
            Err(e) => log::warn!("WEB_APP_URL is not a valid URL ({}): {}", raw, e),
        }
    }

    rows.push(vec![KeyboardButton::new(STATS_BUTTON), KeyboardButton::new(HELP_BUTTON)]);

    KeyboardMarkup::new(rows).resize_keyboard()
}
