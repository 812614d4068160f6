/// Экранирует текст для `ParseMode::Html` в Telegram.
///
/// Telegram требует экранировать только `&`, `<` и `>`, но кавычки тоже
/// заменяются, чтобы значение можно было вставить в атрибут.
///
/// # Example
///
/// ```
/// use planogram_bot::core::utils::html_escape;
///
/// assert_eq!(html_escape("<b>Чай & кофе</b>"), "&lt;b&gt;Чай &amp; кофе&lt;/b&gt;");
/// ```
pub fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }

    result
}

/// Возвращает правильную форму слова "товар" для русского языка.
///
/// Правила склонения:
/// - 1, 21, 31, ... -> "товар"
/// - 2-4, 22-24, 32-34, ... -> "товара"
/// - 5-20, 25-30, 35-40, ... -> "товаров"
///
/// # Example
///
/// ```
/// use planogram_bot::core::utils::pluralize_products;
///
/// assert_eq!(pluralize_products(1), "товар");
/// assert_eq!(pluralize_products(3), "товара");
/// assert_eq!(pluralize_products(11), "товаров");
/// ```
pub fn pluralize_products(n: usize) -> &'static str {
    let n_mod_100 = n % 100;
    let n_mod_10 = n % 10;

    // Исключения: 11, 12, 13, 14 - всегда "товаров"
    if (11..=14).contains(&n_mod_100) {
        return "товаров";
    }

    match n_mod_10 {
        1 => "товар",
        2..=4 => "товара",
        _ => "товаров",
    }
}

/// Checks that a file name has one of the given extensions (case-insensitive).
pub fn has_extension(file_name: &str, extensions: &[&str]) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{has_extension, html_escape, pluralize_products};

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("plain"), "plain");
        assert_eq!(html_escape("a < b > c"), "a &lt; b &gt; c");
        assert_eq!(html_escape("R&D"), "R&amp;D");
        assert_eq!(html_escape("\"quoted\" 'single'"), "&quot;quoted&quot; &#39;single&#39;");

        // Кириллица не трогается
        assert_eq!(html_escape("Молоко 3,2%"), "Молоко 3,2%");
        assert_eq!(html_escape(""), "");
    }

    #[test]
    fn test_pluralize_products() {
        assert_eq!(pluralize_products(0), "товаров");
        assert_eq!(pluralize_products(1), "товар");
        assert_eq!(pluralize_products(2), "товара");
        assert_eq!(pluralize_products(4), "товара");
        assert_eq!(pluralize_products(5), "товаров");
        assert_eq!(pluralize_products(21), "товар");
        assert_eq!(pluralize_products(22), "товара");

        // Исключения (11-14)
        assert_eq!(pluralize_products(11), "товаров");
        assert_eq!(pluralize_products(14), "товаров");
        assert_eq!(pluralize_products(111), "товаров");
        assert_eq!(pluralize_products(1021), "товар");
    }

    #[test]
    fn test_has_extension() {
        let accepted = &["xlsx", "xlsm"];
        assert!(has_extension("base.xlsx", accepted));
        assert!(has_extension("BASE.XLSX", accepted));
        assert!(has_extension("планограмма.xlsm", accepted));
        assert!(!has_extension("base.xls", accepted));
        assert!(!has_extension("base.csv", accepted));
        assert!(!has_extension("xlsx", accepted));
    }
}
