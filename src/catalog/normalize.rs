//! Text cleanup for spreadsheet cells and product codes

/// Zero-width and other invisible marks that survive copy-paste from
/// spreadsheets and scanners but are not `char::is_whitespace`.
fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{FEFF}'
    )
}

/// Normalizes any cell: drops invisible marks and trims surrounding whitespace.
pub fn normalize_cell(raw: &str) -> String {
    let visible: String = raw.chars().filter(|c| !is_invisible(*c)).collect();
    visible.trim().to_string()
}

/// Normalizes an EAN/SAP code.
///
/// On top of [`normalize_cell`] it removes inner whitespace and the `.0`
/// suffix left behind when a code was stored as a float upstream, so
/// `"4600123456789.0 "` and `"4600123456789"` compare equal.
pub fn normalize_code(raw: &str) -> String {
    let mut code: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !is_invisible(*c))
        .collect();
    while let Some(stripped) = code.strip_suffix(".0") {
        let len = stripped.len();
        code.truncate(len);
    }
    code
}
