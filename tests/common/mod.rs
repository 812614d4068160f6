//! Common test utilities
//!
//! This module is shared across all integration tests

#![allow(dead_code)]

pub mod xlsx;

pub use xlsx::{Cell, XlsxBuilder};

/// Header row in the order the catalog stores columns
pub const HEADER: [&str; 9] = [
    "EAN", "SAP", "Название", "Ряд", "Стеллаж", "Полка", "Позиция", "Фейсинг", "Упаковка",
];

/// Workbook with the standard header and one row per item.
///
/// EAN and SAP are written as numeric cells, the way a spreadsheet stores
/// codes typed without a leading apostrophe.
pub fn planogram_xlsx(rows: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut builder = XlsxBuilder::new();
    builder.row(HEADER.iter().map(|h| Cell::text(h)).collect());
    for (ean, sap, name) in rows {
        builder.row(vec![
            Cell::number(ean),
            Cell::number(sap),
            Cell::text(name),
            Cell::number("5"),
            Cell::number("12"),
            Cell::number("3"),
            Cell::number("1"),
            Cell::number("2"),
            Cell::text("шт"),
        ]);
    }
    builder.build()
}
