//! Telegram HTML rendering of lookup results

use crate::core::utils::{html_escape, pluralize_products};

use super::query::{QueryHit, Truncated};
use super::record::ProductRecord;
use super::store::CatalogStats;

const MISSING: &str = "—";

fn value(raw: &str) -> String {
    if raw.is_empty() {
        MISSING.to_string()
    } else {
        html_escape(raw)
    }
}

/// Renders one product location card.
pub fn render_card(record: &ProductRecord) -> String {
    format!(
        "📦 <b>{name}</b>\n\n\
         🔢 <b>Коды:</b>\n   \
         • SAP: <code>{sap}</code>\n   \
         • EAN: <code>{ean}</code>\n\n\
         📍 <b>МЕСТОПОЛОЖЕНИЕ:</b>\n   \
         🏪 Ряд: <b>{row}</b>\n   \
         📊 Стеллаж: <b>{rack}</b>\n   \
         📐 Полка: <b>{shelf}</b>\n   \
         📌 Позиция: <b>{position}</b>\n\n\
         📦 <b>Упаковка:</b>\n   \
         • Фейсинг: <b>{facing}</b>\n   \
         • Тип: <b>{packaging}</b>",
        name = value(&record.name),
        sap = value(&record.sap),
        ean = value(&record.ean),
        row = value(&record.row),
        rack = value(&record.rack),
        shelf = value(&record.shelf),
        position = value(&record.position),
        facing = value(&record.facing),
        packaging = value(&record.packaging),
    )
}

/// Warning sent before the cards when more matches exist than are shown.
pub fn render_truncation(code: &str, shown: usize, truncated: Truncated) -> String {
    format!(
        "⚠️ По коду <code>{}</code> найдено {} {}, показаны первые {}",
        html_escape(code),
        truncated.total,
        pluralize_products(truncated.total),
        shown
    )
}

/// All messages for a successful lookup, in sending order.
pub fn render_hit(hit: &QueryHit) -> Vec<String> {
    let mut messages = Vec::with_capacity(hit.records.len() + 1);
    if let Some(truncated) = hit.truncated {
        messages.push(render_truncation(&hit.code, hit.records.len(), truncated));
    }
    messages.extend(hit.records.iter().map(render_card));
    messages
}

/// Body of `/stats`
pub fn render_stats(stats: &CatalogStats) -> String {
    format!(
        "📊 <b>Статистика базы:</b>\n\n\
         • Товаров: <b>{}</b>\n\
         • Рядов: <b>{}</b>",
        stats.products, stats.rows
    )
}

/// Body of `/status`
pub fn render_status(stats: &CatalogStats, path: &str) -> String {
    format!(
        "🗂 <b>Состояние базы</b>\n\n\
         • Файл: <code>{}</code>\n\
         • Источник: {}\n\
         • Записей: <b>{}</b>\n\
         • Загружена: {}",
        html_escape(path),
        html_escape(&stats.source),
        stats.products,
        stats.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::query::CodeKind;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn record(name: &str) -> ProductRecord {
        ProductRecord {
            ean: "4600123456789".to_string(),
            sap: "99".to_string(),
            name: name.to_string(),
            row: "5".to_string(),
            rack: "12".to_string(),
            shelf: "3".to_string(),
            position: "1".to_string(),
            facing: "2".to_string(),
            packaging: String::new(),
        }
    }

    #[test]
    fn test_render_card_layout() {
        let card = render_card(&record("Сыр"));

        assert!(card.starts_with("📦 <b>Сыр</b>\n\n"));
        assert!(card.contains("   • SAP: <code>99</code>\n"));
        assert!(card.contains("   • EAN: <code>4600123456789</code>\n"));
        assert!(card.contains("   🏪 Ряд: <b>5</b>\n"));
        assert!(card.contains("   📊 Стеллаж: <b>12</b>\n"));
        assert!(card.contains("   📐 Полка: <b>3</b>\n"));
        assert!(card.contains("   📌 Позиция: <b>1</b>\n"));
        assert!(card.contains("   • Фейсинг: <b>2</b>\n"));
        assert!(card.ends_with("   • Тип: <b>—</b>"));
    }

    #[test]
    fn test_render_card_escapes_spreadsheet_text() {
        let card = render_card(&record("Чай <Лисма> & \"Ко\""));

        assert!(card.contains("<b>Чай &lt;Лисма&gt; &amp; &quot;Ко&quot;</b>"));
        assert!(!card.contains("<Лисма>"));
    }

    #[test]
    fn test_render_hit_with_truncation() {
        let hit = QueryHit {
            code: "99".to_string(),
            matched: CodeKind::Sap,
            records: (0..5).map(|i| record(&format!("p{i}"))).collect(),
            truncated: Some(Truncated { total: 7 }),
        };

        let messages = render_hit(&hit);

        assert_eq!(messages.len(), 6);
        assert_eq!(
            messages[0],
            "⚠️ По коду <code>99</code> найдено 7 товаров, показаны первые 5"
        );
        assert!(messages[1].contains("<b>p0</b>"));
        assert!(messages[5].contains("<b>p4</b>"));
    }

    #[test]
    fn test_render_hit_without_truncation() {
        let hit = QueryHit {
            code: "4600123456789".to_string(),
            matched: CodeKind::Ean,
            records: vec![record("Сыр")],
            truncated: None,
        };

        assert_eq!(render_hit(&hit), vec![render_card(&record("Сыр"))]);
    }

    #[test]
    fn test_render_stats_and_status() {
        let stats = CatalogStats {
            products: 120,
            rows: 8,
            loaded_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            source: "base.xlsx".to_string(),
        };

        let body = render_stats(&stats);
        assert!(body.contains("Товаров: <b>120</b>"));
        assert!(body.contains("Рядов: <b>8</b>"));

        let status = render_status(&stats, "data/base.xlsx");
        assert!(status.contains("<code>data/base.xlsx</code>"));
        assert!(status.contains("Записей: <b>120</b>"));
        assert!(status.contains("2024-03-01 09:30:00 UTC"));
    }
}
