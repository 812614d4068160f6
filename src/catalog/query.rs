//! Code lookup over the current table snapshot

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::normalize::normalize_cell;
use super::record::ProductRecord;
use super::store::{Catalog, TableStore};

/// At most this many records are returned for one code
pub const MAX_RESULTS: usize = 5;

/// Digit-string lengths treated as an EAN by [`LookupPolicy::ByLength`]
pub const EAN_LENGTHS: std::ops::RangeInclusive<usize> = 8..=14;

/// How a numeric code is matched against the EAN and SAP columns
///
/// Exactly one policy is active per router; they disagree on ambiguous
/// lengths, so they are never combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupPolicy {
    /// Try EAN, fall back to SAP when nothing matched
    #[default]
    EanFirst,
    /// 8–14 digits is an EAN, anything else a SAP code
    ByLength,
}

impl LookupPolicy {
    /// Parse policy from config string
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ean_first" | "ean-first" | "fallback" => Some(LookupPolicy::EanFirst),
            "length" | "by_length" | "by-length" => Some(LookupPolicy::ByLength),
            _ => None,
        }
    }
}

impl fmt::Display for LookupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupPolicy::EanFirst => write!(f, "ean_first"),
            LookupPolicy::ByLength => write!(f, "length"),
        }
    }
}

/// Which column a code was matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Ean,
    Sap,
}

impl CodeKind {
    fn field(self, record: &ProductRecord) -> &str {
        match self {
            CodeKind::Ean => &record.ean,
            CodeKind::Sap => &record.sap,
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeKind::Ean => write!(f, "EAN"),
            CodeKind::Sap => write!(f, "SAP"),
        }
    }
}

/// Terminal failures of a single lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("product table is not loaded")]
    NotLoaded,

    #[error("not a numeric code: {0:?}")]
    InvalidInput(String),

    #[error("no product with code {0}")]
    NotFound(String),
}

/// More matches existed than were returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncated {
    pub total: usize,
}

/// Successful lookup: 1..=MAX_RESULTS records in table order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHit {
    pub code: String,
    pub matched: CodeKind,
    pub records: Vec<ProductRecord>,
    pub truncated: Option<Truncated>,
}

/// Validates free text as a code: surrounding whitespace is dropped, the rest
/// must be ASCII digits.
pub fn parse_code(raw_text: &str) -> Result<String, QueryError> {
    let code = normalize_cell(raw_text);
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(QueryError::InvalidInput(raw_text.to_string()));
    }
    Ok(code)
}

fn matching<'a>(catalog: &'a Catalog, kind: CodeKind, code: &str) -> Vec<&'a ProductRecord> {
    catalog
        .records()
        .iter()
        .filter(|record| kind.field(record) == code)
        .collect()
}

/// Answers one lookup against a snapshot.
pub fn resolve(catalog: &Catalog, raw_text: &str, policy: LookupPolicy) -> Result<QueryHit, QueryError> {
    let code = parse_code(raw_text)?;

    let (matched, found) = match policy {
        LookupPolicy::EanFirst => {
            let by_ean = matching(catalog, CodeKind::Ean, &code);
            if by_ean.is_empty() {
                (CodeKind::Sap, matching(catalog, CodeKind::Sap, &code))
            } else {
                (CodeKind::Ean, by_ean)
            }
        }
        LookupPolicy::ByLength => {
            let kind = if EAN_LENGTHS.contains(&code.len()) {
                CodeKind::Ean
            } else {
                CodeKind::Sap
            };
            (kind, matching(catalog, kind, &code))
        }
    };

    if found.is_empty() {
        return Err(QueryError::NotFound(code));
    }

    let total = found.len();
    let truncated = (total > MAX_RESULTS).then_some(Truncated { total });
    let records = found.into_iter().take(MAX_RESULTS).cloned().collect();

    Ok(QueryHit {
        code,
        matched,
        records,
        truncated,
    })
}

/// Stateless router over the shared store
#[derive(Debug, Clone)]
pub struct QueryRouter {
    store: Arc<TableStore>,
    policy: LookupPolicy,
}

impl QueryRouter {
    pub fn new(store: Arc<TableStore>, policy: LookupPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> LookupPolicy {
        self.policy
    }

    pub fn store(&self) -> &Arc<TableStore> {
        &self.store
    }

    /// Looks up `raw_text` in whatever table is installed right now.
    pub async fn query(&self, raw_text: &str) -> Result<QueryHit, QueryError> {
        let snapshot = self.store.snapshot().await.ok_or(QueryError::NotLoaded)?;
        resolve(&snapshot, raw_text, self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::build_catalog;
    use crate::sheet::SheetTable;
    use pretty_assertions::assert_eq;

    fn catalog(rows: &[[&str; 3]]) -> Catalog {
        let header = ["EAN", "SAP", "Название", "Ряд", "Стеллаж", "Полка", "Позиция", "Фейсинг", "Упаковка"];
        let table = SheetTable {
            header: header.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|[ean, sap, name]| {
                    let mut row = vec![ean.to_string(), sap.to_string(), name.to_string()];
                    row.resize(9, "1".to_string());
                    row
                })
                .collect(),
        };
        build_catalog(&table, "test").unwrap()
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code(" 4600123456789\n").unwrap(), "4600123456789");
        assert_eq!(parse_code("\u{200B}99").unwrap(), "99");
        assert!(matches!(parse_code("abc123"), Err(QueryError::InvalidInput(_))));
        assert!(matches!(parse_code("12 34"), Err(QueryError::InvalidInput(_))));
        assert!(matches!(parse_code("12.0"), Err(QueryError::InvalidInput(_))));
        assert!(matches!(parse_code("   "), Err(QueryError::InvalidInput(_))));
        assert!(matches!(parse_code("١٢٣"), Err(QueryError::InvalidInput(_))));
    }

    #[test]
    fn test_ean_first_prefers_ean() {
        let catalog = catalog(&[["111", "222", "by-sap"], ["222", "333", "by-ean"]]);

        let hit = resolve(&catalog, "222", LookupPolicy::EanFirst).unwrap();

        assert_eq!(hit.matched, CodeKind::Ean);
        assert_eq!(hit.records.len(), 1);
        assert_eq!(hit.records[0].name, "by-ean");
    }

    #[test]
    fn test_ean_first_falls_back_to_sap() {
        let catalog = catalog(&[["4600123456789", "99", "Сыр"]]);

        let hit = resolve(&catalog, "99", LookupPolicy::EanFirst).unwrap();

        assert_eq!(hit.matched, CodeKind::Sap);
        assert_eq!(hit.records[0].name, "Сыр");
    }

    #[test]
    fn test_by_length_never_falls_back() {
        let catalog = catalog(&[["111", "12345678", "sap-8-digits"], ["654321", "1", "ean-6-digits"]]);

        // 8 digits is an EAN lookup, the SAP column is not consulted
        assert!(matches!(
            resolve(&catalog, "12345678", LookupPolicy::ByLength),
            Err(QueryError::NotFound(_))
        ));
        // 6 digits is a SAP lookup
        assert!(matches!(
            resolve(&catalog, "654321", LookupPolicy::ByLength),
            Err(QueryError::NotFound(_))
        ));
        // Same inputs succeed with the fallback policy
        assert!(resolve(&catalog, "12345678", LookupPolicy::EanFirst).is_ok());
        assert!(resolve(&catalog, "654321", LookupPolicy::EanFirst).is_ok());
    }

    #[test]
    fn test_by_length_classification() {
        let catalog = catalog(&[["4600123456789", "4600123456789", "same-code"]]);

        let hit = resolve(&catalog, "4600123456789", LookupPolicy::ByLength).unwrap();
        assert_eq!(hit.matched, CodeKind::Ean);

        let catalog = catalog_with_sap("1234567");
        let hit = resolve(&catalog, "1234567", LookupPolicy::ByLength).unwrap();
        assert_eq!(hit.matched, CodeKind::Sap);
    }

    fn catalog_with_sap(sap: &str) -> Catalog {
        catalog(&[["", sap, "sap-only"]])
    }

    #[test]
    fn test_truncates_to_five_in_table_order() {
        let rows: Vec<[&str; 3]> = ["a", "b", "c", "d", "e", "f", "g"]
            .iter()
            .map(|name| ["", "99", *name])
            .collect();
        let catalog = catalog(&rows);

        let hit = resolve(&catalog, "99", LookupPolicy::EanFirst).unwrap();

        assert_eq!(hit.truncated, Some(Truncated { total: 7 }));
        let names: Vec<&str> = hit.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_exactly_five_is_not_truncated() {
        let rows: Vec<[&str; 3]> = ["a", "b", "c", "d", "e"].iter().map(|name| ["", "5", *name]).collect();
        let catalog = catalog(&rows);

        let hit = resolve(&catalog, "5", LookupPolicy::EanFirst).unwrap();

        assert_eq!(hit.records.len(), 5);
        assert_eq!(hit.truncated, None);
    }

    #[test]
    fn test_not_found() {
        let catalog = catalog(&[["4600123456789", "99", "Сыр"]]);

        assert_eq!(
            resolve(&catalog, "000000", LookupPolicy::EanFirst),
            Err(QueryError::NotFound("000000".to_string()))
        );
    }

    #[test]
    fn test_policy_parse_and_display() {
        assert_eq!(LookupPolicy::parse_from_str("length"), Some(LookupPolicy::ByLength));
        assert_eq!(LookupPolicy::parse_from_str(" EAN_FIRST "), Some(LookupPolicy::EanFirst));
        assert_eq!(LookupPolicy::parse_from_str("both"), None);
        assert_eq!(LookupPolicy::default(), LookupPolicy::EanFirst);
        assert_eq!(LookupPolicy::ByLength.to_string(), "length");
    }

    #[tokio::test]
    async fn test_router_not_loaded_for_any_input() {
        let router = QueryRouter::new(Arc::new(TableStore::new()), LookupPolicy::EanFirst);

        for input in ["4600123456789", "abc123", "", "99"] {
            assert_eq!(router.query(input).await, Err(QueryError::NotLoaded));
        }
    }
}
