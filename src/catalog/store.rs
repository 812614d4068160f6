//! In-memory product table with whole-table replacement
//!
//! A load parses and validates the complete new table first and only then
//! swaps a single `Arc` under the write lock. Readers clone the current `Arc`
//! and never see a half-built table.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use super::normalize::normalize_cell;
use super::record::{Column, ProductRecord};
use crate::sheet::{self, SheetError, SheetTable};

/// Why a table could not be installed. The store is left as it was.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("cannot read spreadsheet: {0}")]
    Sheet(#[from] SheetError),

    #[error("decoding task failed: {0}")]
    Interrupted(String),
}

/// Immutable snapshot of a successfully loaded table
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<ProductRecord>,
    loaded_at: DateTime<Utc>,
    source: String,
}

impl Catalog {
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of distinct non-empty `Ряд` values
    pub fn distinct_rows(&self) -> usize {
        self.records
            .iter()
            .map(|record| record.row.as_str())
            .filter(|row| !row.is_empty())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            products: self.len(),
            rows: self.distinct_rows(),
            loaded_at: self.loaded_at,
            source: self.source.clone(),
        }
    }
}

/// Summary shown by `/stats` and `/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub products: usize,
    pub rows: usize,
    pub loaded_at: DateTime<Utc>,
    pub source: String,
}

/// Validates the header and builds a catalog from an already decoded sheet.
///
/// Header cells are compared after [`normalize_cell`]; extra columns are
/// ignored and column order is free. Blank rows are skipped.
pub fn build_catalog(table: &SheetTable, source: impl Into<String>) -> Result<Catalog, LoadError> {
    let mut indexes = [0usize; 9];
    let mut missing = Vec::new();
    for (slot, column) in indexes.iter_mut().zip(Column::ALL) {
        match table.column_index(column.header(), normalize_cell) {
            Some(index) => *slot = index,
            None => missing.push(column.header().to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let records = table
        .rows
        .iter()
        .filter_map(|row| {
            let cells = indexes.map(|index| row.get(index).map(String::as_str).unwrap_or(""));
            ProductRecord::from_cells(cells)
        })
        .collect();

    Ok(Catalog {
        records,
        loaded_at: Utc::now(),
        source: source.into(),
    })
}

/// Process-wide product table, created empty in `main` and shared via `Arc`
#[derive(Debug, Default)]
pub struct TableStore {
    current: RwLock<Option<Arc<Catalog>>>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `.xlsx` bytes and installs them as the new table.
    ///
    /// Returns the number of records. On any error the previous table stays.
    pub async fn load(&self, bytes: &[u8]) -> Result<usize, LoadError> {
        self.load_from(bytes, "upload").await
    }

    /// Same as [`TableStore::load`] with a label recorded in the stats.
    pub async fn load_from(&self, bytes: &[u8], source: impl Into<String>) -> Result<usize, LoadError> {
        let table = sheet::read_first_sheet(bytes)?;
        self.load_table(&table, source).await
    }

    /// Decodes and validates on the blocking thread pool, then installs.
    ///
    /// Used for uploads and the backing file, where a workbook of several
    /// megabytes would otherwise stall a runtime worker while it unzips.
    pub async fn load_blocking(&self, bytes: Arc<[u8]>, source: impl Into<String>) -> Result<usize, LoadError> {
        let source = source.into();
        let catalog = tokio::task::spawn_blocking(move || {
            let table = sheet::read_first_sheet(&bytes)?;
            build_catalog(&table, source)
        })
        .await
        .map_err(|e| LoadError::Interrupted(e.to_string()))??;

        Ok(self.install(catalog).await)
    }

    /// Installs an already decoded sheet.
    pub async fn load_table(&self, table: &SheetTable, source: impl Into<String>) -> Result<usize, LoadError> {
        let catalog = build_catalog(table, source)?;
        Ok(self.install(catalog).await)
    }

    async fn install(&self, catalog: Catalog) -> usize {
        let count = catalog.len();
        *self.current.write().await = Some(Arc::new(catalog));
        count
    }

    /// Current snapshot, `None` until the first successful load.
    pub async fn snapshot(&self) -> Option<Arc<Catalog>> {
        self.current.read().await.clone()
    }

    pub async fn current_size(&self) -> usize {
        self.current.read().await.as_ref().map(|catalog| catalog.len()).unwrap_or(0)
    }

    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }

    pub async fn stats(&self) -> Option<CatalogStats> {
        self.snapshot().await.map(|catalog| catalog.stats())
    }
}
