//! Handler types and dependencies

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::{LookupPolicy, QueryRouter, TableStore};
use crate::core::config;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub store: Arc<TableStore>,
    pub router: QueryRouter,
    /// Backing spreadsheet, overwritten after a successful upload
    pub excel_path: PathBuf,
    pub admin_id: i64,
    pub web_app_url: Option<String>,
    /// Serializes uploads so the file on disk matches the table in memory
    pub upload_lock: Arc<Mutex<()>>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(
        store: Arc<TableStore>,
        policy: LookupPolicy,
        excel_path: impl Into<PathBuf>,
        admin_id: i64,
        web_app_url: Option<String>,
    ) -> Self {
        Self {
            router: QueryRouter::new(Arc::clone(&store), policy),
            store,
            excel_path: excel_path.into(),
            admin_id,
            web_app_url,
            upload_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Dependencies wired from the environment configuration
    pub fn from_config(store: Arc<TableStore>) -> Self {
        Self::new(
            store,
            *config::LOOKUP_POLICY,
            config::EXCEL_PATH.as_str(),
            *config::admin::ADMIN_ID,
            config::WEB_APP_URL.clone(),
        )
    }
}
