pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::filter::LeadFilter;
use crate::models::{Lead, LeadPatch, NewLead};

pub use memory::MemoryLeadStore;
pub use postgres::PgLeadStore;

/// Errors from the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid lead id: {0}")]
    InvalidId(String),

    #[error("Lead already exists with email {0}")]
    DuplicateEmail(String),

    #[error("Corrupt lead record {id}: {reason}")]
    Decode { id: Uuid, reason: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Lead identifiers are UUIDs; anything else is a store-level error
pub fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

/// Persistence seam for leads. Handlers only talk to this trait.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Insert a new lead. Fails with `DuplicateEmail` when the email is taken.
    async fn insert(&self, lead: NewLead) -> Result<Lead, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Lead>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Lead>, StoreError>;

    /// Newest first, skipping `offset` records
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Lead>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;

    /// Apply a partial update and refresh `updated_at`. `None` if absent.
    async fn update(&self, id: &str, patch: LeadPatch) -> Result<Option<Lead>, StoreError>;

    /// `false` if there was nothing to delete
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Every lead matching the filter, newest first
    async fn search(&self, filter: &LeadFilter) -> Result<Vec<Lead>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    async fn close(&self);
}

/// Open the store named by the database URL
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn LeadStore>, StoreError> {
    if config.url.starts_with("memory:") {
        tracing::warn!("Using in-memory lead store; data will not survive a restart");
        return Ok(Arc::new(MemoryLeadStore::new()));
    }

    let store = PgLeadStore::connect(config).await?;
    store.ensure_schema().await?;
    Ok(Arc::new(store))
}
