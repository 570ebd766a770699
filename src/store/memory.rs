use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;
use tokio::sync::RwLock;

use super::{parse_id, LeadStore, StoreError};
use crate::filter::LeadFilter;
use crate::models::{Lead, LeadPatch, NewLead};

/// In-process lead store. Enforces email uniqueness like the Postgres
/// constraint and evaluates filters with [`LeadFilter::matches`].
#[derive(Default)]
pub struct MemoryLeadStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    entries: Vec<Entry>,
    next_seq: u64,
}

struct Entry {
    /// Insertion order; breaks ties between equal `created_at` values
    seq: u64,
    lead: Lead,
}

impl Inner {
    fn email_taken(&self, email: &str, except: Option<uuid::Uuid>) -> bool {
        self.entries.iter().any(|e| e.lead.email == email && Some(e.lead.id) != except)
    }

    /// Matching leads, newest first
    fn newest_first<'a>(&'a self, keep: impl Fn(&Lead) -> bool) -> Vec<&'a Lead> {
        let mut picked: Vec<&Entry> = self.entries.iter().filter(|e| keep(&e.lead)).collect();
        picked.sort_by_key(|e| Reverse((e.lead.created_at, e.seq)));
        picked.into_iter().map(|e| &e.lead).collect()
    }
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn insert(&self, input: NewLead) -> Result<Lead, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.email_taken(&input.email, None) {
            return Err(StoreError::DuplicateEmail(input.email));
        }

        let lead = Lead::create(input, Utc::now());
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.push(Entry { seq, lead: lead.clone() });
        Ok(lead)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Lead>, StoreError> {
        let id = parse_id(id)?;
        let inner = self.inner.read().await;
        Ok(inner.entries.iter().find(|e| e.lead.id == id).map(|e| e.lead.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Lead>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.entries.iter().find(|e| e.lead.email == email).map(|e| e.lead.clone()))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Lead>, StoreError> {
        let inner = self.inner.read().await;
        let skip = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(inner
            .newest_first(|_| true)
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.entries.len() as i64)
    }

    async fn update(&self, id: &str, patch: LeadPatch) -> Result<Option<Lead>, StoreError> {
        let id = parse_id(id)?;
        let mut inner = self.inner.write().await;

        let Some(pos) = inner.entries.iter().position(|e| e.lead.id == id) else {
            return Ok(None);
        };
        if let Some(email) = &patch.email {
            if inner.email_taken(email, Some(id)) {
                return Err(StoreError::DuplicateEmail(email.clone()));
            }
        }

        let entry = &mut inner.entries[pos];
        entry.lead.apply(patch, Utc::now());
        Ok(Some(entry.lead.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let id = parse_id(id)?;
        let mut inner = self.inner.write().await;
        let before = inner.entries.len();
        inner.entries.retain(|e| e.lead.id != id);
        Ok(inner.entries.len() < before)
    }

    async fn search(&self, filter: &LeadFilter) -> Result<Vec<Lead>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.newest_first(|lead| filter.matches(lead)).into_iter().cloned().collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {
        tracing::info!("Closed in-memory lead store");
    }
}
