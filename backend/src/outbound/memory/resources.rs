//! Process-local `ResourceStore` for any [`Resource`] kind.
//!
//! Semantics come straight from the resource: `from_draft` builds records,
//! `apply` patches them and `matches` filters them. Unique keys are enforced;
//! foreign keys are not.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{ResourceStore, ResourceStoreError};
use crate::domain::resources::Resource;
use crate::outbound::security::SharedClock;

struct Table<R> {
    rows: BTreeMap<i64, R>,
    next_id: i64,
}

impl<R: Resource> Table<R> {
    fn key_taken(&self, candidate: &R) -> bool {
        let Some(key) = candidate.unique_key() else {
            return false;
        };
        self.rows
            .values()
            .any(|row| row.id() != candidate.id() && row.unique_key() == Some(key))
    }
}

/// Records of one kind in a mutex-guarded ordered map.
pub struct InMemoryResourceStore<R> {
    table: Mutex<Table<R>>,
    clock: SharedClock,
}

impl<R: Resource> InMemoryResourceStore<R> {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            table: Mutex::new(Table {
                rows: BTreeMap::new(),
                next_id: 0,
            }),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table<R>>, ResourceStoreError> {
        self.table
            .lock()
            .map_err(|_| ResourceStoreError::query(format!("{} table lock poisoned", R::KIND)))
    }
}

fn duplicate_key<R: Resource>(record: &R) -> ResourceStoreError {
    ResourceStoreError::conflict(format!(
        "{} key {} already exists",
        R::KIND,
        record.unique_key().unwrap_or_default()
    ))
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for InMemoryResourceStore<R> {
    async fn create(&self, draft: &R::Draft) -> Result<R, ResourceStoreError> {
        let now = self.clock.utc();
        let mut table = self.lock()?;
        let record = R::from_draft(table.next_id + 1, draft, now);
        if table.key_taken(&record) {
            return Err(duplicate_key(&record));
        }
        table.next_id += 1;
        table.rows.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn find(&self, id: i64) -> Result<Option<R>, ResourceStoreError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn list(&self, filter: &R::Filter) -> Result<Vec<R>, ResourceStoreError> {
        Ok(self
            .lock()?
            .rows
            .values()
            .filter(|row| row.matches(filter))
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, patch: &R::Patch) -> Result<Option<R>, ResourceStoreError> {
        let now = self.clock.utc();
        let mut table = self.lock()?;
        let Some(current) = table.rows.get(&id) else {
            return Ok(None);
        };
        let mut updated = current.clone();
        updated.apply(patch, now);
        if table.key_taken(&updated) {
            return Err(duplicate_key(&updated));
        }
        table.rows.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, ResourceStoreError> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }
}
