//! Generic CRUD service shared by every resource kind.

use std::sync::Arc;

use tracing::warn;

use crate::domain::Error;
use crate::domain::ports::{ResourceStore, ResourceStoreError};

use super::Resource;
use super::validation::Validate;

/// Validates input and delegates to a [`ResourceStore`].
pub struct ResourceService<R: Resource> {
    store: Arc<dyn ResourceStore<R>>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Arc<dyn ResourceStore<R>>) -> Self {
        Self { store }
    }

    pub async fn create(&self, draft: R::Draft) -> Result<R, Error> {
        draft.validate()?;
        self.store.create(&draft).await.map_err(map_store_error::<R>)
    }

    pub async fn get(&self, id: i64) -> Result<R, Error> {
        self.store
            .find(id)
            .await
            .map_err(map_store_error::<R>)?
            .ok_or_else(not_found::<R>)
    }

    pub async fn list(&self, filter: R::Filter) -> Result<Vec<R>, Error> {
        filter.validate()?;
        self.store.list(&filter).await.map_err(map_store_error::<R>)
    }

    pub async fn update(&self, id: i64, patch: R::Patch) -> Result<R, Error> {
        patch.validate()?;
        self.store
            .update(id, &patch)
            .await
            .map_err(map_store_error::<R>)?
            .ok_or_else(not_found::<R>)
    }

    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        let removed = self
            .store
            .delete(id)
            .await
            .map_err(map_store_error::<R>)?;
        if removed { Ok(()) } else { Err(not_found::<R>()) }
    }
}

fn not_found<R: Resource>() -> Error {
    Error::not_found(format!("{} not found", R::KIND))
}

fn map_store_error<R: Resource>(error: ResourceStoreError) -> Error {
    match error {
        ResourceStoreError::Connection { message } => Error::service_unavailable(message),
        ResourceStoreError::Query { message } => Error::internal(message),
        ResourceStoreError::Conflict { message } => {
            warn!(kind = R::KIND, %message, "resource write conflicted");
            Error::conflict(format!("{} conflicts with an existing record", R::KIND))
        }
        ResourceStoreError::InvalidReference { message } => {
            Error::invalid_request(format!("{} references a record that does not exist", R::KIND))
                .with_details(serde_json::json!({ "reason": message }))
        }
    }
}
