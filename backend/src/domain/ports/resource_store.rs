//! Port for persisting supply-chain resources.
//!
//! One trait serves every resource kind; adapters implement it per concrete
//! [`Resource`] so each can map filters onto its own columns.

use async_trait::async_trait;

use crate::domain::resources::Resource;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by resource stores.
    pub enum ResourceStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "resource store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "resource store query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } => "resource conflicts with existing data: {message}",
        /// The write references a row that does not exist.
        InvalidReference { message: String } => "resource references a missing row: {message}",
    }
}

/// CRUD storage for one resource kind.
///
/// Missing rows are reported as `Ok(None)` or `Ok(false)`, never as errors.
#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    /// Insert a validated draft and return the stored resource.
    async fn create(&self, draft: &R::Draft) -> Result<R, ResourceStoreError>;

    /// Fetch a resource by identifier.
    async fn find(&self, id: i64) -> Result<Option<R>, ResourceStoreError>;

    /// List resources matching the filter, ordered by identifier.
    async fn list(&self, filter: &R::Filter) -> Result<Vec<R>, ResourceStoreError>;

    /// Apply a validated patch, returning the updated resource.
    async fn update(&self, id: i64, patch: &R::Patch) -> Result<Option<R>, ResourceStoreError>;

    /// Delete a resource.
    async fn delete(&self, id: i64) -> Result<bool, ResourceStoreError>;
}
