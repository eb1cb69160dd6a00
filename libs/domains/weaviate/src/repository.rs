use async_trait::async_trait;

use crate::error::WeaviateResult;
use crate::models::{
    CollectionSchema, ObjectsQuery, SearchHit, SearchQuery, ServerMeta, StoredObject, Tenant,
};

/// Read access to a Weaviate instance
///
/// Implementations are expected to be cheap to share across concurrent
/// tool invocations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeaviateRepository: Send + Sync {
    // ===== Server =====

    /// Whether the instance reports itself ready
    async fn is_ready(&self) -> WeaviateResult<bool>;

    async fn meta(&self) -> WeaviateResult<ServerMeta>;

    // ===== Schema =====

    async fn list_collections(&self) -> WeaviateResult<Vec<CollectionSchema>>;

    /// Fails with `CollectionNotFound` when the collection does not exist
    async fn get_collection(&self, name: &str) -> WeaviateResult<CollectionSchema>;

    async fn list_tenants(&self, collection: &str) -> WeaviateResult<Vec<Tenant>>;

    // ===== Data =====

    async fn fetch_objects(&self, query: ObjectsQuery) -> WeaviateResult<Vec<StoredObject>>;

    async fn search(&self, query: SearchQuery) -> WeaviateResult<Vec<SearchHit>>;
}
