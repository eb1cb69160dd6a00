use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{ConfigSummary, WeaviateConfig};
use crate::models::{
    CollectionList, CollectionParams, ConnectionStatus, HybridSearchParams, ObjectsParams,
    ObjectsQuery, ObjectsResponse, SEARCH_ALPHA, SchemaParams, SchemaResponse, SearchMode,
    SearchParams, SearchResponse, TenancyStatus, TenantList,
};
use crate::repository::WeaviateRepository;

/// Weaviate service providing the operations exposed as tools
///
/// Repository failures never escape: every response carries an `error`
/// field next to empty defaults so the calling agent can read what went wrong.
pub struct WeaviateService<R: WeaviateRepository> {
    config: Arc<WeaviateConfig>,
    repository: R,
}

impl<R: WeaviateRepository> WeaviateService<R> {
    pub fn new(config: Arc<WeaviateConfig>, repository: R) -> Self {
        Self { config, repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    // ===== Connection =====

    pub fn get_config(&self) -> ConfigSummary {
        self.config.summary()
    }

    pub async fn check_connection(&self) -> ConnectionStatus {
        let mut status = ConnectionStatus::for_config(&self.config);

        match self.repository.is_ready().await {
            Ok(true) => {
                status.connected = true;
                match self.repository.meta().await {
                    Ok(meta) => status.version = meta.version,
                    Err(e) => debug!(error = %e, "Could not read server version"),
                }
            }
            Ok(false) => {
                status.error = Some("Weaviate is not ready".to_string());
            }
            Err(e) => {
                warn!(url = %self.config.base_url(), error = %e, "Connection check failed");
                status.error = Some(e.to_string());
            }
        }

        status
    }

    // ===== Schema =====

    pub async fn list_collections(&self) -> CollectionList {
        match self.repository.list_collections().await {
            Ok(collections) => {
                let names: Vec<String> = collections.into_iter().map(|c| c.name).collect();
                CollectionList {
                    total: names.len(),
                    collections: names,
                    error: None,
                }
            }
            Err(e) => CollectionList {
                error: Some(e.to_string()),
                ..Default::default()
            },
        }
    }

    pub async fn get_schema(&self, params: SchemaParams) -> SchemaResponse {
        let result = match params.collection_name.as_deref() {
            Some(name) => self.repository.get_collection(name).await.map(|c| vec![c]),
            None => self.repository.list_collections().await,
        };

        match result {
            Ok(collections) => SchemaResponse {
                collections,
                error: None,
            },
            Err(e) => SchemaResponse {
                collections: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }

    // ===== Objects =====

    pub async fn get_collection_objects(&self, params: ObjectsParams) -> ObjectsResponse {
        let mut response = ObjectsResponse {
            results: Vec::new(),
            total: 0,
            collection_name: params.collection_name.clone(),
            limit: params.limit,
            offset: params.offset,
            tenant_id: params.tenant_id.clone(),
            error: None,
        };

        if let Err(message) = check_limit(params.limit) {
            response.error = Some(message);
            return response;
        }

        let query = ObjectsQuery {
            collection: params.collection_name,
            limit: params.limit,
            offset: params.offset,
            tenant: params.tenant_id,
        };

        match self.repository.fetch_objects(query).await {
            Ok(objects) => {
                response.total = objects.len();
                response.results = objects;
            }
            Err(e) => response.error = Some(e.to_string()),
        }

        response
    }

    // ===== Search =====

    pub async fn semantic_search(&self, params: SearchParams) -> SearchResponse {
        self.run_search(params, SearchMode::NearText).await
    }

    pub async fn keyword_search(&self, params: SearchParams) -> SearchResponse {
        self.run_search(params, SearchMode::Bm25).await
    }

    pub async fn hybrid_search(&self, params: HybridSearchParams) -> SearchResponse {
        let alpha = params.alpha;
        self.run_search(params.search, SearchMode::Hybrid { alpha }).await
    }

    /// General-purpose search: hybrid ranking weighted towards keywords
    pub async fn search(&self, params: SearchParams) -> SearchResponse {
        self.run_search(params, SearchMode::Hybrid { alpha: SEARCH_ALPHA }).await
    }

    async fn run_search(&self, params: SearchParams, mode: SearchMode) -> SearchResponse {
        let alpha = match mode {
            SearchMode::Hybrid { alpha } => Some(alpha),
            _ => None,
        };

        let mut response = SearchResponse {
            results: Vec::new(),
            total: 0,
            query: params.query.clone(),
            collection_name: params.collection_name.clone(),
            tenant_id: params.tenant_id.clone(),
            alpha,
            error: None,
        };

        if let Some(alpha) = alpha.filter(|a| !(0.0..=1.0).contains(a)) {
            response.error = Some(format!("Alpha must be between 0 and 1, got {}", alpha));
            return response;
        }
        if let Err(message) = check_limit(params.limit) {
            response.error = Some(message);
            return response;
        }

        let query = params.to_query(mode);
        debug!(collection = %query.collection, mode = ?query.mode, limit = query.limit, "Searching");

        match self.repository.search(query).await {
            Ok(hits) => {
                info!(collection = %response.collection_name, hits = hits.len(), "Search completed");
                response.total = hits.len();
                response.results = hits;
            }
            Err(e) => {
                warn!(collection = %response.collection_name, error = %e, "Search failed");
                response.error = Some(e.to_string());
            }
        }

        response
    }

    // ===== Multi-tenancy =====

    pub async fn is_multi_tenancy_enabled(&self, params: CollectionParams) -> TenancyStatus {
        match self.repository.get_collection(&params.collection_name).await {
            Ok(collection) => TenancyStatus {
                collection_name: params.collection_name,
                multi_tenancy_enabled: collection.multi_tenancy_enabled,
                error: None,
            },
            Err(e) => TenancyStatus {
                collection_name: params.collection_name,
                multi_tenancy_enabled: false,
                error: Some(e.to_string()),
            },
        }
    }

    pub async fn get_tenant_list(&self, params: CollectionParams) -> TenantList {
        let mut response = TenantList {
            collection_name: params.collection_name.clone(),
            multi_tenancy_enabled: false,
            tenants: Vec::new(),
            tenant_count: 0,
            error: None,
        };

        let collection = match self.repository.get_collection(&params.collection_name).await {
            Ok(collection) => collection,
            Err(e) => {
                response.error = Some(e.to_string());
                return response;
            }
        };

        if !collection.multi_tenancy_enabled {
            return response;
        }
        response.multi_tenancy_enabled = true;

        match self.repository.list_tenants(&collection.name).await {
            Ok(tenants) => {
                response.tenants = tenants.into_iter().map(|t| t.name).collect();
                response.tenant_count = response.tenants.len();
            }
            Err(e) => response.error = Some(e.to_string()),
        }

        response
    }
}

fn check_limit(limit: u32) -> Result<(), String> {
    if limit == 0 {
        Err("Limit must be at least 1, got 0".to_string())
    } else {
        Ok(())
    }
}
