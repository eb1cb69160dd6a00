//! Weaviate tools
//!
//! Each tool deserializes its arguments into the domain parameter type,
//! calls the service and hands the response back as JSON. Database failures
//! arrive inside the response's `error` field; only malformed arguments fail
//! the call itself.

use async_trait::async_trait;
use domain_weaviate::{
    CollectionParams, DEFAULT_HYBRID_ALPHA, DEFAULT_OBJECTS_LIMIT, DEFAULT_SEARCH_LIMIT,
    HybridSearchParams, ObjectsParams, SchemaParams, SearchParams, WeaviateRepository,
    WeaviateService,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::error::{Error, ErrorContext, Result};
use crate::mcp::{Tool, sealed};

/// Every tool this server exposes, sharing one service
pub(crate) fn weaviate_tools<R: WeaviateRepository + 'static>(
    service: Arc<WeaviateService<R>>,
) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(GetConfigTool {
            service: Arc::clone(&service),
        }),
        Box::new(CheckConnectionTool {
            service: Arc::clone(&service),
        }),
        Box::new(ListCollectionsTool {
            service: Arc::clone(&service),
        }),
        Box::new(GetSchemaTool {
            service: Arc::clone(&service),
        }),
        Box::new(GetCollectionObjectsTool {
            service: Arc::clone(&service),
        }),
        Box::new(SemanticSearchTool {
            service: Arc::clone(&service),
        }),
        Box::new(KeywordSearchTool {
            service: Arc::clone(&service),
        }),
        Box::new(HybridSearchTool {
            service: Arc::clone(&service),
        }),
        Box::new(SearchTool {
            service: Arc::clone(&service),
        }),
        Box::new(IsMultiTenancyEnabledTool {
            service: Arc::clone(&service),
        }),
        Box::new(GetTenantListTool { service }),
    ]
}

fn parse_args<T: DeserializeOwned>(tool: &str, params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|source| Error::InvalidParams {
        tool: tool.to_string(),
        source,
    })
}

fn to_json<T: Serialize>(tool: &str, response: T) -> Result<Value> {
    serde_json::to_value(response).with_context(format!("{} response", tool))
}

fn no_arguments_schema() -> Value {
    json!({
        "type": "object",
        "properties": {}
    })
}

fn collection_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "collection_name": {
                "type": "string",
                "description": "Name of the collection"
            }
        },
        "required": ["collection_name"]
    })
}

fn search_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "Search query text"
            },
            "collection_name": {
                "type": "string",
                "description": "Name of the collection to search"
            },
            "limit": {
                "type": "integer",
                "description": format!("Maximum number of results (default: {})", DEFAULT_SEARCH_LIMIT),
                "default": DEFAULT_SEARCH_LIMIT,
                "minimum": 1
            },
            "tenant_id": {
                "type": "string",
                "description": "Tenant to search in, for multi-tenant collections"
            }
        },
        "required": ["query", "collection_name"]
    })
}

// ============================================================================
// Configuration & connection
// ============================================================================

pub struct GetConfigTool<R: WeaviateRepository> {
    service: Arc<WeaviateService<R>>,
}

impl<R: WeaviateRepository> sealed::Sealed for GetConfigTool<R> {}

#[async_trait]
impl<R: WeaviateRepository + 'static> Tool for GetConfigTool<R> {
    fn name(&self) -> &'static str {
        "get_config"
    }

    fn description(&self) -> &'static str {
        "Returns the current Weaviate connection configuration. API keys and header values are masked."
    }

    fn input_schema(&self) -> Value {
        no_arguments_schema()
    }

    async fn execute(&self, _params: Value) -> Result<Value> {
        to_json(self.name(), self.service.get_config())
    }
}

pub struct CheckConnectionTool<R: WeaviateRepository> {
    service: Arc<WeaviateService<R>>,
}

impl<R: WeaviateRepository> sealed::Sealed for CheckConnectionTool<R> {}

#[async_trait]
impl<R: WeaviateRepository + 'static> Tool for CheckConnectionTool<R> {
    fn name(&self) -> &'static str {
        "check_connection"
    }

    fn description(&self) -> &'static str {
        "Checks whether the Weaviate instance is reachable and ready. Returns the connection target and server version."
    }

    fn input_schema(&self) -> Value {
        no_arguments_schema()
    }

    async fn execute(&self, _params: Value) -> Result<Value> {
        to_json(self.name(), self.service.check_connection().await)
    }
}

// ============================================================================
// Schema
// ============================================================================

pub struct ListCollectionsTool<R: WeaviateRepository> {
    service: Arc<WeaviateService<R>>,
}

impl<R: WeaviateRepository> sealed::Sealed for ListCollectionsTool<R> {}

#[async_trait]
impl<R: WeaviateRepository + 'static> Tool for ListCollectionsTool<R> {
    fn name(&self) -> &'static str {
        "list_collections"
    }

    fn description(&self) -> &'static str {
        "Lists the names of all collections in the Weaviate instance."
    }

    fn input_schema(&self) -> Value {
        no_arguments_schema()
    }

    async fn execute(&self, _params: Value) -> Result<Value> {
        to_json(self.name(), self.service.list_collections().await)
    }
}

pub struct GetSchemaTool<R: WeaviateRepository> {
    service: Arc<WeaviateService<R>>,
}

impl<R: WeaviateRepository> sealed::Sealed for GetSchemaTool<R> {}

#[async_trait]
impl<R: WeaviateRepository + 'static> Tool for GetSchemaTool<R> {
    fn name(&self) -> &'static str {
        "get_schema"
    }

    fn description(&self) -> &'static str {
        "Returns the schema of one collection, or of all collections when no name is given: properties, data types, vectorizer and multi-tenancy setting."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "collection_name": {
                    "type": "string",
                    "description": "Collection to describe; omit for all collections"
                }
            }
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let params: SchemaParams = parse_args(self.name(), params)?;
        to_json(self.name(), self.service.get_schema(params).await)
    }
}

// ============================================================================
// Objects
// ============================================================================

pub struct GetCollectionObjectsTool<R: WeaviateRepository> {
    service: Arc<WeaviateService<R>>,
}

impl<R: WeaviateRepository> sealed::Sealed for GetCollectionObjectsTool<R> {}

#[async_trait]
impl<R: WeaviateRepository + 'static> Tool for GetCollectionObjectsTool<R> {
    fn name(&self) -> &'static str {
        "get_collection_objects"
    }

    fn description(&self) -> &'static str {
        "Pages through the objects stored in a collection without ranking."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "collection_name": {
                    "type": "string",
                    "description": "Name of the collection"
                },
                "limit": {
                    "type": "integer",
                    "description": format!("Maximum number of objects (default: {})", DEFAULT_OBJECTS_LIMIT),
                    "default": DEFAULT_OBJECTS_LIMIT,
                    "minimum": 1
                },
                "offset": {
                    "type": "integer",
                    "description": "Number of objects to skip (default: 0)",
                    "default": 0,
                    "minimum": 0
                },
                "tenant_id": {
                    "type": "string",
                    "description": "Tenant to read from, for multi-tenant collections"
                }
            },
            "required": ["collection_name"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let params: ObjectsParams = parse_args(self.name(), params)?;
        to_json(self.name(), self.service.get_collection_objects(params).await)
    }
}

// ============================================================================
// Search
// ============================================================================

pub struct SemanticSearchTool<R: WeaviateRepository> {
    service: Arc<WeaviateService<R>>,
}

impl<R: WeaviateRepository> sealed::Sealed for SemanticSearchTool<R> {}

#[async_trait]
impl<R: WeaviateRepository + 'static> Tool for SemanticSearchTool<R> {
    fn name(&self) -> &'static str {
        "semantic_search"
    }

    fn description(&self) -> &'static str {
        "Vector similarity search using the collection's vectorizer. Best for conceptual queries."
    }

    fn input_schema(&self) -> Value {
        search_schema()
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let params: SearchParams = parse_args(self.name(), params)?;
        to_json(self.name(), self.service.semantic_search(params).await)
    }
}

pub struct KeywordSearchTool<R: WeaviateRepository> {
    service: Arc<WeaviateService<R>>,
}

impl<R: WeaviateRepository> sealed::Sealed for KeywordSearchTool<R> {}

#[async_trait]
impl<R: WeaviateRepository + 'static> Tool for KeywordSearchTool<R> {
    fn name(&self) -> &'static str {
        "keyword_search"
    }

    fn description(&self) -> &'static str {
        "BM25 keyword search. Best for exact terms, names and identifiers."
    }

    fn input_schema(&self) -> Value {
        search_schema()
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let params: SearchParams = parse_args(self.name(), params)?;
        to_json(self.name(), self.service.keyword_search(params).await)
    }
}

pub struct HybridSearchTool<R: WeaviateRepository> {
    service: Arc<WeaviateService<R>>,
}

impl<R: WeaviateRepository> sealed::Sealed for HybridSearchTool<R> {}

#[async_trait]
impl<R: WeaviateRepository + 'static> Tool for HybridSearchTool<R> {
    fn name(&self) -> &'static str {
        "hybrid_search"
    }

    fn description(&self) -> &'static str {
        "Combines vector and keyword search. alpha weights the two: 1 is pure vector, 0 is pure keyword."
    }

    fn input_schema(&self) -> Value {
        let mut schema = search_schema();
        schema["properties"]["alpha"] = json!({
            "type": "number",
            "description": format!("Vector vs keyword weight between 0 and 1 (default: {})", DEFAULT_HYBRID_ALPHA),
            "default": DEFAULT_HYBRID_ALPHA,
            "minimum": 0,
            "maximum": 1
        });
        schema
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let params: HybridSearchParams = parse_args(self.name(), params)?;
        to_json(self.name(), self.service.hybrid_search(params).await)
    }
}

pub struct SearchTool<R: WeaviateRepository> {
    service: Arc<WeaviateService<R>>,
}

impl<R: WeaviateRepository> sealed::Sealed for SearchTool<R> {}

#[async_trait]
impl<R: WeaviateRepository + 'static> Tool for SearchTool<R> {
    fn name(&self) -> &'static str {
        "search"
    }

    fn description(&self) -> &'static str {
        "General-purpose search. Runs a hybrid search weighted towards keyword matches (alpha 0.3)."
    }

    fn input_schema(&self) -> Value {
        search_schema()
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let params: SearchParams = parse_args(self.name(), params)?;
        to_json(self.name(), self.service.search(params).await)
    }
}

// ============================================================================
// Multi-tenancy
// ============================================================================

pub struct IsMultiTenancyEnabledTool<R: WeaviateRepository> {
    service: Arc<WeaviateService<R>>,
}

impl<R: WeaviateRepository> sealed::Sealed for IsMultiTenancyEnabledTool<R> {}

#[async_trait]
impl<R: WeaviateRepository + 'static> Tool for IsMultiTenancyEnabledTool<R> {
    fn name(&self) -> &'static str {
        "is_multi_tenancy_enabled"
    }

    fn description(&self) -> &'static str {
        "Reports whether a collection is configured for multi-tenancy."
    }

    fn input_schema(&self) -> Value {
        collection_schema()
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let params: CollectionParams = parse_args(self.name(), params)?;
        to_json(self.name(), self.service.is_multi_tenancy_enabled(params).await)
    }
}

pub struct GetTenantListTool<R: WeaviateRepository> {
    service: Arc<WeaviateService<R>>,
}

impl<R: WeaviateRepository> sealed::Sealed for GetTenantListTool<R> {}

#[async_trait]
impl<R: WeaviateRepository + 'static> Tool for GetTenantListTool<R> {
    fn name(&self) -> &'static str {
        "get_tenant_list"
    }

    fn description(&self) -> &'static str {
        "Lists the tenants of a multi-tenant collection. Returns an empty list for collections without multi-tenancy."
    }

    fn input_schema(&self) -> Value {
        collection_schema()
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let params: CollectionParams = parse_args(self.name(), params)?;
        to_json(self.name(), self.service.get_tenant_list(params).await)
    }
}
