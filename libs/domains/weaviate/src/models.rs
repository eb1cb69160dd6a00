use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{Connection, ConnectionType, WeaviateConfig};

pub const DEFAULT_SEARCH_LIMIT: u32 = 5;
pub const DEFAULT_OBJECTS_LIMIT: u32 = 10;
pub const DEFAULT_HYBRID_ALPHA: f64 = 0.5;
/// Alpha used by the general-purpose `search` tool, leaning towards keyword matching
pub const SEARCH_ALPHA: f64 = 0.3;

/// Data types whose values can be selected in a GraphQL `Get` without a
/// sub-selection
const SCALAR_DATA_TYPES: &[&str] = &[
    "text", "text[]", "string", "string[]", "int", "int[]", "number", "number[]", "boolean",
    "boolean[]", "date", "date[]", "uuid", "uuid[]", "blob",
];

// ===== Schema =====

/// A collection (class) as defined in the Weaviate schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub properties: Vec<PropertySchema>,
    pub multi_tenancy_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vectorizer: Option<String>,
}

impl CollectionSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            properties: Vec::new(),
            multi_tenancy_enabled: false,
            vectorizer: None,
        }
    }

    pub fn with_property(mut self, property: PropertySchema) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_multi_tenancy(mut self, enabled: bool) -> Self {
        self.multi_tenancy_enabled = enabled;
        self
    }

    /// Names of the properties a search can return directly
    pub fn scalar_property_names(&self) -> Vec<String> {
        self.properties
            .iter()
            .filter(|p| p.is_scalar())
            .map(|p| p.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub name: String,
    pub data_type: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertySchema {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: vec![data_type.into()],
            description: None,
        }
    }

    /// Cross-references (capitalized class names) and nested objects need
    /// sub-selections and are left out of search results.
    pub fn is_scalar(&self) -> bool {
        match self.data_type.as_slice() {
            [single] => SCALAR_DATA_TYPES.contains(&single.as_str()),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerMeta {
    pub version: Option<String>,
}

// ===== Objects & search hits =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub id: String,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub collection: String,
    pub properties: Map<String, Value>,
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certainty: Option<f64>,
}

// ===== Repository queries =====

/// How Weaviate should rank results
#[derive(Debug, Clone, PartialEq)]
pub enum SearchMode {
    /// Vector similarity against the vectorized query (`nearText`)
    NearText,
    /// BM25 keyword ranking
    Bm25,
    /// Fusion of both; `alpha = 1` is pure vector, `alpha = 0` pure keyword
    Hybrid { alpha: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub collection: String,
    pub query: String,
    pub mode: SearchMode,
    pub limit: u32,
    pub tenant: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectsQuery {
    pub collection: String,
    pub limit: u32,
    pub offset: u32,
    pub tenant: Option<String>,
}

// ===== Tool parameters =====

fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

fn default_objects_limit() -> u32 {
    DEFAULT_OBJECTS_LIMIT
}

fn default_hybrid_alpha() -> f64 {
    DEFAULT_HYBRID_ALPHA
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub collection_name: String,
    #[serde(default = "default_search_limit")]
    pub limit: u32,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>, collection_name: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            collection_name: collection_name.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            tenant_id: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub(crate) fn to_query(&self, mode: SearchMode) -> SearchQuery {
        SearchQuery {
            collection: self.collection_name.clone(),
            query: self.query.clone(),
            mode,
            limit: self.limit,
            tenant: self.tenant_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HybridSearchParams {
    #[serde(flatten)]
    pub search: SearchParams,
    #[serde(default = "default_hybrid_alpha")]
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectsParams {
    pub collection_name: String,
    #[serde(default = "default_objects_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

impl ObjectsParams {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            limit: DEFAULT_OBJECTS_LIMIT,
            offset: 0,
            tenant_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollectionParams {
    pub collection_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaParams {
    #[serde(default)]
    pub collection_name: Option<String>,
}

// ===== Tool responses =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub connection_type: ConnectionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grpc_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionStatus {
    /// Not-yet-connected status describing the configured target
    pub fn for_config(config: &WeaviateConfig) -> Self {
        let mut status = Self {
            connected: false,
            connection_type: config.connection_type(),
            host: None,
            port: None,
            grpc_port: None,
            cluster_url: None,
            version: None,
            error: None,
        };
        match &config.connection {
            Connection::Local {
                host,
                port,
                grpc_port,
            } => {
                status.host = Some(host.clone());
                status.port = Some(*port);
                status.grpc_port = Some(*grpc_port);
            }
            Connection::Cloud { cluster_url, .. } => {
                status.cluster_url = Some(cluster_url.clone());
            }
        }
        status
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionList {
    pub collections: Vec<String>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaResponse {
    pub collections: Vec<CollectionSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectsResponse {
    pub results: Vec<StoredObject>,
    pub total: usize,
    pub collection_name: String,
    pub limit: u32,
    pub offset: u32,
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub total: usize,
    pub query: String,
    pub collection_name: String,
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenancyStatus {
    pub collection_name: String,
    pub multi_tenancy_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantList {
    pub collection_name: String,
    pub multi_tenancy_enabled: bool,
    pub tenants: Vec<String>,
    pub tenant_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
