use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::WeaviateConfig;
use crate::conversions::{
    WireClass, WireGraphQlResponse, WireMeta, WireObjectList, WireSchema, WireTenant,
};
use crate::error::{WeaviateError, WeaviateResult};
use crate::graphql::{build_search_query, parse_hits, validate_collection_name};
use crate::models::{
    CollectionSchema, ObjectsQuery, SearchHit, SearchQuery, ServerMeta, StoredObject, Tenant,
};
use crate::repository::WeaviateRepository;

const USER_AGENT: &str = concat!("mcp-weaviate/", env!("CARGO_PKG_VERSION"));
const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Weaviate repository over the REST and GraphQL endpoints
pub struct HttpWeaviateRepository {
    client: Client,
    base_url: String,
}

impl HttpWeaviateRepository {
    pub fn new(config: &WeaviateConfig) -> WeaviateResult<Self> {
        let mut headers = HeaderMap::new();

        for (name, value) in config.headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                WeaviateError::InvalidArgument(format!("Invalid header name '{}': {}", name, e))
            })?;
            let mut header_value = HeaderValue::from_str(&value).map_err(|e| {
                WeaviateError::InvalidArgument(format!("Invalid value for header '{}': {}", name, e))
            })?;
            header_value.set_sensitive(true);
            headers.insert(header_name, header_value);
        }

        if let Some(api_key) = config.api_key() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                WeaviateError::InvalidArgument(format!("Invalid API key: {}", e))
            })?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT);

        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.query_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| WeaviateError::Connection(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Poll the readiness endpoint until it succeeds or `period` elapses.
    /// A zero period still checks once. A period too large to represent
    /// waits without a deadline.
    pub async fn wait_until_ready(&self, period: Duration) -> bool {
        let deadline = Instant::now().checked_add(period);

        loop {
            let ready = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, self.is_ready()).await,
                None => Ok(self.is_ready().await),
            };
            match ready {
                Ok(Ok(true)) => return true,
                Ok(Ok(false)) => debug!(url = %self.base_url, "Weaviate not ready yet"),
                Ok(Err(e)) => debug!(url = %self.base_url, error = %e, "Readiness check failed"),
                Err(_) => debug!(url = %self.base_url, "Readiness check timed out"),
            }

            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    READY_POLL_INTERVAL.min(deadline - now)
                }
                None => READY_POLL_INTERVAL,
            };
            tokio::time::sleep(pause).await;
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn collection_path(collection: &str) -> String {
        format!("/v1/schema/{}", urlencoding::encode(collection))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> WeaviateResult<T> {
        debug!(path, "GET");
        let response = self.client.get(self.url(path)).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

/// Turn non-2xx responses into `WeaviateError::Status`, keeping the body
async fn check_status(response: Response) -> WeaviateResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(WeaviateError::Status {
        status: status.as_u16(),
        body,
    })
}

fn not_found_as(collection: &str, err: WeaviateError) -> WeaviateError {
    match err {
        WeaviateError::Status { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
            WeaviateError::CollectionNotFound(collection.to_string())
        }
        other => other,
    }
}

#[async_trait]
impl WeaviateRepository for HttpWeaviateRepository {
    async fn is_ready(&self) -> WeaviateResult<bool> {
        let response = self
            .client
            .get(self.url("/v1/.well-known/ready"))
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    async fn meta(&self) -> WeaviateResult<ServerMeta> {
        let meta: WireMeta = self.get_json("/v1/meta").await?;
        Ok(meta.into())
    }

    async fn list_collections(&self) -> WeaviateResult<Vec<CollectionSchema>> {
        let schema: WireSchema = self.get_json("/v1/schema").await?;
        Ok(schema.classes.into_iter().map(Into::into).collect())
    }

    async fn get_collection(&self, name: &str) -> WeaviateResult<CollectionSchema> {
        let class: WireClass = self
            .get_json(&Self::collection_path(name))
            .await
            .map_err(|e| not_found_as(name, e))?;
        Ok(class.into())
    }

    async fn list_tenants(&self, collection: &str) -> WeaviateResult<Vec<Tenant>> {
        let path = format!("{}/tenants", Self::collection_path(collection));
        let tenants: Vec<WireTenant> = self
            .get_json(&path)
            .await
            .map_err(|e| not_found_as(collection, e))?;
        Ok(tenants.into_iter().map(Into::into).collect())
    }

    async fn fetch_objects(&self, query: ObjectsQuery) -> WeaviateResult<Vec<StoredObject>> {
        let mut params = vec![
            ("class", query.collection.clone()),
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ];
        if let Some(tenant) = &query.tenant {
            params.push(("tenant", tenant.clone()));
        }

        debug!(collection = %query.collection, limit = query.limit, offset = query.offset, "GET /v1/objects");
        let response = self
            .client
            .get(self.url("/v1/objects"))
            .query(&params)
            .send()
            .await?;
        let response = check_status(response)
            .await
            .map_err(|e| not_found_as(&query.collection, e))?;
        let list: WireObjectList = response.json().await?;

        Ok(list
            .objects
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn search(&self, query: SearchQuery) -> WeaviateResult<Vec<SearchHit>> {
        validate_collection_name(&query.collection)?;

        // GraphQL needs the canonical class name and an explicit selection set
        let schema = self.get_collection(&query.collection).await?;
        let graphql = build_search_query(&schema.name, &query, &schema.scalar_property_names())?;

        debug!(collection = %schema.name, mode = ?query.mode, "POST /v1/graphql");
        let response = self
            .client
            .post(self.url("/v1/graphql"))
            .json(&json!({ "query": graphql }))
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: WireGraphQlResponse = response.json().await?;

        if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            warn!(collection = %schema.name, errors = ?messages, "GraphQL search failed");
            return Err(WeaviateError::GraphQl(messages));
        }

        parse_hits(&schema.name, body.data.unwrap_or(Value::Null))
    }
}
