#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain_weaviate::{
    CollectionSchema, ObjectsQuery, PropertySchema, SearchHit, SearchQuery, ServerMeta,
    StoredObject, Tenant, WeaviateConfig, WeaviateError, WeaviateRepository, WeaviateResult,
    WeaviateService,
};
use serde_json::{Map, json};
use weaviate_mcp::McpHandler;

/// In-memory repository recording the searches it receives
#[derive(Default)]
pub struct FakeRepository {
    pub offline: bool,
    pub searches: Mutex<Vec<SearchQuery>>,
}

impl FakeRepository {
    fn collections() -> Vec<CollectionSchema> {
        vec![
            CollectionSchema::new("Article")
                .with_property(PropertySchema::new("title", "text"))
                .with_multi_tenancy(true),
            CollectionSchema::new("Product").with_property(PropertySchema::new("name", "text")),
        ]
    }

    fn check_online(&self) -> WeaviateResult<()> {
        if self.offline {
            Err(WeaviateError::Connection("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl WeaviateRepository for FakeRepository {
    async fn is_ready(&self) -> WeaviateResult<bool> {
        self.check_online()?;
        Ok(true)
    }

    async fn meta(&self) -> WeaviateResult<ServerMeta> {
        self.check_online()?;
        Ok(ServerMeta {
            version: Some("1.25.0".to_string()),
        })
    }

    async fn list_collections(&self) -> WeaviateResult<Vec<CollectionSchema>> {
        self.check_online()?;
        Ok(Self::collections())
    }

    async fn get_collection(&self, name: &str) -> WeaviateResult<CollectionSchema> {
        self.check_online()?;
        Self::collections()
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| WeaviateError::CollectionNotFound(name.to_string()))
    }

    async fn list_tenants(&self, _collection: &str) -> WeaviateResult<Vec<Tenant>> {
        self.check_online()?;
        Ok(vec![Tenant {
            name: "tenant1".to_string(),
            activity_status: Some("HOT".to_string()),
        }])
    }

    async fn fetch_objects(&self, query: ObjectsQuery) -> WeaviateResult<Vec<StoredObject>> {
        self.check_online()?;
        Ok((0..query.limit.min(3))
            .map(|i| {
                let mut properties = Map::new();
                properties.insert("title".to_string(), json!(format!("Object {}", i)));
                StoredObject {
                    id: format!("obj-{}", i),
                    properties,
                }
            })
            .collect())
    }

    async fn search(&self, query: SearchQuery) -> WeaviateResult<Vec<SearchHit>> {
        self.check_online()?;
        self.get_collection(&query.collection).await?;
        self.searches.lock().unwrap().push(query.clone());

        let mut properties = Map::new();
        properties.insert("title".to_string(), json!("Machine learning basics"));
        Ok(vec![SearchHit {
            id: "uuid-1".to_string(),
            collection: query.collection,
            properties,
            score: Some(0.95),
            distance: None,
            certainty: None,
        }])
    }
}

pub fn handler_with(repository: FakeRepository) -> (McpHandler, Arc<WeaviateService<FakeRepository>>) {
    let service = Arc::new(WeaviateService::new(
        Arc::new(WeaviateConfig::local("localhost", 8080, 50051)),
        repository,
    ));
    (McpHandler::new(Arc::clone(&service)), service)
}

pub fn handler() -> McpHandler {
    handler_with(FakeRepository::default()).0
}
