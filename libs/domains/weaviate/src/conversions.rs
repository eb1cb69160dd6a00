//! Weaviate REST payloads and their conversion into domain models
//!
//! Only the fields this server reads are declared; everything else in the
//! payloads is ignored by serde.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::{CollectionSchema, PropertySchema, ServerMeta, StoredObject, Tenant};

#[derive(Debug, Deserialize)]
pub struct WireSchema {
    #[serde(default)]
    pub classes: Vec<WireClass>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireClass {
    pub class: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: Option<Vec<WireProperty>>,
    #[serde(default)]
    pub multi_tenancy_config: Option<WireMultiTenancyConfig>,
    #[serde(default)]
    pub vectorizer: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProperty {
    pub name: String,
    #[serde(default)]
    pub data_type: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireMultiTenancyConfig {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTenant {
    pub name: String,
    #[serde(default)]
    pub activity_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireObjectList {
    #[serde(default)]
    pub objects: Option<Vec<WireObject>>,
}

#[derive(Debug, Deserialize)]
pub struct WireObject {
    pub id: String,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub struct WireMeta {
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireGraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<WireGraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct WireGraphQlError {
    pub message: String,
}

impl From<WireClass> for CollectionSchema {
    fn from(class: WireClass) -> Self {
        CollectionSchema {
            name: class.class,
            description: class.description.filter(|d| !d.is_empty()),
            properties: class
                .properties
                .unwrap_or_default()
                .into_iter()
                .map(PropertySchema::from)
                .collect(),
            multi_tenancy_enabled: class.multi_tenancy_config.is_some_and(|c| c.enabled),
            vectorizer: class.vectorizer,
        }
    }
}

impl From<WireProperty> for PropertySchema {
    fn from(property: WireProperty) -> Self {
        PropertySchema {
            name: property.name,
            data_type: property.data_type,
            description: property.description.filter(|d| !d.is_empty()),
        }
    }
}

impl From<WireTenant> for Tenant {
    fn from(tenant: WireTenant) -> Self {
        Tenant {
            name: tenant.name,
            activity_status: tenant.activity_status,
        }
    }
}

impl From<WireObject> for StoredObject {
    fn from(object: WireObject) -> Self {
        StoredObject {
            id: object.id,
            properties: object.properties.unwrap_or_default(),
        }
    }
}

impl From<WireMeta> for ServerMeta {
    fn from(meta: WireMeta) -> Self {
        ServerMeta {
            version: meta.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_class_conversion() {
        let wire: WireClass = serde_json::from_value(json!({
            "class": "Article",
            "description": "News articles",
            "vectorizer": "text2vec-openai",
            "multiTenancyConfig": { "enabled": true, "autoTenantCreation": false },
            "properties": [
                { "name": "title", "dataType": ["text"], "description": "Article title" },
                { "name": "content", "dataType": ["text"], "description": "" }
            ],
            "vectorIndexConfig": { "distance": "cosine" }
        }))
        .unwrap();

        let schema = CollectionSchema::from(wire);

        assert_eq!(schema.name, "Article");
        assert_eq!(schema.description.as_deref(), Some("News articles"));
        assert!(schema.multi_tenancy_enabled);
        assert_eq!(schema.vectorizer.as_deref(), Some("text2vec-openai"));
        assert_eq!(schema.properties.len(), 2);
        assert_eq!(schema.properties[0].description.as_deref(), Some("Article title"));
        assert_eq!(schema.properties[1].description, None);
        assert_eq!(schema.properties[1].data_type, vec!["text"]);
    }

    #[test]
    fn test_class_without_optional_sections() {
        let wire: WireClass = serde_json::from_value(json!({ "class": "Empty" })).unwrap();
        let schema = CollectionSchema::from(wire);

        assert!(schema.properties.is_empty());
        assert!(!schema.multi_tenancy_enabled);
    }

    #[test]
    fn test_object_list_with_null_objects() {
        let list: WireObjectList = serde_json::from_value(json!({ "objects": null })).unwrap();
        assert!(list.objects.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_object_conversion() {
        let wire: WireObject = serde_json::from_value(json!({
            "class": "Article",
            "id": "obj-1",
            "properties": { "title": "Object 1" },
            "creationTimeUnix": 1700000000000u64
        }))
        .unwrap();

        let object = StoredObject::from(wire);
        assert_eq!(object.id, "obj-1");
        assert_eq!(object.properties["title"], "Object 1");
    }
}
