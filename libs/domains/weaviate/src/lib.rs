//! Weaviate Domain Library
//!
//! Read-only access to a Weaviate instance, shaped into the responses the
//! MCP tools hand back to an agent.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │   WeaviateService    │  ← Parameter checks, response shaping
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐
//! │  WeaviateRepository  │
//! │       (trait)        │
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐
//! │HttpWeaviateRepository│  ← REST + GraphQL over reqwest
//! └──────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use core_config::FromEnv;
//! use domain_weaviate::{HttpWeaviateRepository, SearchParams, WeaviateService, WeaviateSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(WeaviateSettings::from_env()?.validate()?);
//! let repository = HttpWeaviateRepository::new(&config)?;
//! let service = WeaviateService::new(config, repository);
//!
//! let response = service
//!     .hybrid_search(domain_weaviate::HybridSearchParams {
//!         search: SearchParams::new("machine learning", "Article").with_limit(3),
//!         alpha: 0.7,
//!     })
//!     .await;
//! println!("{} hits", response.total);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod conversions;
pub mod error;
pub mod graphql;
pub mod models;
pub mod repository;
pub mod service;

pub use client::HttpWeaviateRepository;
pub use config::{
    ConfigSummary, Connection, ConnectionType, SettingsError, WeaviateConfig, WeaviateSettings,
};
pub use error::{WeaviateError, WeaviateResult};
pub use models::*;
pub use repository::WeaviateRepository;
pub use service::WeaviateService;
