//! Weaviate MCP Server
//!
//! Exposes a Weaviate instance to AI agents as MCP tools over stdio.
//!
//! ## Architecture
//!
//! ```text
//! MCP host (Claude Desktop, IDE, ...)
//!   ↓ (JSON-RPC over stdin/stdout)
//! McpHandler (weaviate-mcp)
//!   ↓ (tool arguments → domain parameters)
//! WeaviateService (domain layer)
//!   ↓
//! HttpWeaviateRepository
//!   ↓ (REST + GraphQL)
//! Weaviate
//! ```
//!
//! ## Configuration
//!
//! `WEAVIATE_*` environment variables, overridden by command-line flags.
//! A `.env` file (or the one named by `--env-file`) fills in variables that
//! are not already set.
//! See `mcp-weaviate --help`.

mod cli;
mod server;

pub use cli::Cli;
pub use server::{run, run_blocking};
