//! Weaviate MCP Server
//!
//! An MCP (Model Context Protocol) server exposing a Weaviate instance to
//! AI agents over stdio:
//! - Sealed `Tool` trait; the eleven Weaviate tools are the only implementations
//! - Protocol version negotiation, `ping` and notifications
//! - Concurrent request handling with a single ordered writer
//! - Error context pattern for rich error information

mod error;
mod mcp;
mod tools;
mod transport;

pub use error::{Error, ErrorContext, Result};
pub use mcp::{
    EXECUTION_ERROR, INVALID_PARAMS, INVALID_REQUEST, LATEST_PROTOCOL_VERSION, METHOD_NOT_FOUND,
    McpError, McpHandler, McpRequest, McpResponse, PARSE_ERROR, SUPPORTED_PROTOCOL_VERSIONS, Tool,
    negotiate_protocol_version,
};
pub use transport::{serve, serve_stdio};
