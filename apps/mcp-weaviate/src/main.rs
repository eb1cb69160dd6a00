//! Weaviate MCP Server - Entry Point
//!
//! Minimal entry point that delegates to the server module.

fn main() -> eyre::Result<()> {
    mcp_weaviate::run_blocking()
}
