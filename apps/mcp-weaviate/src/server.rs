//! Server initialization and lifecycle management
//!
//! This module handles all server setup:
//! - Error reporting and tracing initialization
//! - Configuration from environment and flags
//! - Weaviate client creation and readiness wait
//! - MCP handler creation and the stdio loop

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv, load_dotenv};
use domain_weaviate::{HttpWeaviateRepository, WeaviateService, WeaviateSettings};
use eyre::{Result, WrapErr};
use tracing::{info, warn};
use weaviate_mcp::{McpHandler, serve_stdio};

use crate::cli::Cli;

/// How long tasks still blocked at exit (the stdin reader) may delay it
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Run the server on its own multi-threaded runtime and return once it stops.
///
/// tokio reads stdin on a blocking thread that cannot be interrupted, so the
/// runtime is shut down with a grace period instead of waiting for that read.
pub fn run_blocking() -> Result<()> {
    block_on_with_grace(run())
}

fn block_on_with_grace<F>(future: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("Failed to start the async runtime")?;

    let result = runtime.block_on(future);
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

/// Run the MCP server
///
/// 1. Loads `.env`, then sets up error reporting and logging to stderr
/// 2. Merges `WEAVIATE_*` settings with command-line flags and validates them
/// 3. Builds the Weaviate client and waits up to the startup period for readiness
/// 4. Serves MCP requests on stdin/stdout until EOF or Ctrl-C
///
/// # Errors
///
/// Returns an error if:
/// - The environment file cannot be read
/// - Configuration is missing or invalid
/// - The HTTP client cannot be built
/// - Reading stdin or writing stdout fails
pub async fn run() -> Result<()> {
    install_color_eyre();
    let cli = Cli::parse();

    let env_file = load_dotenv(cli.env_file.as_deref())?;

    let environment = Environment::from_env();
    init_tracing(&environment);

    if let Some(path) = &env_file {
        info!(path = %path.display(), "Loaded environment file");
    }

    let settings = WeaviateSettings::from_env()
        .wrap_err("Failed to read Weaviate settings from environment")?
        .merge(cli.into_settings());
    let config = Arc::new(settings.validate()?);

    info!(
        connection_type = %config.connection_type(),
        url = %config.base_url(),
        grpc = %config.grpc_target(),
        "Starting Weaviate MCP server"
    );

    let repository =
        HttpWeaviateRepository::new(&config).wrap_err("Failed to create Weaviate client")?;

    let startup_period = config.startup_period();
    if repository.wait_until_ready(startup_period).await {
        info!("Weaviate is ready");
    } else {
        warn!(
            url = %config.base_url(),
            waited_secs = startup_period.as_secs(),
            "Weaviate is not ready yet; tools will report connection errors until it is"
        );
    }

    let service = Arc::new(WeaviateService::new(Arc::clone(&config), repository));
    let handler = Arc::new(McpHandler::new(service));

    info!("Serving MCP on stdio");
    serve_stdio(handler).await.wrap_err("MCP transport failed")?;

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_env_file_feeds_settings() {
        let path =
            std::env::temp_dir().join(format!("mcp-weaviate-settings-{}.env", std::process::id()));
        std::fs::write(&path, "WEAVIATE_HOST=weaviate.internal\nWEAVIATE_PORT=9090\n").unwrap();

        let settings = temp_env::with_vars_unset(["WEAVIATE_HOST", "WEAVIATE_PORT"], || {
            assert_eq!(load_dotenv(Some(&path)).unwrap().as_deref(), Some(path.as_path()));
            WeaviateSettings::from_env().unwrap()
        });
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.host.as_deref(), Some("weaviate.internal"));
        assert_eq!(settings.port, Some(9090));
    }

    #[test]
    fn test_runtime_exit_does_not_wait_for_blocking_reads() {
        let started = Instant::now();

        let result = block_on_with_grace(async {
            // stands in for tokio's stdin reader parked in read(2)
            tokio::task::spawn_blocking(|| std::thread::sleep(Duration::from_secs(30)));
            Ok(())
        });

        assert!(result.is_ok());
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_runtime_returns_the_server_error() {
        let result = block_on_with_grace(async { Err(eyre::eyre!("transport failed")) });
        assert_eq!(result.unwrap_err().to_string(), "transport failed");
    }
}
