use std::path::PathBuf;

use clap::Parser;
use domain_weaviate::WeaviateSettings;

/// Command-line flags. Each one overrides the matching `WEAVIATE_*`
/// environment variable.
#[derive(Debug, Parser)]
#[command(name = "mcp-weaviate", version)]
#[command(about = "MCP server giving AI agents read access to a Weaviate vector database")]
pub struct Cli {
    /// Connection type: local or cloud (default: local)
    #[arg(long)]
    pub connection_type: Option<String>,

    /// Weaviate host for local connections (default: localhost)
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP port for local connections (default: 8080)
    #[arg(long)]
    pub port: Option<u16>,

    /// gRPC port for local connections (default: 50051)
    #[arg(long)]
    pub grpc_port: Option<u16>,

    /// Cluster URL for cloud connections
    #[arg(long)]
    pub cluster_url: Option<String>,

    /// API key for cloud connections
    #[arg(long)]
    pub api_key: Option<String>,

    /// Connect timeout in seconds, 0 disables (default: 30)
    #[arg(long)]
    pub timeout_init: Option<u64>,

    /// Query timeout in seconds, 0 disables (default: 60)
    #[arg(long)]
    pub timeout_query: Option<u64>,

    /// Insert timeout in seconds, 0 disables (default: 120)
    #[arg(long)]
    pub timeout_insert: Option<u64>,

    /// Seconds to wait for Weaviate to become ready at startup (default: 5)
    #[arg(long)]
    pub startup_period: Option<u64>,

    /// OpenAI API key for text2vec-openai / generative-openai modules
    #[arg(long)]
    pub openai_api_key: Option<String>,

    /// Cohere API key for text2vec-cohere / reranker-cohere modules
    #[arg(long)]
    pub cohere_api_key: Option<String>,

    /// Environment file to load instead of `.env` in the working directory
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Extra header sent with every request, as NAME=VALUE. Repeatable.
    #[arg(long = "header", value_name = "NAME=VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
}

impl Cli {
    pub fn into_settings(self) -> WeaviateSettings {
        WeaviateSettings {
            connection_type: self.connection_type,
            host: self.host,
            port: self.port,
            grpc_port: self.grpc_port,
            cluster_url: self.cluster_url,
            api_key: self.api_key,
            timeout_init: self.timeout_init,
            timeout_query: self.timeout_query,
            timeout_insert: self.timeout_insert,
            startup_period: self.startup_period,
            openai_api_key: self.openai_api_key,
            cohere_api_key: self.cohere_api_key,
            additional_headers: self.headers.into_iter().collect(),
        }
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header name is empty in '{}'", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags_leave_settings_unset() {
        let cli = Cli::try_parse_from(["mcp-weaviate"]).unwrap();
        assert_eq!(cli.into_settings(), WeaviateSettings::default());
    }

    #[test]
    fn test_cloud_flags() {
        let cli = Cli::try_parse_from([
            "mcp-weaviate",
            "--connection-type",
            "cloud",
            "--cluster-url",
            "https://my-cluster.weaviate.network",
            "--api-key",
            "secret",
            "--timeout-query",
            "0",
        ])
        .unwrap();

        let settings = cli.into_settings();
        assert_eq!(settings.connection_type.as_deref(), Some("cloud"));
        assert_eq!(
            settings.cluster_url.as_deref(),
            Some("https://my-cluster.weaviate.network")
        );
        assert_eq!(settings.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.timeout_query, Some(0));
    }

    #[test]
    fn test_repeated_headers() {
        let cli = Cli::try_parse_from([
            "mcp-weaviate",
            "--header",
            "X-Team=search",
            "--header",
            "X-Trace = a=b",
        ])
        .unwrap();

        let settings = cli.into_settings();
        assert_eq!(settings.additional_headers["X-Team"], "search");
        assert_eq!(settings.additional_headers["X-Trace"], "a=b");
    }

    #[test]
    fn test_malformed_header_rejected() {
        assert!(Cli::try_parse_from(["mcp-weaviate", "--header", "novalue"]).is_err());
        assert!(Cli::try_parse_from(["mcp-weaviate", "--header", "=x"]).is_err());
    }

    #[test]
    fn test_env_file_flag() {
        let cli = Cli::try_parse_from(["mcp-weaviate", "--env-file", "deploy/weaviate.env"]).unwrap();
        assert_eq!(cli.env_file, Some(PathBuf::from("deploy/weaviate.env")));

        let cli = Cli::try_parse_from(["mcp-weaviate"]).unwrap();
        assert!(cli.env_file.is_none());
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["mcp-weaviate", "--port", "70000"]).is_err());
    }

    #[test]
    fn test_flags_override_environment_settings() {
        let env = WeaviateSettings {
            host: Some("env-host".to_string()),
            port: Some(9090),
            ..Default::default()
        };
        let cli = Cli::try_parse_from(["mcp-weaviate", "--host", "flag-host"]).unwrap();

        let merged = env.merge(cli.into_settings());
        assert_eq!(merged.host.as_deref(), Some("flag-host"));
        assert_eq!(merged.port, Some(9090));
    }
}
