//! HTTP server command
//!
//! Runs the content API with public, protected and dashboard route groups.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use prosamik_server::db::{create_pool_with_options, pool::DEFAULT_MAX_CONNECTIONS};
use prosamik_server::http::server::DEFAULT_LOGIN_PATH;
use prosamik_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "PROSAMIK_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Database URL (postgres://... or sqlite://...)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "PROSAMIK_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Tokens accepted by protected routes (comma separated)
    #[arg(long = "api-token", env = "PROSAMIK_API_TOKENS", value_delimiter = ',')]
    pub api_tokens: Vec<String>,

    /// Login entry point for unauthenticated dashboard requests
    #[arg(long, env = "PROSAMIK_LOGIN_PATH", default_value = DEFAULT_LOGIN_PATH)]
    pub login_path: String,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let database_url = args
        .database_url
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

    tracing::info!(bind = %args.bind, "Starting prosamik server");

    let pool = create_pool_with_options(&database_url, args.max_connections)
        .await
        .context("Failed to create database pool")?;

    let config = ServerConfig {
        bind_addr: args.bind,
        api_tokens: args.api_tokens,
        login_path: args.login_path,
    };

    // Blocks until shutdown
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ServeArgs,
    }

    #[test]
    fn parses_comma_separated_tokens() {
        let harness = Harness::parse_from([
            "serve",
            "--database-url",
            "sqlite::memory:",
            "--api-token",
            "a,b",
        ]);
        assert_eq!(harness.args.api_tokens, ["a", "b"]);
        assert_eq!(harness.args.login_path, "/login");
        assert_eq!(harness.args.bind.port(), 8080);
    }
}
