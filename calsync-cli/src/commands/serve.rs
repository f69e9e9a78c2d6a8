//! HTTP server command
//!
//! Runs the scheduler data service with the legacy `/data` routes and the
//! `/load` + `/sync` routes.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;

use calsync_server::db::{create_pool_with_options, migrations, DbConfig, MemoryRepository};
use calsync_server::http::{run_server, AppState, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value = "1338")]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Frontend origin allowed by CORS (credentials enabled)
    #[arg(long, env = "FRONTEND_URL")]
    pub frontend_url: Option<String>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// MySQL connection string
    #[arg(long, env = "DATABASE_URL", required_unless_present = "in_memory")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value = "5")]
    pub max_connections: u32,

    /// Create missing tables before serving
    #[arg(long)]
    pub migrate: bool,

    /// Keep all data in memory instead of MySQL (lost on exit); any
    /// database URL is ignored
    #[arg(long, conflicts_with = "migrate")]
    pub in_memory: bool,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            frontend_url: self.frontend_url.clone(),
            cors_permissive: self.cors_permissive,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.server_config();

    let state = if args.in_memory {
        tracing::warn!("Using in-memory storage - data is lost on exit");
        if args.database_url.is_some() {
            tracing::info!("Ignoring DATABASE_URL in in-memory mode");
        }
        AppState::in_memory(MemoryRepository::new())
    } else {
        let database_url = args
            .database_url
            .clone()
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

        let db_config = DbConfig::new(database_url).with_max_connections(args.max_connections);
        let pool = create_pool_with_options(&db_config)
            .await
            .context("Failed to create database pool")?;

        if args.migrate {
            migrations::run(&pool)
                .await
                .context("Failed to run migrations")?;
        }

        AppState::mysql(pool)
    };

    // Run server (blocks until shutdown)
    run_server(state, config).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_server_config_from_args() {
        let args = ServeArgs::try_parse_from([
            "serve",
            "--port",
            "8080",
            "--host",
            "127.0.0.1",
            "--frontend-url",
            "http://localhost:5173",
            "--database-url",
            "mysql://root@localhost/scheduler",
        ])
        .unwrap();

        let config = args.server_config();
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.frontend_url.as_deref(), Some("http://localhost:5173"));
        assert!(!config.cors_permissive);
    }

    #[test]
    fn in_memory_accepts_a_configured_database_url() {
        let args = ServeArgs::try_parse_from([
            "serve",
            "--in-memory",
            "--database-url",
            "mysql://root@localhost/scheduler",
        ])
        .unwrap();
        assert!(args.in_memory);
    }

    #[test]
    fn in_memory_conflicts_with_migrate() {
        let result = ServeArgs::try_parse_from(["serve", "--in-memory", "--migrate"]);
        assert!(result.is_err());
    }
}
