//! Schema migration command
//!
//! Creates the legacy and scheduler tables when they do not exist yet.

use anyhow::{Context, Result};
use clap::Parser;

use calsync_server::db::{create_pool, migrations};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// MySQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Print the DDL instead of executing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the migrations
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    if args.dry_run {
        for statement in migrations::statements() {
            println!("{};\n", statement);
        }
        return Ok(());
    }

    let pool = create_pool(&args.database_url)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(())
}
