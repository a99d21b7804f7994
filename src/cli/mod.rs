use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::config::config;
use crate::database::{schema, DatabaseManager};
use crate::routes;
use crate::services::admin_service::AdminService;
use crate::services::department_service::DepartmentService;

#[derive(Parser)]
#[command(name = "case-records-api")]
#[command(about = "Case records management API server")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Port to listen on (overrides CASES_API_PORT/PORT)")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Create the schema, seed departments and admin accounts, then exit")]
    Bootstrap,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config();
    info!("Starting case records API in {:?} mode", config.environment);

    DatabaseManager::init(&config.database)
        .await
        .context("failed to connect to the database")?;
    schema::bootstrap(&DatabaseManager::pool()?)
        .await
        .context("failed to create the schema")?;

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config.server.host, cli.port.unwrap_or(config.server.port)).await,
        Commands::Bootstrap => bootstrap().await,
    };

    DatabaseManager::close().await;
    result
}

async fn serve(host: &str, port: u16) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Case records API listening on http://{}", bind_addr);

    axum::serve(listener, routes::app())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn bootstrap() -> anyhow::Result<()> {
    let departments = DepartmentService::new()?.seed().await?;
    println!(
        "Departments: {} inserted, {} already present",
        departments.inserted, departments.existing
    );

    let admins = AdminService::new()?
        .seed(&config().seed.admins)
        .await
        .map_err(|e| anyhow::anyhow!("admin seed failed: {}", e))?;
    println!(
        "Admins: {} created, {} already present",
        admins.created.len(),
        admins.existing.len()
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::parse_from(["case-records-api"]);
        assert!(cli.command.is_none());
        assert!(cli.port.is_none());
    }

    #[test]
    fn port_override_applies_to_subcommands() {
        let cli = Cli::parse_from(["case-records-api", "bootstrap", "--port", "8081"]);
        assert_eq!(cli.command, Some(Commands::Bootstrap));
        assert_eq!(cli.port, Some(8081));
    }
}
