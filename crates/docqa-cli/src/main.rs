#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use docqa_opendal::ObjectStorage;
use docqa_server::handler::routes;
use docqa_server::middleware::{RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt};
use docqa_server::service::ServiceState;

use crate::config::Cli;

/// Tracing target for startup events.
pub const TRACING_TARGET_STARTUP: &str = "docqa_cli::startup";

/// Tracing target for shutdown events.
pub const TRACING_TARGET_SHUTDOWN: &str = "docqa_cli::shutdown";

/// Tracing target for configuration.
pub const TRACING_TARGET_CONFIG: &str = "docqa_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting docqa server"
    );

    cli.validate().context("invalid configuration")?;
    cli.log();

    let state = create_service_state(&cli)?;
    let router = create_router(state, &cli);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the service state from configuration.
fn create_service_state(cli: &Cli) -> anyhow::Result<ServiceState> {
    let rag_service = cli
        .provider
        .create_rag_service()
        .context("failed to create AI services")?;

    let object_storage = ObjectStorage::from_config(cli.storage.clone().into_s3_config());

    Ok(ServiceState::new(rag_service, object_storage))
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, cli: &Cli) -> Router {
    routes()
        .with_state(state)
        .with_observability()
        .with_recovery(&RecoveryConfig::with_timeout_secs(
            cli.server.request_timeout,
        ))
}
