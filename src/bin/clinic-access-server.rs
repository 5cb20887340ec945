// ABOUTME: HTTP server binary for the clinic access service
// ABOUTME: Loads configuration, initializes logging, optionally seeds demo users and serves the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

//! # Clinic Access Server Binary
//!
//! Serves login, logout, session and access-check endpoints plus every
//! policy-protected page behind the route guard.

use anyhow::{Context, Result};
use clap::Parser;
use clinic_access::{
    auth::demo,
    config::ServerConfig,
    logging::LoggingConfig,
    resources::ServerResources,
    routes,
};
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "clinic-access-server")]
#[command(about = "Clinic Access - role-based route guard and session service")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind address
    #[arg(long)]
    host: Option<String>,

    /// Register one demo user per role; password from DEMO_USER_PASSWORD
    #[arg(long)]
    seed_demo_users: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    LoggingConfig::for_server(&config).init()?;
    // Validation warnings emitted during loading predate the subscriber
    config.validate()?;
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::new(config)?);

    if args.seed_demo_users {
        let password = env::var(demo::DEMO_PASSWORD_ENV)
            .with_context(|| format!("{} must be set to seed demo users", demo::DEMO_PASSWORD_ENV))?;
        let tenant = demo::seed(&resources.identity, &password)?;
        info!(clinic_id = %tenant.clinic_id, "Demo users ready");
    }

    let addr = format!("{}:{}", resources.config.host, resources.config.http_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, routes::router(resources))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {e}"),
    }
}
