// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP server: service wiring and lifecycle

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use bff_core::{
    application::{DefinitionService, HistoryService, InstanceService, StandardStartProcessUseCase},
    domain::{bff_config::BffConfigManifest, engine::ProcessEngine, messages::MessageResolver},
    infrastructure::{
        storage::create_form_data_storage, CamundaEngineClient, HttpFormValidator,
        StaticMessageResolver,
    },
    presentation::api::{app, AppState},
};

/// Build the application services from configuration
pub fn build_state(config: &BffConfigManifest) -> Result<AppState> {
    let spec = &config.spec;

    let engine: Arc<dyn ProcessEngine> = Arc::new(
        CamundaEngineClient::new(
            &spec.engine.url,
            Duration::from_secs(spec.engine.timeout_seconds),
            config.engine_auth_token(),
        )
        .context("Failed to create engine client")?,
    );

    let form_validator = Arc::new(
        HttpFormValidator::new(
            &spec.form_validation.url,
            Duration::from_secs(spec.form_validation.timeout_seconds),
        )
        .context("Failed to create form validator client")?,
    );

    let storage =
        create_form_data_storage(&spec.storage).context("Failed to create form data storage")?;

    let messages: Arc<dyn MessageResolver> =
        Arc::new(StaticMessageResolver::new().with_overrides(&spec.messages));

    Ok(AppState {
        definitions: DefinitionService::new(engine.clone()),
        instances: InstanceService::new(engine.clone(), messages.clone()),
        history: HistoryService::new(engine.clone(), messages),
        start_process: Arc::new(StandardStartProcessUseCase::new(
            engine,
            form_validator,
            storage.clone(),
        )),
        storage,
    })
}

pub async fn serve(config_path: Option<PathBuf>, port: Option<u16>) -> Result<()> {
    let config =
        BffConfigManifest::load_or_default(config_path).context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    info!(
        "Configuration loaded: name={} engine={} storage={:?}",
        config.metadata.name, config.spec.engine.url, config.spec.storage.backend
    );

    let state = build_state(&config)?;
    let router = app(state);

    let port = port.unwrap_or(config.spec.network.port);
    let addr = format!("{}:{}", config.spec.network.bind_address, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Process BFF listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Process BFF shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
