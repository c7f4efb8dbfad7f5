// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{Context, Result};
use tracing::info;

use aegis_remediator_core::infrastructure::RemediatorConfig;
use aegis_remediator_core::presentation::api;

use crate::services;

pub async fn run(config: &RemediatorConfig, host: &str, port: u16) -> Result<()> {
    let services = services::build(config).await;
    let app = api::app(services.pipeline, services.reports);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        %addr,
        simulate_only = config.simulate_only,
        table = %config.incident_table,
        "remediator listening"
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server terminated")?;

    Ok(())
}
