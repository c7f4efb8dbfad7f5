// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Feed a sample alarm through the live pipeline.
//!
//! Useful for verifying table wiring and the simulation-only toggle from a
//! workstation before pointing real alarm traffic at a deployment. The
//! bundled payload is a StatusCheckFailed alarm state change.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::PathBuf;

use aegis_remediator_core::domain::alarm::AlarmEvent;
use aegis_remediator_core::infrastructure::RemediatorConfig;

use crate::services;

const SAMPLE_EVENT: &str = include_str!("sample_event.json");

pub async fn run(config: &RemediatorConfig, file: Option<PathBuf>) -> Result<()> {
    let payload: Value = match file {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", path.display()))?
        }
        None => serde_json::from_str(SAMPLE_EVENT).expect("bundled sample event is valid JSON"),
    };

    let services = services::build(config).await;
    let response = services
        .pipeline
        .handle(AlarmEvent::new(payload))
        .await
        .context("pipeline invocation failed")?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
