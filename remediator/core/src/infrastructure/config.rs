// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Process configuration.
//!
//! Resolved from the environment once at startup into an explicit struct
//! that is passed by reference into constructors — no module-level
//! globals, so tests inject whatever they need. A missing value fails the
//! operation that needs it, never process startup.

use std::time::Duration;
use tracing::warn;

/// Default per-call timeout for EC2 gateway calls, in seconds.
const DEFAULT_ACTION_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct RemediatorConfig {
    /// DynamoDB incident table (`INCIDENT_TABLE_NAME`).
    pub incident_table: String,
    /// S3 bucket for archived reports (`REPORT_BUCKET_NAME`).
    pub report_bucket: Option<String>,
    /// Key prefix for archived reports (`REPORT_PREFIX`).
    pub report_prefix: String,
    /// SES sender address (`SES_SENDER`).
    pub ses_sender: Option<String>,
    /// SES recipient addresses, comma-separated (`SES_RECIPIENTS`).
    pub ses_recipients: Vec<String>,
    /// Simulation-only mode (`DRY_RUN_ONLY`, default true): mutating
    /// categories stop at the "would succeed" stage.
    pub simulate_only: bool,
    /// AWS region (`AWS_REGION`).
    pub aws_region: String,
    /// Bounded timeout applied to each gateway call
    /// (`EC2_ACTION_TIMEOUT_SECS`).
    pub action_timeout: Duration,
}

impl RemediatorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve from an arbitrary lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            incident_table: var("INCIDENT_TABLE_NAME")
                .unwrap_or_else(|| "incident_events".to_string()),
            report_bucket: var("REPORT_BUCKET_NAME"),
            report_prefix: var("REPORT_PREFIX").unwrap_or_else(|| "daily-reports/".to_string()),
            ses_sender: var("SES_SENDER"),
            ses_recipients: var("SES_RECIPIENTS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|addr| !addr.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
            simulate_only: var("DRY_RUN_ONLY")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(true),
            aws_region: var("AWS_REGION").unwrap_or_else(|| "ap-southeast-2".to_string()),
            action_timeout: Duration::from_secs(
                var("EC2_ACTION_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_ACTION_TIMEOUT_SECS),
            ),
        }
    }

    /// Environment variables the reporting path needs but that are unset.
    /// Logged at startup; the operations themselves fail lazily.
    pub fn missing_recommended(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.report_bucket.is_none() {
            missing.push("REPORT_BUCKET_NAME");
        }
        if self.ses_sender.is_none() {
            missing.push("SES_SENDER");
        }
        if self.ses_recipients.is_empty() {
            missing.push("SES_RECIPIENTS");
        }
        if !missing.is_empty() {
            warn!(missing = missing.join(", "), "recommended configuration is unset");
        }
        missing
    }
}
