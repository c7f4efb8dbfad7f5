// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Daily report rendering and delivery seams.
//!
//! Rendering is a pure function over the day's incident records. Delivery
//! (mail, archive) goes through traits implemented in
//! `crate::infrastructure`.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::incident::IncidentRecord;

/// Messages longer than this are truncated in the details table.
const MESSAGE_COLUMN_LIMIT: usize = 80;

/// Render the Markdown daily report for one date.
pub fn render_markdown(date: &str, incidents: &[IncidentRecord]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# Daily Cloud Incident Report - {date}"));
    lines.push(String::new());

    if incidents.is_empty() {
        lines.push("No incidents recorded for this date.".to_string());
        return lines.join("\n");
    }

    let total = incidents.len();

    // Heuristic success split: there is no status field on a record, so an
    // incident counts as failed when its action or message mentions FAILED.
    let failed = incidents
        .iter()
        .filter(|i| format!("{}{}", i.action.as_str(), i.message).to_uppercase().contains("FAILED"))
        .count();
    let succeeded = total - failed;

    let unique_instances = {
        let mut ids: Vec<&str> = incidents.iter().filter_map(|i| i.instance_id.as_deref()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    };

    lines.push("**Summary**".to_string());
    lines.push(format!("- Total incidents: {total}"));
    lines.push(format!("- Success (heuristic): {succeeded}"));
    lines.push(format!("- Failed (heuristic): {failed}"));
    lines.push(format!("- Unique instances: {unique_instances}"));
    lines.push(String::new());

    lines.push("**By event type**".to_string());
    for (event_type, count) in most_common(incidents.iter().map(|i| i.event_type.as_str())) {
        lines.push(format!("- {event_type}: {count}"));
    }
    lines.push(String::new());

    lines.push("**By remediation type**".to_string());
    for (r_type, count) in most_common(incidents.iter().map(|i| i.remediation_type.as_str())) {
        lines.push(format!("- {r_type}: {count}"));
    }
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());

    lines.push("## Incident Details".to_string());
    lines.push(String::new());
    lines.push(
        "| Time (created_at) | Event Type | Instance ID | Remediation Type | Action | Message |"
            .to_string(),
    );
    lines.push(
        "|-------------------|------------|-------------|------------------|--------|---------|"
            .to_string(),
    );

    let mut ordered: Vec<&IncidentRecord> = incidents.iter().collect();
    ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    for item in ordered {
        let instance_id = item.instance_id.as_deref().unwrap_or("-");
        let message = table_cell(&item.message);

        lines.push(format!(
            "| {} | {} | {} | {} | {} | {} |",
            item.created_at,
            item.event_type.as_str(),
            instance_id,
            item.remediation_type.as_str(),
            item.action.as_str(),
            message,
        ));
    }

    lines.join("\n")
}

/// Counts keyed by `keys`, most common first; ties keep first-seen order.
fn most_common<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for key in keys {
        if !counts.contains_key(key) {
            order.push(key);
        }
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut out: Vec<(&str, usize)> = order.into_iter().map(|k| (k, counts[k])).collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Flatten newlines and bound the message column width.
fn table_cell(message: &str) -> String {
    let flat = message.replace('\n', " ");
    if flat.chars().count() > MESSAGE_COLUMN_LIMIT {
        let truncated: String = flat.chars().take(MESSAGE_COLUMN_LIMIT - 3).collect();
        format!("{truncated}...")
    } else {
        flat
    }
}

// ============================================================================
// Delivery seams
// ============================================================================

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("mail configuration missing: {0}")]
    Config(&'static str),

    #[error("{0}")]
    Send(String),
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive configuration missing: {0}")]
    Config(&'static str),

    #[error("{0}")]
    Upload(String),
}

/// Sends the rendered report to the configured recipients.
#[async_trait]
pub trait ReportMailer: Send + Sync {
    /// Returns the provider message id on success.
    async fn send(&self, subject: &str, body: &str) -> Result<String, MailerError>;
}

/// Stores the rendered report for archival.
#[async_trait]
pub trait ReportArchive: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), ArchiveError>;
}
