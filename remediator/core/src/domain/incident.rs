// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Incident domain model: remediation categories, actions, outcomes and the
//! persisted incident record.
//!
//! The wire strings (`EC2_HIGH_CPU`, `NO_ACTION`, ...) are load-bearing:
//! they appear in partition keys and in persisted records, so every enum
//! here carries explicit serde renames and `as_str`/`parse` pairs.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ============================================================================
// Value Objects
// ============================================================================

/// Unique identifier for one persisted incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IncidentId(pub Uuid);

impl IncidentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IncidentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for IncidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remediation category derived from the alarm name.
///
/// Closed set: adding a category is a compile-time-checked change to the
/// dispatcher's exhaustive match, not a new string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemediationCategory {
    #[serde(rename = "EC2_HIGH_CPU")]
    HighCpu,
    #[serde(rename = "EC2_STATUS_CHECK_FAILED")]
    StatusCheckFailed,
    #[serde(rename = "EC2_UNEXPECTED_STOP")]
    UnexpectedStop,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl RemediationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighCpu => "EC2_HIGH_CPU",
            Self::StatusCheckFailed => "EC2_STATUS_CHECK_FAILED",
            Self::UnexpectedStop => "EC2_UNEXPECTED_STOP",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EC2_HIGH_CPU" => Some(Self::HighCpu),
            "EC2_STATUS_CHECK_FAILED" => Some(Self::StatusCheckFailed),
            "EC2_UNEXPECTED_STOP" => Some(Self::UnexpectedStop),
            "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for RemediationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal action of one dispatch attempt.
///
/// `Noop` is never produced by the current dispatcher; it stays in the
/// vocabulary so incidents recorded by earlier deployments still parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemediationAction {
    NoAction,
    Reboot,
    WouldReboot,
    StartInstance,
    Skip,
    Failed,
    Noop,
}

impl RemediationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoAction => "NO_ACTION",
            Self::Reboot => "REBOOT",
            Self::WouldReboot => "WOULD_REBOOT",
            Self::StartInstance => "START_INSTANCE",
            Self::Skip => "SKIP",
            Self::Failed => "FAILED",
            Self::Noop => "NOOP",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NO_ACTION" => Some(Self::NoAction),
            "REBOOT" => Some(Self::Reboot),
            "WOULD_REBOOT" => Some(Self::WouldReboot),
            "START_INSTANCE" => Some(Self::StartInstance),
            "SKIP" => Some(Self::Skip),
            "FAILED" => Some(Self::Failed),
            "NOOP" => Some(Self::Noop),
            _ => None,
        }
    }
}

impl std::fmt::Display for RemediationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Outcome & Record
// ============================================================================

/// Result of one dispatch attempt. Created exactly once per incoming event,
/// immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationOutcome {
    pub remediation_type: RemediationCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    pub action: RemediationAction,
    pub message: String,
    pub attempted_at: chrono::DateTime<Utc>,
}

impl RemediationOutcome {
    pub fn new(
        remediation_type: RemediationCategory,
        instance_id: Option<String>,
        action: RemediationAction,
        message: impl Into<String>,
    ) -> Self {
        Self {
            remediation_type,
            instance_id,
            action,
            message: message.into(),
            attempted_at: Utc::now(),
        }
    }
}

/// The persisted form of one [`RemediationOutcome`].
///
/// Keys follow the incident table schema: partition key `INCIDENT#<category>`
/// groups incidents by category; the sort key pairs the creation timestamp
/// with a fresh [`IncidentId`], so two records created in the same
/// millisecond never collide. Records are append-only; nothing in this
/// system updates or deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub pk: String,
    pub sk: String,
    pub event_type: RemediationCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    pub remediation_type: RemediationCategory,
    pub action: RemediationAction,
    pub message: String,
    pub created_at: String,
    pub raw_event: Value,
}

impl IncidentRecord {
    /// Build the record for one outcome at persistence time.
    pub fn build(outcome: &RemediationOutcome, raw_event: Value) -> Self {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let incident_id = IncidentId::new();

        Self {
            pk: format!("INCIDENT#{}", outcome.remediation_type.as_str()),
            sk: format!("{created_at}#{incident_id}"),
            event_type: outcome.remediation_type,
            instance_id: outcome.instance_id.clone(),
            remediation_type: outcome.remediation_type,
            action: outcome.action,
            message: outcome.message.clone(),
            created_at,
            raw_event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_wire_strings_are_stable() {
        assert_eq!(
            serde_json::to_value(RemediationCategory::StatusCheckFailed).unwrap(),
            json!("EC2_STATUS_CHECK_FAILED")
        );
        assert_eq!(
            RemediationCategory::parse("EC2_UNEXPECTED_STOP"),
            Some(RemediationCategory::UnexpectedStop)
        );
        assert_eq!(RemediationCategory::parse("EC2_REBOOT_LOOP"), None);
    }

    #[test]
    fn action_wire_strings_are_stable() {
        assert_eq!(
            serde_json::to_value(RemediationAction::WouldReboot).unwrap(),
            json!("WOULD_REBOOT")
        );
        for action in [
            RemediationAction::NoAction,
            RemediationAction::Reboot,
            RemediationAction::WouldReboot,
            RemediationAction::StartInstance,
            RemediationAction::Skip,
            RemediationAction::Failed,
            RemediationAction::Noop,
        ] {
            assert_eq!(RemediationAction::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn record_keys_follow_the_table_schema() {
        let outcome = RemediationOutcome::new(
            RemediationCategory::StatusCheckFailed,
            Some("i-abc".to_string()),
            RemediationAction::WouldReboot,
            "dry run ok",
        );
        let record = IncidentRecord::build(&outcome, json!({"detail": {}}));

        assert_eq!(record.pk, "INCIDENT#EC2_STATUS_CHECK_FAILED");
        assert!(record.sk.starts_with(&record.created_at));
        assert!(record.created_at.ends_with('Z'));
        // sort key = "<created_at>#<uuid>"
        let id_part = record.sk.rsplit('#').next().unwrap();
        assert!(Uuid::parse_str(id_part).is_ok());
        assert_eq!(record.instance_id.as_deref(), Some("i-abc"));
    }

    #[test]
    fn same_outcome_builds_distinct_records() {
        let outcome = RemediationOutcome::new(
            RemediationCategory::HighCpu,
            None,
            RemediationAction::NoAction,
            "informational",
        );
        let a = IncidentRecord::build(&outcome, Value::Null);
        let b = IncidentRecord::build(&outcome, Value::Null);
        assert_ne!(a.sk, b.sk);
    }
}
