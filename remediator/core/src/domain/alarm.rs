// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Alarm event payloads and classification.
//!
//! Alarm events arrive as loosely-structured EventBridge payloads
//! ("CloudWatch Alarm State Change"). The payload is not owned by this
//! service: it is held verbatim for audit and read through a thin accessor
//! layer that never fails. Classification is a pure function of the alarm
//! name and of nothing else.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::incident::RemediationCategory;

/// Metric dimension name carrying the target instance id.
const INSTANCE_ID_DIMENSION: &str = "InstanceId";

/// A raw alarm event as delivered by the external trigger.
///
/// Wraps the untrusted JSON payload. A malformed or missing field reads as
/// absent; no accessor panics or returns an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmEvent(Value);

impl AlarmEvent {
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    /// The raw payload, kept for audit persistence.
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// `detail.alarmName`, or the empty string when missing or non-string.
    pub fn alarm_name(&self) -> &str {
        self.0
            .pointer("/detail/alarmName")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// `detail.state.value` (e.g. `"ALARM"`), when present. Informational
    /// only; classification never looks at it.
    pub fn alarm_state(&self) -> Option<&str> {
        self.0.pointer("/detail/state/value").and_then(Value::as_str)
    }

    /// Classify this event into a remediation category.
    ///
    /// Case-insensitive substring match on the alarm name in fixed priority
    /// order: `"cpu"`, then `"status"`, then `"stop"`; first match wins. An
    /// alarm name matching nothing (or absent entirely) is `Unknown`.
    pub fn classify(&self) -> RemediationCategory {
        let name = self.alarm_name().to_lowercase();

        if name.contains("cpu") {
            RemediationCategory::HighCpu
        } else if name.contains("status") {
            RemediationCategory::StatusCheckFailed
        } else if name.contains("stop") {
            RemediationCategory::UnexpectedStop
        } else {
            RemediationCategory::Unknown
        }
    }

    /// Extract the target instance id from the first metric entry.
    ///
    /// Only the first entry of `detail.configuration.metrics` is consulted;
    /// its dimension list is scanned in order for a dimension named
    /// `InstanceId`. Absence — empty metrics, empty dimensions, no matching
    /// name, malformed nesting — is a valid outcome, not an error.
    pub fn instance_id(&self) -> Option<String> {
        let dimensions = self
            .0
            .pointer("/detail/configuration/metrics/0/metricStat/metric/dimensions")?
            .as_array()?;

        dimensions
            .iter()
            .find(|d| d.get("name").and_then(Value::as_str) == Some(INSTANCE_ID_DIMENSION))
            .and_then(|d| d.get("value"))
            .and_then(Value::as_str)
            .map(str::to_owned)
    }
}
