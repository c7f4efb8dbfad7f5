// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Compute action gateway seam.
//!
//! The gateway is the only path to a mutating action against a live
//! instance. Its contract encodes the safety protocol: callers must obtain
//! a passing [`ComputeActionGateway::dry_run`] before [`ComputeActionGateway::apply`]
//! within the same dispatch attempt. `Ok(())` from `dry_run` IS the
//! "this would have succeeded" verdict; there is no sentinel string to
//! match on above the gateway.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Mutating actions the remediator may take against an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceAction {
    Reboot,
    Start,
}

impl InstanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reboot => "reboot",
            Self::Start => "start",
        }
    }
}

impl std::fmt::Display for InstanceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gateway failures, already classified by the implementation.
///
/// The `Display` form of `Denied`, `InvalidTarget` and `Api` is the
/// underlying API message verbatim; it ends up in incident records for
/// operator visibility.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The credentials lack permission for this action.
    #[error("{0}")]
    Denied(String),

    /// The target instance does not exist or the id is malformed.
    #[error("{0}")]
    InvalidTarget(String),

    /// The call did not complete within the bounded per-call timeout.
    /// Ambiguity resolves to failure, never to a silent go-ahead.
    #[error("gateway call timed out after {0:?}")]
    Timeout(Duration),

    /// Any other API failure.
    #[error("{0}")]
    Api(String),
}

/// Capability-scoped, two-phase access to instance actions.
#[async_trait]
pub trait ComputeActionGateway: Send + Sync {
    /// Validate permissions and target without causing any effect.
    async fn dry_run(&self, action: InstanceAction, instance_id: &str) -> Result<(), GatewayError>;

    /// Execute the action for real. Callers must hold a passing `dry_run`
    /// from the same dispatch attempt.
    async fn apply(&self, action: InstanceAction, instance_id: &str) -> Result<(), GatewayError>;
}
