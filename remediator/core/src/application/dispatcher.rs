// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Remediation Dispatcher
//!
//! Selects and runs the handler for one remediation category under the
//! safety protocol, producing a structured outcome. The dispatcher never
//! lets an error propagate to its caller: every gateway failure becomes a
//! `FAILED` outcome carrying the underlying message, so the pipeline always
//! has something to record.
//!
//! Safety protocol: no mutating action is ever applied without a prior
//! successful dry run in the same dispatch attempt, and simulation-only
//! deployments stop at the "would succeed" stage.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::gateway::{ComputeActionGateway, InstanceAction};
use crate::domain::incident::{RemediationAction, RemediationCategory, RemediationOutcome};

pub struct RemediationDispatcher {
    gateway: Arc<dyn ComputeActionGateway>,
    simulate_only: bool,
}

impl RemediationDispatcher {
    /// `simulate_only` is the deployment-wide toggle: when set, mutating
    /// categories stop after a passing dry run.
    pub fn new(gateway: Arc<dyn ComputeActionGateway>, simulate_only: bool) -> Self {
        Self { gateway, simulate_only }
    }

    /// Run the handler for `category` against the extracted target.
    pub async fn dispatch(
        &self,
        category: RemediationCategory,
        instance_id: Option<String>,
    ) -> RemediationOutcome {
        match category {
            RemediationCategory::HighCpu => self.handle_high_cpu(instance_id),
            RemediationCategory::StatusCheckFailed => self.handle_status_check(instance_id).await,
            RemediationCategory::UnexpectedStop => self.handle_unexpected_stop(instance_id).await,
            RemediationCategory::Unknown => {
                warn!("no remediation rule for event type {}", category);
                RemediationOutcome::new(
                    category,
                    instance_id,
                    RemediationAction::Skip,
                    format!("No remediation implemented for event type: {category}"),
                )
            }
        }
    }

    /// High CPU is informational only; the gateway is never touched.
    fn handle_high_cpu(&self, instance_id: Option<String>) -> RemediationOutcome {
        info!("handling EC2 high CPU alarm");
        RemediationOutcome::new(
            RemediationCategory::HighCpu,
            instance_id,
            RemediationAction::NoAction,
            "High CPU alarm is informational; no instance action taken",
        )
    }

    async fn handle_status_check(&self, instance_id: Option<String>) -> RemediationOutcome {
        let category = RemediationCategory::StatusCheckFailed;
        info!("StatusCheckFailed remediation started");

        let Some(instance_id) = instance_id else {
            warn!("no instance ID found in event");
            return RemediationOutcome::new(
                category,
                None,
                RemediationAction::Skip,
                "No instance ID found in event",
            );
        };

        info!(%instance_id, "attempting to reboot instance");

        if let Err(err) = self.gateway.dry_run(InstanceAction::Reboot, &instance_id).await {
            error!(%instance_id, error = %err, "reboot dry run failed");
            return RemediationOutcome::new(
                category,
                Some(instance_id),
                RemediationAction::Failed,
                err.to_string(),
            );
        }

        if self.simulate_only {
            info!(%instance_id, "simulation-only mode, skipping real reboot");
            return RemediationOutcome::new(
                category,
                Some(instance_id),
                RemediationAction::WouldReboot,
                "Dry run succeeded; real reboot skipped because simulation-only mode is on",
            );
        }

        match self.gateway.apply(InstanceAction::Reboot, &instance_id).await {
            Ok(()) => {
                info!(%instance_id, "reboot executed");
                RemediationOutcome::new(
                    category,
                    Some(instance_id),
                    RemediationAction::Reboot,
                    "EC2 instance rebooted due to StatusCheckFailed",
                )
            }
            Err(err) => {
                error!(%instance_id, error = %err, "reboot failed");
                RemediationOutcome::new(
                    category,
                    Some(instance_id),
                    RemediationAction::Failed,
                    err.to_string(),
                )
            }
        }
    }

    /// Unexpected stop validates that a start WOULD succeed and stops
    /// there. A real start is intentionally never issued for this
    /// category, regardless of the simulation-only setting: recovery is
    /// left to an operator or a separately confirmed action.
    async fn handle_unexpected_stop(&self, instance_id: Option<String>) -> RemediationOutcome {
        let category = RemediationCategory::UnexpectedStop;
        info!("handling EC2 unexpected stop");

        let Some(instance_id) = instance_id else {
            warn!("no instance ID found in event");
            return RemediationOutcome::new(
                category,
                None,
                RemediationAction::Failed,
                "No instance ID found in event",
            );
        };

        match self.gateway.dry_run(InstanceAction::Start, &instance_id).await {
            Ok(()) => RemediationOutcome::new(
                category,
                Some(instance_id),
                RemediationAction::StartInstance,
                "Dry run confirmed the instance can be started; real start left to an operator",
            ),
            Err(err) => {
                error!(%instance_id, error = %err, "start dry run failed");
                RemediationOutcome::new(
                    category,
                    Some(instance_id),
                    RemediationAction::Failed,
                    err.to_string(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateway::GatewayError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every gateway call; failure modes are configured per test.
    #[derive(Default)]
    struct RecordingGateway {
        deny_dry_run: Option<String>,
        time_out_dry_run: bool,
        fail_apply: Option<String>,
        dry_runs: Mutex<Vec<(InstanceAction, String)>>,
        applies: Mutex<Vec<(InstanceAction, String)>>,
    }

    impl RecordingGateway {
        fn dry_run_count(&self) -> usize {
            self.dry_runs.lock().unwrap().len()
        }

        fn apply_count(&self) -> usize {
            self.applies.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ComputeActionGateway for RecordingGateway {
        async fn dry_run(
            &self,
            action: InstanceAction,
            instance_id: &str,
        ) -> Result<(), GatewayError> {
            self.dry_runs.lock().unwrap().push((action, instance_id.to_string()));
            if self.time_out_dry_run {
                return Err(GatewayError::Timeout(Duration::from_secs(10)));
            }
            match &self.deny_dry_run {
                Some(message) => Err(GatewayError::Denied(message.clone())),
                None => Ok(()),
            }
        }

        async fn apply(
            &self,
            action: InstanceAction,
            instance_id: &str,
        ) -> Result<(), GatewayError> {
            self.applies.lock().unwrap().push((action, instance_id.to_string()));
            match &self.fail_apply {
                Some(message) => Err(GatewayError::Api(message.clone())),
                None => Ok(()),
            }
        }
    }

    fn dispatcher(gateway: &Arc<RecordingGateway>, simulate_only: bool) -> RemediationDispatcher {
        RemediationDispatcher::new(gateway.clone() as Arc<dyn ComputeActionGateway>, simulate_only)
    }

    #[tokio::test]
    async fn high_cpu_never_touches_the_gateway() {
        let gateway = Arc::new(RecordingGateway::default());
        let outcome = dispatcher(&gateway, false)
            .dispatch(RemediationCategory::HighCpu, Some("i-abc".into()))
            .await;

        assert_eq!(outcome.action, RemediationAction::NoAction);
        assert_eq!(gateway.dry_run_count(), 0);
        assert_eq!(gateway.apply_count(), 0);
    }

    #[tokio::test]
    async fn status_check_without_instance_id_skips_without_gateway_calls() {
        let gateway = Arc::new(RecordingGateway::default());
        let outcome = dispatcher(&gateway, false)
            .dispatch(RemediationCategory::StatusCheckFailed, None)
            .await;

        assert_eq!(outcome.action, RemediationAction::Skip);
        assert_eq!(outcome.message, "No instance ID found in event");
        assert_eq!(gateway.dry_run_count(), 0);
        assert_eq!(gateway.apply_count(), 0);
    }

    #[tokio::test]
    async fn status_check_in_simulation_mode_stops_at_would_reboot() {
        let gateway = Arc::new(RecordingGateway::default());
        let outcome = dispatcher(&gateway, true)
            .dispatch(RemediationCategory::StatusCheckFailed, Some("i-abc".into()))
            .await;

        assert_eq!(outcome.action, RemediationAction::WouldReboot);
        assert_eq!(outcome.instance_id.as_deref(), Some("i-abc"));
        assert_eq!(gateway.dry_run_count(), 1);
        assert_eq!(gateway.apply_count(), 0);
    }

    #[tokio::test]
    async fn status_check_applies_reboot_exactly_once_when_not_simulating() {
        let gateway = Arc::new(RecordingGateway::default());
        let outcome = dispatcher(&gateway, false)
            .dispatch(RemediationCategory::StatusCheckFailed, Some("i-abc".into()))
            .await;

        assert_eq!(outcome.action, RemediationAction::Reboot);
        assert_eq!(gateway.dry_run_count(), 1);
        assert_eq!(gateway.apply_count(), 1);
        assert_eq!(
            gateway.applies.lock().unwrap()[0],
            (InstanceAction::Reboot, "i-abc".to_string())
        );
    }

    #[tokio::test]
    async fn status_check_dry_run_denial_surfaces_the_message_verbatim() {
        let gateway = Arc::new(RecordingGateway {
            deny_dry_run: Some("UnauthorizedOperation: You are not authorized".to_string()),
            ..Default::default()
        });
        let outcome = dispatcher(&gateway, false)
            .dispatch(RemediationCategory::StatusCheckFailed, Some("i-abc".into()))
            .await;

        assert_eq!(outcome.action, RemediationAction::Failed);
        assert_eq!(outcome.message, "UnauthorizedOperation: You are not authorized");
        assert_eq!(gateway.apply_count(), 0);
    }

    #[tokio::test]
    async fn status_check_dry_run_timeout_is_a_failure_not_a_go_ahead() {
        let gateway = Arc::new(RecordingGateway {
            time_out_dry_run: true,
            ..Default::default()
        });
        let outcome = dispatcher(&gateway, false)
            .dispatch(RemediationCategory::StatusCheckFailed, Some("i-abc".into()))
            .await;

        assert_eq!(outcome.action, RemediationAction::Failed);
        assert!(outcome.message.contains("timed out"));
        assert_eq!(gateway.apply_count(), 0);
    }

    #[tokio::test]
    async fn status_check_apply_failure_is_reported() {
        let gateway = Arc::new(RecordingGateway {
            fail_apply: Some("IncorrectInstanceState: not running".to_string()),
            ..Default::default()
        });
        let outcome = dispatcher(&gateway, false)
            .dispatch(RemediationCategory::StatusCheckFailed, Some("i-abc".into()))
            .await;

        assert_eq!(outcome.action, RemediationAction::Failed);
        assert_eq!(outcome.message, "IncorrectInstanceState: not running");
        assert_eq!(gateway.apply_count(), 1);
    }

    #[tokio::test]
    async fn unexpected_stop_never_applies_even_when_dry_run_passes() {
        let gateway = Arc::new(RecordingGateway::default());
        let outcome = dispatcher(&gateway, false)
            .dispatch(RemediationCategory::UnexpectedStop, Some("i-abc".into()))
            .await;

        assert_eq!(outcome.action, RemediationAction::StartInstance);
        assert_eq!(gateway.dry_run_count(), 1);
        assert_eq!(
            gateway.dry_runs.lock().unwrap()[0],
            (InstanceAction::Start, "i-abc".to_string())
        );
        assert_eq!(gateway.apply_count(), 0);
    }

    #[tokio::test]
    async fn unexpected_stop_without_instance_id_fails() {
        let gateway = Arc::new(RecordingGateway::default());
        let outcome = dispatcher(&gateway, false)
            .dispatch(RemediationCategory::UnexpectedStop, None)
            .await;

        assert_eq!(outcome.action, RemediationAction::Failed);
        assert_eq!(gateway.dry_run_count(), 0);
    }

    #[tokio::test]
    async fn unknown_category_names_itself_in_the_message() {
        let gateway = Arc::new(RecordingGateway::default());
        let outcome = dispatcher(&gateway, false)
            .dispatch(RemediationCategory::Unknown, None)
            .await;

        assert_eq!(outcome.action, RemediationAction::Skip);
        assert!(outcome.message.contains("UNKNOWN"));
        assert_eq!(gateway.dry_run_count(), 0);
        assert_eq!(gateway.apply_count(), 0);
    }
}
