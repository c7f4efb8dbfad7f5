// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Incident Pipeline
//!
//! Orchestrates one incoming alarm event: classify → extract target →
//! dispatch → persist → respond. Steps run strictly sequentially.
//! Classification and extraction never raise and dispatch always returns
//! an outcome, so the only failure that can escape is a persistence
//! failure — and it must: a remediation attempt that cannot be recorded
//! is a failed invocation, not a partial success.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::application::dispatcher::RemediationDispatcher;
use crate::domain::alarm::AlarmEvent;
use crate::domain::incident::{RemediationCategory, RemediationOutcome};
use crate::domain::repository::{IncidentRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to record incident: {0}")]
    Persistence(#[from] RepositoryError),
}

/// Response returned to the external trigger.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResponse {
    pub event_type: RemediationCategory,
    pub remediation: RemediationOutcome,
}

pub struct IncidentPipeline {
    dispatcher: RemediationDispatcher,
    repository: Arc<dyn IncidentRepository>,
}

impl IncidentPipeline {
    pub fn new(dispatcher: RemediationDispatcher, repository: Arc<dyn IncidentRepository>) -> Self {
        Self { dispatcher, repository }
    }

    /// Process one alarm event end to end.
    pub async fn handle(&self, event: AlarmEvent) -> Result<PipelineResponse, PipelineError> {
        info!(
            alarm_name = event.alarm_name(),
            state = event.alarm_state().unwrap_or("-"),
            "incoming alarm event"
        );

        let event_type = event.classify();
        let instance_id = event.instance_id();
        info!(event_type = %event_type, instance_id = instance_id.as_deref().unwrap_or("-"), "identified event type");

        let remediation = self.dispatcher.dispatch(event_type, instance_id).await;

        let record = self.repository.append(&remediation, &event).await?;
        info!(
            action = %remediation.action,
            pk = %record.pk,
            sk = %record.sk,
            "remediation attempt recorded"
        );

        Ok(PipelineResponse { event_type, remediation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateway::{ComputeActionGateway, GatewayError, InstanceAction};
    use crate::domain::incident::{IncidentRecord, RemediationAction};
    use crate::infrastructure::repositories::InMemoryIncidentRepository;
    use async_trait::async_trait;
    use serde_json::json;

    struct PassingGateway;

    #[async_trait]
    impl ComputeActionGateway for PassingGateway {
        async fn dry_run(&self, _: InstanceAction, _: &str) -> Result<(), GatewayError> {
            Ok(())
        }
        async fn apply(&self, _: InstanceAction, _: &str) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    /// Repository whose writes always fail, for audit-guarantee tests.
    struct FailingRepository;

    #[async_trait]
    impl IncidentRepository for FailingRepository {
        async fn append(
            &self,
            _: &RemediationOutcome,
            _: &AlarmEvent,
        ) -> Result<IncidentRecord, RepositoryError> {
            Err(RepositoryError::Database("table unavailable".to_string()))
        }
        async fn find_by_date(&self, _: &str) -> Result<Vec<IncidentRecord>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    fn status_check_event() -> AlarmEvent {
        AlarmEvent::new(json!({
            "detail": {
                "alarmName": "StatusCheckFailed",
                "state": { "value": "ALARM" },
                "configuration": { "metrics": [{ "metricStat": { "metric": {
                    "dimensions": [{ "name": "InstanceId", "value": "i-abc" }]
                } } }] }
            }
        }))
    }

    fn pipeline(repository: Arc<dyn IncidentRepository>, simulate_only: bool) -> IncidentPipeline {
        let dispatcher = RemediationDispatcher::new(Arc::new(PassingGateway), simulate_only);
        IncidentPipeline::new(dispatcher, repository)
    }

    #[tokio::test]
    async fn status_check_event_flows_to_a_recorded_would_reboot() {
        let repository = Arc::new(InMemoryIncidentRepository::new());
        let response = pipeline(repository.clone(), true)
            .handle(status_check_event())
            .await
            .unwrap();

        assert_eq!(response.event_type, RemediationCategory::StatusCheckFailed);
        assert_eq!(response.remediation.action, RemediationAction::WouldReboot);
        assert_eq!(response.remediation.instance_id.as_deref(), Some("i-abc"));

        let date = response.remediation.attempted_at.format("%Y-%m-%d").to_string();
        let recorded = repository.find_by_date(&date).await.unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].pk, "INCIDENT#EC2_STATUS_CHECK_FAILED");
        assert_eq!(recorded[0].raw_event, *status_check_event().raw());
    }

    #[tokio::test]
    async fn unknown_events_are_still_recorded() {
        let repository = Arc::new(InMemoryIncidentRepository::new());
        let response = pipeline(repository.clone(), true)
            .handle(AlarmEvent::new(json!({ "detail": { "alarmName": "disk-full" } })))
            .await
            .unwrap();

        assert_eq!(response.event_type, RemediationCategory::Unknown);
        assert_eq!(response.remediation.action, RemediationAction::Skip);

        let date = response.remediation.attempted_at.format("%Y-%m-%d").to_string();
        let recorded = repository.find_by_date(&date).await.unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].pk, "INCIDENT#UNKNOWN");
    }

    #[tokio::test]
    async fn persistence_failure_fails_the_whole_invocation() {
        let result = pipeline(Arc::new(FailingRepository), true)
            .handle(status_check_event())
            .await;

        let err = result.expect_err("unrecorded remediation must not look successful");
        assert!(err.to_string().contains("table unavailable"));
    }
}
