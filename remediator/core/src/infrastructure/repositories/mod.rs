// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of the incident store abstraction
//! defined in the domain layer.
//!
//! # Available Implementations
//!
//! - **DynamoDbIncidentRepository** — production persistence against the
//!   incident table
//! - **InMemoryIncidentRepository** — thread-safe Vec-backed storage for
//!   development and testing

pub mod dynamodb;

pub use dynamodb::DynamoDbIncidentRepository;

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::alarm::AlarmEvent;
use crate::domain::incident::{IncidentRecord, RemediationOutcome};
use crate::domain::repository::{IncidentRepository, RepositoryError};

#[derive(Clone, Default)]
pub struct InMemoryIncidentRepository {
    records: Arc<Mutex<Vec<IncidentRecord>>>,
}

impl InMemoryIncidentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IncidentRepository for InMemoryIncidentRepository {
    async fn append(
        &self,
        outcome: &RemediationOutcome,
        raw_event: &AlarmEvent,
    ) -> Result<IncidentRecord, RepositoryError> {
        let record = IncidentRecord::build(outcome, raw_event.raw().clone());
        let mut records = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Database("Mutex poisoned".to_string()))?;
        records.push(record.clone());
        Ok(record)
    }

    async fn find_by_date(&self, date: &str) -> Result<Vec<IncidentRecord>, RepositoryError> {
        let records = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Database("Mutex poisoned".to_string()))?;
        let mut hits: Vec<IncidentRecord> = records
            .iter()
            .filter(|r| r.created_at.starts_with(date))
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(hits)
    }
}
