// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Incident store contract.
//!
//! Append-only persistence of one record per remediation attempt,
//! interface defined here in the domain layer and implemented in
//! `crate::infrastructure::repositories` (DynamoDB for production,
//! in-memory for development and testing).

use async_trait::async_trait;

use crate::domain::alarm::AlarmEvent;
use crate::domain::incident::{IncidentRecord, RemediationOutcome};

#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// Persist one remediation attempt as a fresh, immutable record.
    ///
    /// Pure append: no read-modify-write, no update path. Uniqueness comes
    /// from the record's timestamp-plus-uuid sort key, so concurrent
    /// appends never conflict. A storage failure must surface to the
    /// caller — an unrecorded remediation attempt breaks the audit
    /// guarantee.
    async fn append(
        &self,
        outcome: &RemediationOutcome,
        raw_event: &AlarmEvent,
    ) -> Result<IncidentRecord, RepositoryError>;

    /// All records whose creation timestamp starts with `date`
    /// (`YYYY-MM-DD`), ordered ascending by time. Follows store pagination
    /// until exhausted.
    async fn find_by_date(&self, date: &str) -> Result<Vec<IncidentRecord>, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
