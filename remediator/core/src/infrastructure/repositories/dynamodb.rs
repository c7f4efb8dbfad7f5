// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! DynamoDB implementation of the incident store.
//!
//! One item per remediation attempt. Partition key `INCIDENT#<category>`,
//! sort key `<created_at>#<uuid>`; `raw_event` is stored as a JSON string
//! attribute. Reads scan with a `begins_with(created_at, :date)` filter
//! and follow `LastEvaluatedKey` pagination until exhausted.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use tracing::{debug, error, warn};

use crate::domain::alarm::AlarmEvent;
use crate::domain::incident::{IncidentRecord, RemediationAction, RemediationCategory, RemediationOutcome};
use crate::domain::repository::{IncidentRepository, RepositoryError};

pub struct DynamoDbIncidentRepository {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoDbIncidentRepository {
    pub fn new(sdk_config: &SdkConfig, table_name: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_dynamodb::Client::new(sdk_config),
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl IncidentRepository for DynamoDbIncidentRepository {
    async fn append(
        &self,
        outcome: &RemediationOutcome,
        raw_event: &AlarmEvent,
    ) -> Result<IncidentRecord, RepositoryError> {
        let record = IncidentRecord::build(outcome, raw_event.raw().clone());
        let item = item_from_record(&record)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|err| {
                error!(table = %self.table_name, error = %DisplayErrorContext(&err), "failed to write incident");
                RepositoryError::Database(DisplayErrorContext(&err).to_string())
            })?;

        debug!(pk = %record.pk, sk = %record.sk, "incident written");
        Ok(record)
    }

    async fn find_by_date(&self, date: &str) -> Result<Vec<IncidentRecord>, RepositoryError> {
        let mut records = Vec::new();
        let mut last_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let response = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("begins_with(created_at, :date)")
                .expression_attribute_values(":date", AttributeValue::S(date.to_owned()))
                .set_exclusive_start_key(last_key.take())
                .send()
                .await
                .map_err(|err| RepositoryError::Database(DisplayErrorContext(&err).to_string()))?;

            for item in response.items() {
                match record_from_item(item) {
                    Ok(record) => records.push(record),
                    // Keep the report usable even if one row is undecodable.
                    Err(err) => warn!(error = %err, "skipping undecodable incident row"),
                }
            }

            match response.last_evaluated_key() {
                Some(key) if !key.is_empty() => last_key = Some(key.clone()),
                _ => break,
            }
        }

        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        debug!(date, count = records.len(), "incidents loaded for date");
        Ok(records)
    }
}

fn item_from_record(
    record: &IncidentRecord,
) -> Result<HashMap<String, AttributeValue>, RepositoryError> {
    let raw_event = serde_json::to_string(&record.raw_event)
        .map_err(|err| RepositoryError::Serialization(err.to_string()))?;

    let mut item = HashMap::new();
    item.insert("pk".to_string(), AttributeValue::S(record.pk.clone()));
    item.insert("sk".to_string(), AttributeValue::S(record.sk.clone()));
    item.insert(
        "event_type".to_string(),
        AttributeValue::S(record.event_type.as_str().to_string()),
    );
    if let Some(instance_id) = &record.instance_id {
        item.insert("instance_id".to_string(), AttributeValue::S(instance_id.clone()));
    }
    item.insert(
        "remediation_type".to_string(),
        AttributeValue::S(record.remediation_type.as_str().to_string()),
    );
    item.insert(
        "action".to_string(),
        AttributeValue::S(record.action.as_str().to_string()),
    );
    item.insert("message".to_string(), AttributeValue::S(record.message.clone()));
    item.insert("created_at".to_string(), AttributeValue::S(record.created_at.clone()));
    item.insert("raw_event".to_string(), AttributeValue::S(raw_event));

    Ok(item)
}

fn record_from_item(item: &HashMap<String, AttributeValue>) -> Result<IncidentRecord, RepositoryError> {
    let string_attr = |name: &str| -> Result<String, RepositoryError> {
        item.get(name)
            .and_then(|value| value.as_s().ok())
            .cloned()
            .ok_or_else(|| RepositoryError::Serialization(format!("missing string attribute {name}")))
    };

    let event_type = string_attr("event_type")?;
    let event_type = RemediationCategory::parse(&event_type)
        .ok_or_else(|| RepositoryError::Serialization(format!("unknown event type {event_type}")))?;

    let remediation_type = string_attr("remediation_type")?;
    let remediation_type = RemediationCategory::parse(&remediation_type).ok_or_else(|| {
        RepositoryError::Serialization(format!("unknown remediation type {remediation_type}"))
    })?;

    let action = string_attr("action")?;
    let action = RemediationAction::parse(&action)
        .ok_or_else(|| RepositoryError::Serialization(format!("unknown action {action}")))?;

    let raw_event = serde_json::from_str(&string_attr("raw_event")?)
        .map_err(|err| RepositoryError::Serialization(err.to_string()))?;

    Ok(IncidentRecord {
        pk: string_attr("pk")?,
        sk: string_attr("sk")?,
        event_type,
        instance_id: item.get("instance_id").and_then(|v| v.as_s().ok()).cloned(),
        remediation_type,
        action,
        message: string_attr("message")?,
        created_at: string_attr("created_at")?,
        raw_event,
    })
}
