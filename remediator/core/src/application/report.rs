// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Daily Report Service
//!
//! Builds the Markdown report for one UTC date from the incident store,
//! then delivers it by mail and to the archive. The two delivery channels
//! are independent: a failure in one is recorded in the run result and
//! does not stop the other. Only a store read failure aborts the run.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::domain::report::{render_markdown, ReportArchive, ReportMailer};
use crate::domain::repository::{IncidentRepository, RepositoryError};

/// Default key prefix for archived reports.
const DEFAULT_REPORT_PREFIX: &str = "daily-reports/";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status")]
pub enum EmailDelivery {
    #[serde(rename = "SUCCESS")]
    Sent { message_id: String },
    #[serde(rename = "FAILED")]
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status")]
pub enum ArchiveDelivery {
    #[serde(rename = "SUCCESS")]
    Stored { key: String },
    #[serde(rename = "FAILED")]
    Failed { error: String },
}

/// Result of one reporting run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRunResult {
    pub date: String,
    pub incident_count: usize,
    pub email: EmailDelivery,
    pub archive: ArchiveDelivery,
    #[serde(skip)]
    pub markdown: String,
}

pub struct DailyReportService {
    repository: Arc<dyn IncidentRepository>,
    mailer: Arc<dyn ReportMailer>,
    archive: Arc<dyn ReportArchive>,
    prefix: String,
}

impl DailyReportService {
    pub fn new(
        repository: Arc<dyn IncidentRepository>,
        mailer: Arc<dyn ReportMailer>,
        archive: Arc<dyn ReportArchive>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            mailer,
            archive,
            prefix: normalize_prefix(prefix.into()),
        }
    }

    /// Build and deliver the report for `date` (`YYYY-MM-DD`), defaulting
    /// to the current UTC date.
    pub async fn run(&self, date: Option<String>) -> Result<ReportRunResult, RepositoryError> {
        let date = date.unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string());
        info!(%date, "daily report run started");

        let incidents = self.repository.find_by_date(&date).await?;
        let markdown = render_markdown(&date, &incidents);

        let subject = format!("Daily Cloud Incident Report - {date}");
        let email = match self.mailer.send(&subject, &markdown).await {
            Ok(message_id) => {
                info!(%date, %message_id, "daily report emailed");
                EmailDelivery::Sent { message_id }
            }
            Err(err) => {
                error!(%date, error = %err, "failed to email daily report");
                EmailDelivery::Failed { error: err.to_string() }
            }
        };

        let key = format!("{}{}.md", self.prefix, date);
        let archive = match self
            .archive
            .put(&key, markdown.clone().into_bytes(), "text/markdown; charset=utf-8")
            .await
        {
            Ok(()) => {
                info!(%date, %key, "daily report archived");
                ArchiveDelivery::Stored { key }
            }
            Err(err) => {
                error!(%date, %key, error = %err, "failed to archive daily report");
                ArchiveDelivery::Failed { error: err.to_string() }
            }
        };

        Ok(ReportRunResult {
            date,
            incident_count: incidents.len(),
            email,
            archive,
            markdown,
        })
    }
}

fn normalize_prefix(prefix: String) -> String {
    if prefix.is_empty() {
        DEFAULT_REPORT_PREFIX.to_string()
    } else if prefix.ends_with('/') {
        prefix
    } else {
        format!("{prefix}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::{ArchiveError, MailerError};
    use crate::infrastructure::repositories::InMemoryIncidentRepository;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        fail: bool,
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ReportMailer for RecordingMailer {
        async fn send(&self, subject: &str, body: &str) -> Result<String, MailerError> {
            if self.fail {
                return Err(MailerError::Config("SES_SENDER"));
            }
            self.sent.lock().unwrap().push((subject.to_string(), body.to_string()));
            Ok("message-0001".to_string())
        }
    }

    #[derive(Default)]
    struct RecordingArchive {
        stored: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ReportArchive for RecordingArchive {
        async fn put(&self, key: &str, bytes: Vec<u8>, _: &str) -> Result<(), ArchiveError> {
            let body = String::from_utf8(bytes).unwrap();
            self.stored.lock().unwrap().push((key.to_string(), body));
            Ok(())
        }
    }

    fn service(
        mailer: Arc<RecordingMailer>,
        archive: Arc<RecordingArchive>,
        prefix: &str,
    ) -> DailyReportService {
        DailyReportService::new(
            Arc::new(InMemoryIncidentRepository::new()),
            mailer,
            archive,
            prefix,
        )
    }

    #[tokio::test]
    async fn runs_with_an_explicit_date() {
        let mailer = Arc::new(RecordingMailer::default());
        let archive = Arc::new(RecordingArchive::default());

        let result = service(mailer.clone(), archive.clone(), "daily-reports/")
            .run(Some("2026-08-01".to_string()))
            .await
            .unwrap();

        assert_eq!(result.date, "2026-08-01");
        assert_eq!(result.incident_count, 0);
        assert!(matches!(result.email, EmailDelivery::Sent { .. }));

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent[0].0, "Daily Cloud Incident Report - 2026-08-01");
        assert!(sent[0].1.contains("No incidents recorded for this date."));

        let stored = archive.stored.lock().unwrap();
        assert_eq!(stored[0].0, "daily-reports/2026-08-01.md");
        assert_eq!(stored[0].1, result.markdown);
    }

    #[tokio::test]
    async fn date_defaults_to_today_utc() {
        let mailer = Arc::new(RecordingMailer::default());
        let archive = Arc::new(RecordingArchive::default());

        let result = service(mailer, archive, "daily-reports/").run(None).await.unwrap();
        assert_eq!(result.date, Utc::now().format("%Y-%m-%d").to_string());
    }

    #[tokio::test]
    async fn mail_failure_does_not_stop_the_archive() {
        let mailer = Arc::new(RecordingMailer { fail: true, ..Default::default() });
        let archive = Arc::new(RecordingArchive::default());

        let result = service(mailer, archive.clone(), "daily-reports")
            .run(Some("2026-08-01".to_string()))
            .await
            .unwrap();

        assert!(matches!(result.email, EmailDelivery::Failed { .. }));
        assert!(matches!(result.archive, ArchiveDelivery::Stored { .. }));
        // Prefix normalized to a trailing slash.
        assert_eq!(archive.stored.lock().unwrap()[0].0, "daily-reports/2026-08-01.md");
    }
}
