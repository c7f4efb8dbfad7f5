// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! SES implementation of the report mailer.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ses::error::DisplayErrorContext;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use tracing::info;

use crate::domain::report::{MailerError, ReportMailer};

pub struct SesReportMailer {
    client: aws_sdk_ses::Client,
    sender: Option<String>,
    recipients: Vec<String>,
}

impl SesReportMailer {
    pub fn new(sdk_config: &SdkConfig, sender: Option<String>, recipients: Vec<String>) -> Self {
        Self {
            client: aws_sdk_ses::Client::new(sdk_config),
            sender,
            recipients,
        }
    }
}

#[async_trait]
impl ReportMailer for SesReportMailer {
    async fn send(&self, subject: &str, body: &str) -> Result<String, MailerError> {
        let sender = self.sender.as_deref().ok_or(MailerError::Config("SES_SENDER"))?;
        if self.recipients.is_empty() {
            return Err(MailerError::Config("SES_RECIPIENTS"));
        }

        let destination = Destination::builder()
            .set_to_addresses(Some(self.recipients.clone()))
            .build();

        let utf8 = |data: &str| {
            Content::builder()
                .data(data)
                .charset("UTF-8")
                .build()
                .map_err(|err| MailerError::Send(err.to_string()))
        };
        let message = Message::builder()
            .subject(utf8(subject)?)
            .body(Body::builder().text(utf8(body)?).build())
            .build();

        let response = self
            .client
            .send_email()
            .source(sender)
            .destination(destination)
            .message(message)
            .send()
            .await
            .map_err(|err| MailerError::Send(DisplayErrorContext(&err).to_string()))?;

        let message_id = response.message_id().to_string();
        info!(%message_id, recipients = self.recipients.len(), "report email sent");
        Ok(message_id)
    }
}
