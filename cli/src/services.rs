// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Service wiring.
//!
//! Builds the application services from one resolved configuration and one
//! shared AWS SDK config. Every command goes through here, so the whole
//! binary has a single construction path.

use std::sync::Arc;

use aegis_remediator_core::application::dispatcher::RemediationDispatcher;
use aegis_remediator_core::application::pipeline::IncidentPipeline;
use aegis_remediator_core::application::report::DailyReportService;
use aegis_remediator_core::domain::repository::IncidentRepository;
use aegis_remediator_core::infrastructure::repositories::DynamoDbIncidentRepository;
use aegis_remediator_core::infrastructure::{
    aws, Ec2ActionGateway, RemediatorConfig, S3ReportArchive, SesReportMailer,
};

pub struct Services {
    pub pipeline: Arc<IncidentPipeline>,
    pub reports: Arc<DailyReportService>,
}

pub async fn build(config: &RemediatorConfig) -> Services {
    let sdk_config = aws::sdk_config(&config.aws_region).await;

    let gateway = Arc::new(Ec2ActionGateway::new(&sdk_config, config.action_timeout));
    let repository: Arc<dyn IncidentRepository> = Arc::new(DynamoDbIncidentRepository::new(
        &sdk_config,
        config.incident_table.clone(),
    ));

    let dispatcher = RemediationDispatcher::new(gateway, config.simulate_only);
    let pipeline = Arc::new(IncidentPipeline::new(dispatcher, repository.clone()));

    let mailer = Arc::new(SesReportMailer::new(
        &sdk_config,
        config.ses_sender.clone(),
        config.ses_recipients.clone(),
    ));
    let archive = Arc::new(S3ReportArchive::new(&sdk_config, config.report_bucket.clone()));
    let reports = Arc::new(DailyReportService::new(
        repository,
        mailer,
        archive,
        config.report_prefix.clone(),
    ));

    Services { pipeline, reports }
}
