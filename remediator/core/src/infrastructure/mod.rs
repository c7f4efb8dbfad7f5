// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod aws;
pub mod config;
pub mod ec2_gateway;
pub mod repositories;
pub mod s3_archive;
pub mod ses_mailer;

pub use config::RemediatorConfig;
pub use ec2_gateway::Ec2ActionGateway;
pub use s3_archive::S3ReportArchive;
pub use ses_mailer::SesReportMailer;
