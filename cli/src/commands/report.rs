// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{bail, Result};
use chrono::NaiveDate;
use colored::Colorize;

use aegis_remediator_core::application::report::{ArchiveDelivery, EmailDelivery};
use aegis_remediator_core::infrastructure::RemediatorConfig;

use crate::services;

pub async fn run(config: &RemediatorConfig, date: Option<String>) -> Result<()> {
    if let Some(date) = &date {
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            bail!("--date must be YYYY-MM-DD, got {date:?}");
        }
    }

    let services = services::build(config).await;
    let result = services.reports.run(date).await?;

    println!("{}", result.markdown);
    println!();

    match &result.email {
        EmailDelivery::Sent { message_id } => {
            println!("{} message id {message_id}", "email sent:".green());
        }
        EmailDelivery::Failed { error } => {
            eprintln!("{} {error}", "email failed:".red());
        }
    }

    match &result.archive {
        ArchiveDelivery::Stored { key } => {
            println!("{} {key}", "archived as:".green());
        }
        ArchiveDelivery::Failed { error } => {
            eprintln!("{} {error}", "archive failed:".red());
        }
    }

    Ok(())
}
