// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! EC2 implementation of the compute action gateway.
//!
//! This is the only module that interprets EC2 error codes. A dry-run
//! request that would succeed comes back from the API as an error with
//! code `DryRunOperation`; that translation happens here, so everything
//! above the gateway sees a plain `Result` and never matches on error
//! text.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ec2::error::ProvideErrorMetadata;
use std::time::Duration;
use tracing::debug;

use crate::domain::gateway::{ComputeActionGateway, GatewayError, InstanceAction};

pub struct Ec2ActionGateway {
    client: aws_sdk_ec2::Client,
    call_timeout: Duration,
}

impl Ec2ActionGateway {
    pub fn new(sdk_config: &SdkConfig, call_timeout: Duration) -> Self {
        Self {
            client: aws_sdk_ec2::Client::new(sdk_config),
            call_timeout,
        }
    }

    async fn execute(
        &self,
        action: InstanceAction,
        instance_id: &str,
        dry_run: bool,
    ) -> Result<(), GatewayError> {
        debug!(action = %action, instance_id, dry_run, "issuing EC2 call");

        match action {
            InstanceAction::Reboot => {
                let call = self
                    .client
                    .reboot_instances()
                    .instance_ids(instance_id)
                    .dry_run(dry_run)
                    .send();
                match tokio::time::timeout(self.call_timeout, call).await {
                    Err(_) => Err(GatewayError::Timeout(self.call_timeout)),
                    Ok(Ok(_)) => Ok(()),
                    Ok(Err(err)) => classify_api_error(err, dry_run),
                }
            }
            InstanceAction::Start => {
                let call = self
                    .client
                    .start_instances()
                    .instance_ids(instance_id)
                    .dry_run(dry_run)
                    .send();
                match tokio::time::timeout(self.call_timeout, call).await {
                    Err(_) => Err(GatewayError::Timeout(self.call_timeout)),
                    Ok(Ok(_)) => Ok(()),
                    Ok(Err(err)) => classify_api_error(err, dry_run),
                }
            }
        }
    }
}

#[async_trait]
impl ComputeActionGateway for Ec2ActionGateway {
    async fn dry_run(&self, action: InstanceAction, instance_id: &str) -> Result<(), GatewayError> {
        self.execute(action, instance_id, true).await
    }

    async fn apply(&self, action: InstanceAction, instance_id: &str) -> Result<(), GatewayError> {
        self.execute(action, instance_id, false).await
    }
}

/// Map an EC2 API error to the gateway taxonomy.
///
/// During a dry run, `DryRunOperation` is the passing verdict.
fn classify_api_error<E>(err: E, dry_run: bool) -> Result<(), GatewayError>
where
    E: ProvideErrorMetadata + std::fmt::Display,
{
    let code = err.code().map(str::to_owned);
    let message = err
        .message()
        .map(str::to_owned)
        .unwrap_or_else(|| err.to_string());

    match code.as_deref() {
        Some("DryRunOperation") if dry_run => Ok(()),
        Some("UnauthorizedOperation") => Err(GatewayError::Denied(message)),
        Some(code) if code.starts_with("InvalidInstanceID") => {
            Err(GatewayError::InvalidTarget(message))
        }
        _ => Err(GatewayError::Api(message)),
    }
}
