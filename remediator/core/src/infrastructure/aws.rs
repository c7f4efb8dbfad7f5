// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Shared AWS SDK configuration.
//!
//! One `SdkConfig` is loaded at bootstrap and handed to every client
//! constructor (EC2, DynamoDB, SES, S3). Credentials come from the default
//! provider chain; only the region is pinned explicitly.

use aws_config::{BehaviorVersion, Region, SdkConfig};

pub async fn sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_owned()))
        .load()
        .await
}
