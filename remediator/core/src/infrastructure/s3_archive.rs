// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! S3 implementation of the report archive.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use crate::domain::report::{ArchiveError, ReportArchive};

pub struct S3ReportArchive {
    client: aws_sdk_s3::Client,
    bucket: Option<String>,
}

impl S3ReportArchive {
    pub fn new(sdk_config: &SdkConfig, bucket: Option<String>) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(sdk_config),
            bucket,
        }
    }
}

#[async_trait]
impl ReportArchive for S3ReportArchive {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), ArchiveError> {
        let bucket = self
            .bucket
            .as_deref()
            .ok_or(ArchiveError::Config("REPORT_BUCKET_NAME"))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .content_disposition("inline")
            .send()
            .await
            .map_err(|err| ArchiveError::Upload(DisplayErrorContext(&err).to_string()))?;

        info!(bucket, key, "report object stored");
        Ok(())
    }
}
