// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # AEGIS Remediator Core
//!
//! Alarm ingestion, classification, safety-gated remediation dispatch and
//! incident recording for cloud infrastructure alarms.
//!
//! # Architecture
//!
//! - **domain** — alarm payloads, classification, incident records, and the
//!   trait seams for the compute gateway, the incident store, and report
//!   delivery
//! - **application** — the remediation dispatcher, the incident pipeline,
//!   and the daily report service
//! - **infrastructure** — AWS-backed implementations (EC2, DynamoDB, SES, S3)
//!   plus in-memory repositories for development and testing
//! - **presentation** — HTTP surface (Axum)

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
