// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Process BFF Core
//!
//! Backend-for-frontend over a remote process engine: definition listings,
//! role-aware instance status, finished-instance history and start-form
//! submission.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Domain model, use cases, engine/storage/validator adapters and HTTP API

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
