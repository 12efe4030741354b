// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure
//!
//! Adapters behind the domain ports.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** reqwest clients for the engine, object store and form
//!   validator; static message catalogue; in-memory storage

pub mod engine_client;
pub mod form_validator;
pub mod messages;
pub mod storage;
pub mod url_path;

pub use engine_client::CamundaEngineClient;
pub use form_validator::HttpFormValidator;
pub use messages::StaticMessageResolver;
