// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Value objects, pure policies and the ports (traits) through which the
//! application layer reaches the engine, object storage, form validator and
//! message catalogue.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Framework-free model of process definitions and instances

pub mod bff_config;
pub mod engine;
pub mod form;
pub mod messages;
pub mod pageable;
pub mod process_definition;
pub mod process_instance;
pub mod status;
pub mod storage;
