// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod definitions;
pub mod error;
pub mod history;
pub mod instances;
pub mod start_process;

// Re-export use cases for convenience
pub use definitions::DefinitionService;
pub use error::ProcessError;
pub use history::{HistoryEnricher, HistoryService};
pub use instances::InstanceService;
pub use start_process::{StandardStartProcessUseCase, StartProcessUseCase};
