// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

pub mod formats;
pub mod sinks;
pub mod types;

pub use formats::json::JsonReportGenerator;
pub use sinks::{FileSink, MemorySink, ResultSink, ResultSinks};
pub use types::{MutationOutcome, RunReport, RunSummary};
