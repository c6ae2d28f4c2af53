//! Pipeline orchestration
//!
//! This module sequences the three stages of a run:
//! 1. Resolve the collection endpoint
//! 2. Download every page of the collection
//! 3. Build the corpus from the downloaded pages
//!
//! and reports how far the run got.

mod orchestrator;
mod report;

pub use orchestrator::Pipeline;
pub use report::{RunReport, StageResult};
