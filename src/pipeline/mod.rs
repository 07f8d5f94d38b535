//! Check scheduling.
//!
//! - [`Pipeline`] - submits runs and owns their lifecycle
//! - [`execute_batch`] - bounded parallel execution of one phase
//! - [`BackgroundQueue`] - worker threads that run phase 2

pub mod background;
pub mod orchestrator;
pub mod pool;

pub use background::BackgroundQueue;
pub use orchestrator::{Pipeline, PipelineSettings, RunHandle};
pub use pool::execute_batch;
