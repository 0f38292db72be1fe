pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{run_deblur, run_deblur_reported};
pub use types::{NoOpReporter, PipelineStage, ProgressReporter};
