//! Pipelines turning simulation output into a rolling stock scheduling
//! request.

mod engine;
mod error;
mod output;
pub mod passenger;
pub mod request;
pub mod scenario;


pub use engine::{Filter, Pipeline, Sink, Source};
pub use error::PipelineError;
pub use request::{RequestPipe, request_pipeline, request_pipeline_with_strategy};
