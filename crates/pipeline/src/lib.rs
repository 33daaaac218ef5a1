//! Crime Stream Pipeline
//!
//! Wires the frame builder and the incremental classifier into a streaming
//! micro-batch loop: each non-empty batch is converted into a feature frame,
//! split 80/20, and used to update both the long-lived global model and a
//! fresh per-batch local model, whose held-out metrics are reported side by
//! side.

mod config;
mod dispatcher;
mod ingest;
mod trainer;

pub use config::{IngestConfig, PipelineConfig, TrainConfig};
pub use dispatcher::{BatchDispatcher, BatchOutcome};
pub use ingest::{decode_line, read_lines, MicroBatcher, StreamEvent};
pub use trainer::{train_and_evaluate, BatchReport};

use classifier::ModelError;
use frame_builder::FrameError;
use report_schema::SchemaError;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Errors from batch processing or ingestion; all batch-fatal
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Frame construction failed
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Model update, split, or prediction failed
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Record did not match the schema
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Line was not valid JSON
    #[error("invalid JSON line: {0}")]
    Decode(#[from] serde_json::Error),

    /// Stream read failed
    #[error("ingestion I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize logging for the pipeline binary
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
