//! Frame Builder
//!
//! Converts a micro-batch of raw crime reports into a structured, fully
//! numeric frame: the three categorical columns are replaced by per-batch
//! integer codes and the timestamp is expanded into calendar features.

mod encoder;
mod frame;

pub use encoder::LabelEncoding;
pub use frame::{build_frame, ReportFrame, TIMESTAMP_FORMAT};

use report_schema::SchemaError;
use thiserror::Error;

/// Errors while building a frame from a micro-batch
#[derive(Debug, Error)]
pub enum FrameError {
    /// Record failed schema validation
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Timestamp column could not be parsed; fails the whole batch
    #[error("unparseable timestamp {value:?} at row {row}: {source}")]
    Timestamp {
        row: usize,
        value: String,
        source: chrono::ParseError,
    },

    /// Batch contained no records
    #[error("cannot build a frame from an empty batch")]
    EmptyBatch,
}
