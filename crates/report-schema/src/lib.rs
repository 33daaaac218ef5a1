//! Crime Report Schema
//!
//! Raw record model and schema contract for the streaming pipeline.
//! Records arrive as JSON objects; the schema names which keys carry the
//! categorical fields, the coordinate pair, the label, and the timestamp.

mod error;
mod record;
mod schema;

pub use error::SchemaError;
pub use record::RawRecord;
pub use schema::ReportSchema;
