//! Pipeline Configuration
//!
//! Plain serde structs with defaults; the binary may load them from an
//! optional JSON file.

use crate::PipelineError;
use report_schema::ReportSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Training and evaluation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Fraction of each batch held out for testing
    pub test_fraction: f64,
    /// Seed for the shuffle behind the train/test split
    pub split_seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            split_seed: 0,
        }
    }
}

/// Streaming source parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Host of the line-oriented JSON source
    pub host: String,
    /// Port of the source
    pub port: u16,
    /// Micro-batch window in seconds
    pub batch_interval_secs: u64,
    /// Bound of the record channel between reader and batcher
    pub channel_capacity: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9999,
            batch_interval_secs: 3,
            channel_capacity: 1024,
        }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Column schema of incoming reports
    pub schema: ReportSchema,
    /// Trainer parameters
    pub train: TrainConfig,
    /// Streaming source parameters
    pub ingest: IngestConfig,
}

impl PipelineConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.train.test_fraction, 0.2);
        assert_eq!(config.train.split_seed, 0);
        assert_eq!(config.ingest.batch_interval_secs, 3);
        assert_eq!(config.schema.timestamp, "Dates");
    }

    #[test]
    fn test_partial_override() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"train": {"split_seed": 7}}"#).unwrap();
        assert_eq!(config.train.split_seed, 7);
        assert_eq!(config.train.test_fraction, 0.2);
        assert_eq!(config.ingest.port, 9999);
    }
}
