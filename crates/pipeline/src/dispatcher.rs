//! Batch Dispatcher
//!
//! Owns the global model. One `dispatch` call processes one micro-batch to
//! completion; taking `&mut self` is what enforces the single-writer
//! discipline over the global model.

use crate::trainer::{train_and_evaluate, BatchReport};
use crate::{PipelineError, TrainConfig};
use classifier::GaussianNb;
use frame_builder::build_frame;
use report_schema::RawRecord;
use tracing::debug;

/// What happened to one micro-batch
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    /// Batch was empty; nothing was built or trained
    Skipped,
    /// Batch was trained and evaluated
    Trained(BatchReport),
}

/// Feeds micro-batches through the frame builder and trainer,
/// carrying the global model across batches
pub struct BatchDispatcher {
    config: TrainConfig,
    global: GaussianNb,
}

impl BatchDispatcher {
    /// Create a dispatcher with a fresh global model
    pub fn new(config: TrainConfig) -> Self {
        Self {
            config,
            global: GaussianNb::new(),
        }
    }

    /// Process one micro-batch. Empty batches are a no-op; any failure is
    /// batch-fatal and propagates untouched.
    pub fn dispatch(&mut self, records: &[RawRecord]) -> Result<BatchOutcome, PipelineError> {
        if records.is_empty() {
            debug!("empty micro-batch, skipping");
            return Ok(BatchOutcome::Skipped);
        }

        let frame = build_frame(records)?;
        let report = train_and_evaluate(&frame, &mut self.global, &self.config)?;
        Ok(BatchOutcome::Trained(report))
    }

    /// The cumulative global model
    pub fn global(&self) -> &GaussianNb {
        &self.global
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classifier::ModelError;

    fn record(category: &str, day: &str, x: f64) -> RawRecord {
        RawRecord {
            timestamp: "2015-05-13 12:00:00".to_string(),
            category: category.to_string(),
            day_of_week: day.to_string(),
            district: "MISSION".to_string(),
            x,
            y: 37.77,
        }
    }

    fn batch() -> Vec<RawRecord> {
        vec![
            record("THEFT", "Monday", -122.41),
            record("THEFT", "Monday", -122.42),
            record("ASSAULT", "Tuesday", -122.43),
            record("ASSAULT", "Tuesday", -122.44),
            record("THEFT", "Wednesday", -122.45),
        ]
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut dispatcher = BatchDispatcher::new(TrainConfig::default());
        let snapshot = dispatcher.global().clone();

        let outcome = dispatcher.dispatch(&[]).unwrap();
        assert!(matches!(outcome, BatchOutcome::Skipped));
        assert_eq!(*dispatcher.global(), snapshot);
    }

    #[test]
    fn test_non_empty_batch_trains_global() {
        let mut dispatcher = BatchDispatcher::new(TrainConfig::default());
        let outcome = dispatcher.dispatch(&batch()).unwrap();

        match outcome {
            BatchOutcome::Trained(report) => {
                assert_eq!(report.rows, 5);
                assert_eq!(report.classes, 2);
            }
            BatchOutcome::Skipped => panic!("batch should have trained"),
        }
        assert!(dispatcher.global().is_fitted());
    }

    #[test]
    fn test_global_state_accumulates_across_batches() {
        let mut dispatcher = BatchDispatcher::new(TrainConfig::default());
        dispatcher.dispatch(&batch()).unwrap();
        let after_first = dispatcher.global().samples_seen();

        dispatcher.dispatch(&batch()).unwrap();
        assert!(dispatcher.global().samples_seen() > after_first);
    }

    #[test]
    fn test_failed_batch_propagates_and_preserves_global() {
        let mut dispatcher = BatchDispatcher::new(TrainConfig::default());
        dispatcher.dispatch(&batch()).unwrap();
        let snapshot = dispatcher.global().clone();

        let single_class: Vec<RawRecord> = batch()
            .into_iter()
            .map(|mut r| {
                r.category = "THEFT".to_string();
                r
            })
            .collect();
        let err = dispatcher.dispatch(&single_class).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Model(ModelError::InsufficientClasses { .. })
        ));
        assert_eq!(*dispatcher.global(), snapshot);
    }
}
