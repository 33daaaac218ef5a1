//! Incremental Trainer/Evaluator
//!
//! Per batch: assemble the feature matrix, split deterministically, update
//! the global model in place and a fresh local model, then score both on
//! the held-out partition.

use crate::{PipelineError, TrainConfig};
use classifier::{evaluate, train_test_split, EvalReport, GaussianNb, ModelError};
use frame_builder::ReportFrame;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Width of the assembled feature vector:
/// [x, y, day_of_week, district, hour, month, year]
pub const FEATURE_WIDTH: usize = 7;

/// Structured result of one batch's training round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Rows in the batch
    pub rows: usize,
    /// Distinct label classes in the batch
    pub classes: usize,
    /// Training partition size
    pub train_rows: usize,
    /// Test partition size
    pub test_rows: usize,
    /// Held-out metrics of the cumulative global model
    pub global: EvalReport,
    /// Held-out metrics of the batch-only local model
    pub local: EvalReport,
}

/// Train both models on one frame and evaluate them on its held-out rows.
///
/// The global model is only mutated after every precondition has been
/// checked: a batch with fewer than 2 label classes, or any shape problem,
/// leaves it exactly as it was.
pub fn train_and_evaluate(
    frame: &ReportFrame,
    global: &mut GaussianNb,
    config: &TrainConfig,
) -> Result<BatchReport, PipelineError> {
    // Class set comes from the whole batch, not just the training rows,
    // so test-only classes get statistics allocated.
    let classes: Vec<usize> = frame
        .category_code
        .iter()
        .copied()
        .collect::<BTreeSet<usize>>()
        .into_iter()
        .collect();
    if classes.len() < 2 {
        return Err(ModelError::InsufficientClasses {
            found: classes.len(),
        }
        .into());
    }

    let split = train_test_split(frame.len(), config.test_fraction, config.split_seed)?;

    let train_x = gather_features(frame, &split.train);
    let train_y = gather_labels(frame, &split.train);
    let test_x = gather_features(frame, &split.test);
    let test_y = gather_labels(frame, &split.test);

    debug!(
        train_rows = split.train.len(),
        test_rows = split.test.len(),
        classes = classes.len(),
        "training on batch"
    );

    global.update(train_x.view(), &train_y, &classes)?;
    let mut local = GaussianNb::new();
    local.update(train_x.view(), &train_y, &classes)?;

    let global_predicted = global.predict(test_x.view())?;
    let local_predicted = local.predict(test_x.view())?;

    let global_report = evaluate(&test_y, &global_predicted)?;
    let local_report = evaluate(&test_y, &local_predicted)?;

    info!(
        accuracy = global_report.accuracy,
        classes_known = global.n_classes(),
        "global model evaluated"
    );
    info!(accuracy = local_report.accuracy, "local model evaluated");
    for class in &global_report.per_class {
        debug!(
            label = class.label,
            precision = class.precision,
            recall = class.recall,
            f1 = class.f1,
            support = class.support,
            "global per-class metrics"
        );
    }
    for class in &local_report.per_class {
        debug!(
            label = class.label,
            precision = class.precision,
            recall = class.recall,
            f1 = class.f1,
            support = class.support,
            "local per-class metrics"
        );
    }

    Ok(BatchReport {
        rows: frame.len(),
        classes: classes.len(),
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        global: global_report,
        local: local_report,
    })
}

/// Assemble the fixed feature matrix for the given rows
fn gather_features(frame: &ReportFrame, rows: &[usize]) -> Array2<f64> {
    let mut features = Array2::zeros((rows.len(), FEATURE_WIDTH));
    for (out, &row) in rows.iter().enumerate() {
        features[[out, 0]] = frame.x[row];
        features[[out, 1]] = frame.y[row];
        features[[out, 2]] = frame.day_of_week_code[row] as f64;
        features[[out, 3]] = frame.district_code[row] as f64;
        features[[out, 4]] = f64::from(frame.hour[row]);
        features[[out, 5]] = f64::from(frame.month[row]);
        features[[out, 6]] = f64::from(frame.year[row]);
    }
    features
}

fn gather_labels(frame: &ReportFrame, rows: &[usize]) -> Vec<usize> {
    rows.iter().map(|&row| frame.category_code[row]).collect()
}
