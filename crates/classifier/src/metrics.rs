//! Evaluation Metrics

use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Precision/recall/F1 for one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// Class label (encoded)
    pub label: usize,
    /// tp / (tp + fp); 0 when the class was never predicted
    pub precision: f64,
    /// tp / (tp + fn)
    pub recall: f64,
    /// Harmonic mean of precision and recall
    pub f1: f64,
    /// Rows with this true label
    pub support: usize,
}

/// Structured evaluation result for one model on one test partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    /// Fraction of exact matches
    pub accuracy: f64,
    /// Per-class breakdown, restricted to classes present in the truth
    pub per_class: Vec<ClassMetrics>,
}

/// Fraction of predictions that exactly match the truth
pub fn accuracy(truth: &[usize], predicted: &[usize]) -> Result<f64, ModelError> {
    if truth.len() != predicted.len() {
        return Err(ModelError::EvalLengthMismatch {
            truth: truth.len(),
            predicted: predicted.len(),
        });
    }
    if truth.is_empty() {
        return Ok(0.0);
    }
    let hits = truth
        .iter()
        .zip(predicted.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(hits as f64 / truth.len() as f64)
}

/// Accuracy plus a per-class report over the classes present in `truth`
pub fn evaluate(truth: &[usize], predicted: &[usize]) -> Result<EvalReport, ModelError> {
    let accuracy = accuracy(truth, predicted)?;
    let labels: BTreeSet<usize> = truth.iter().copied().collect();

    let per_class = labels
        .into_iter()
        .map(|label| {
            let tp = truth
                .iter()
                .zip(predicted.iter())
                .filter(|(&t, &p)| t == label && p == label)
                .count() as f64;
            let fp = truth
                .iter()
                .zip(predicted.iter())
                .filter(|(&t, &p)| t != label && p == label)
                .count() as f64;
            let fn_ = truth
                .iter()
                .zip(predicted.iter())
                .filter(|(&t, &p)| t == label && p != label)
                .count() as f64;

            let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
            let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            ClassMetrics {
                label,
                precision,
                recall,
                f1,
                support: truth.iter().filter(|&&t| t == label).count(),
            }
        })
        .collect();

    Ok(EvalReport {
        accuracy,
        per_class,
    })
}
