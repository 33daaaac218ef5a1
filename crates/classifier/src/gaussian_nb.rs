//! Gaussian Naive Bayes

use crate::ModelError;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Portion of the largest feature variance added to all variances,
/// keeping the likelihood finite for near-constant features
const DEFAULT_VAR_SMOOTHING: f64 = 1e-9;

/// Running per-feature statistics for one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ClassStats {
    /// Rows seen for this class
    count: f64,
    /// Per-feature running mean
    mean: Vec<f64>,
    /// Per-feature running population variance
    var: Vec<f64>,
}

impl ClassStats {
    fn zeroed(n_features: usize) -> Self {
        Self {
            count: 0.0,
            mean: vec![0.0; n_features],
            var: vec![0.0; n_features],
        }
    }

    /// Merge a batch's statistics into the running ones.
    ///
    /// Standard pooled mean/variance update: the combined variance is the
    /// weighted variances plus a between-means correction term.
    fn merge(&mut self, batch_count: f64, batch_mean: &[f64], batch_var: &[f64]) {
        let old_count = self.count;
        let total = old_count + batch_count;
        for feature in 0..self.mean.len() {
            let old_mean = self.mean[feature];
            let delta = old_mean - batch_mean[feature];
            self.mean[feature] =
                (old_count * old_mean + batch_count * batch_mean[feature]) / total;
            self.var[feature] = (old_count * self.var[feature]
                + batch_count * batch_var[feature]
                + (old_count * batch_count / total) * delta * delta)
                / total;
        }
        self.count = total;
    }
}

/// Gaussian Naive Bayes classifier with incremental updates.
///
/// The class set may grow across updates (newly declared classes get zeroed
/// statistics) but never shrinks, and an update that fails validation leaves
/// every statistic untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianNb {
    /// Feature width, fixed by the first update
    n_features: Option<usize>,
    /// Statistics per class label
    classes: BTreeMap<usize, ClassStats>,
    /// Variance smoothing factor
    var_smoothing: f64,
    /// Smoothing amount derived from the most recent update
    epsilon: f64,
}

impl GaussianNb {
    /// Create an unfitted model
    pub fn new() -> Self {
        Self {
            n_features: None,
            classes: BTreeMap::new(),
            var_smoothing: DEFAULT_VAR_SMOOTHING,
            epsilon: DEFAULT_VAR_SMOOTHING,
        }
    }

    /// Incrementally update class statistics from a training partition.
    ///
    /// `classes` declares every label that may appear in the wider batch,
    /// including labels absent from this training partition; those get
    /// statistics allocated so later predictions can name them. All
    /// validation happens before any statistic is mutated.
    pub fn update(
        &mut self,
        features: ArrayView2<'_, f64>,
        labels: &[usize],
        classes: &[usize],
    ) -> Result<(), ModelError> {
        let rows = features.nrows();
        if rows == 0 {
            return Err(ModelError::EmptyInput);
        }
        if rows != labels.len() {
            return Err(ModelError::LengthMismatch {
                features: rows,
                labels: labels.len(),
            });
        }
        let width = features.ncols();
        if let Some(expected) = self.n_features {
            if width != expected {
                return Err(ModelError::DimensionMismatch {
                    expected,
                    actual: width,
                });
            }
        }
        for &label in labels {
            if !classes.contains(&label) {
                return Err(ModelError::LabelOutsideClasses { label });
            }
        }

        // Validation done; everything below mutates.
        self.n_features = Some(width);
        self.epsilon = (self.var_smoothing * max_column_variance(features)).max(self.var_smoothing);

        for &class in classes {
            self.classes
                .entry(class)
                .or_insert_with(|| ClassStats::zeroed(width));
        }

        for (&class, stats) in self.classes.iter_mut() {
            let member_rows: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|(_, &label)| label == class)
                .map(|(row, _)| row)
                .collect();
            if member_rows.is_empty() {
                continue;
            }
            let (batch_mean, batch_var) = column_stats(features, &member_rows);
            stats.merge(member_rows.len() as f64, &batch_mean, &batch_var);
        }

        debug!(
            classes = self.classes.len(),
            samples = self.samples_seen(),
            "updated classifier"
        );
        Ok(())
    }

    /// Predict the most likely class for each feature row
    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Vec<usize>, ModelError> {
        let width = self.n_features.ok_or(ModelError::NotFitted)?;
        let total = self.samples_seen();
        if total == 0.0 {
            return Err(ModelError::NotFitted);
        }
        if features.ncols() != width {
            return Err(ModelError::DimensionMismatch {
                expected: width,
                actual: features.ncols(),
            });
        }

        let mut predictions = Vec::with_capacity(features.nrows());
        for row in features.outer_iter() {
            let mut best_class = 0;
            let mut best_score = f64::NEG_INFINITY;
            for (&class, stats) in &self.classes {
                let score = self.joint_log_likelihood(stats, total, row);
                if score > best_score {
                    best_score = score;
                    best_class = class;
                }
            }
            predictions.push(best_class);
        }
        Ok(predictions)
    }

    /// Log prior plus summed per-feature Gaussian log densities
    fn joint_log_likelihood(
        &self,
        stats: &ClassStats,
        total: f64,
        row: ndarray::ArrayView1<'_, f64>,
    ) -> f64 {
        // ln(0) = -inf keeps never-seen classes out of the argmax
        let mut score = (stats.count / total).ln();
        for (feature, &value) in row.iter().enumerate() {
            let variance = stats.var[feature] + self.epsilon;
            let delta = value - stats.mean[feature];
            score += -0.5 * (2.0 * std::f64::consts::PI * variance).ln()
                - delta * delta / (2.0 * variance);
        }
        score
    }

    /// Labels with allocated statistics, ascending
    pub fn classes(&self) -> Vec<usize> {
        self.classes.keys().copied().collect()
    }

    /// Number of classes with allocated statistics
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Total rows seen across all updates
    pub fn samples_seen(&self) -> f64 {
        self.classes.values().map(|s| s.count).sum()
    }

    /// Feature width, once fitted
    pub fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    /// True once at least one update succeeded
    pub fn is_fitted(&self) -> bool {
        self.n_features.is_some() && self.samples_seen() > 0.0
    }
}

impl Default for GaussianNb {
    fn default() -> Self {
        Self::new()
    }
}

/// Population mean and variance of the selected rows, per column
fn column_stats(features: ArrayView2<'_, f64>, rows: &[usize]) -> (Vec<f64>, Vec<f64>) {
    let width = features.ncols();
    let count = rows.len() as f64;
    let mut mean = vec![0.0; width];
    let mut var = vec![0.0; width];
    for &row in rows {
        for column in 0..width {
            mean[column] += features[[row, column]];
        }
    }
    for value in mean.iter_mut() {
        *value /= count;
    }
    for &row in rows {
        for column in 0..width {
            let delta = features[[row, column]] - mean[column];
            var[column] += delta * delta;
        }
    }
    for value in var.iter_mut() {
        *value /= count;
    }
    (mean, var)
}

/// Largest per-column population variance over all rows
fn max_column_variance(features: ArrayView2<'_, f64>) -> f64 {
    let all_rows: Vec<usize> = (0..features.nrows()).collect();
    let (_, var) = column_stats(features, &all_rows);
    var.into_iter().fold(0.0, f64::max)
}
