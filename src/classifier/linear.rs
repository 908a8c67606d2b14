//! Linear status model: standard scaler followed by a multinomial-logistic
//! layer, one weight row per label.
//!
//! File format (JSON):
//! ```json
//! {
//!   "name": "status-linear-v1",
//!   "labels": ["Healthy", "Moderate Stress", "High Stress"],
//!   "scaler": { "mean": [6 floats], "scale": [6 floats] },
//!   "weights": [[6 floats], ...],
//!   "bias": [one per label]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ClassificationError, StatusClassifier};
use crate::types::{SensorReading, StatusLabel, FEATURE_NAMES, NUM_FEATURES};

/// Floor on the per-feature scale; avoids division by ~0 for constant features.
const MIN_SCALE: f64 = 1e-8;

/// Fixed zero-mean unit-variance transform fitted at training time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardScaler {
    pub mean: [f64; NUM_FEATURES],
    pub scale: [f64; NUM_FEATURES],
}

impl StandardScaler {
    pub fn transform(&self, raw: &[f64; NUM_FEATURES]) -> [f64; NUM_FEATURES] {
        let mut z = [0.0_f64; NUM_FEATURES];
        for i in 0..NUM_FEATURES {
            z[i] = (raw[i] - self.mean[i]) / self.scale[i].abs().max(MIN_SCALE);
        }
        z
    }
}

fn default_model_name() -> String {
    "status-linear".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearStatusModel {
    #[serde(default = "default_model_name")]
    pub name: String,
    pub labels: Vec<StatusLabel>,
    pub scaler: StandardScaler,
    pub weights: Vec<[f64; NUM_FEATURES]>,
    pub bias: Vec<f64>,
}

impl LinearStatusModel {
    /// Load and validate a model file.
    pub fn load(path: &Path) -> Result<Self, ClassificationError> {
        let data = std::fs::read(path).map_err(|source| ClassificationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_slice(&data)?;
        model.validate()?;

        info!(
            path = %path.display(),
            model = %model.name,
            labels = model.labels.len(),
            "Loaded status classifier"
        );
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, ClassificationError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Check the label/weight/bias shapes agree and every parameter is finite.
    pub fn validate(&self) -> Result<(), ClassificationError> {
        let k = self.labels.len();
        if k == 0 {
            return Err(ClassificationError::Model("model has no labels".to_string()));
        }
        if self.weights.len() != k {
            return Err(ClassificationError::Model(format!(
                "weight row count mismatch: {} labels, {} rows",
                k,
                self.weights.len()
            )));
        }
        if self.bias.len() != k {
            return Err(ClassificationError::Model(format!(
                "bias length mismatch: {} labels, {} biases",
                k,
                self.bias.len()
            )));
        }

        let params = self
            .scaler
            .mean
            .iter()
            .chain(&self.scaler.scale)
            .chain(self.weights.iter().flatten())
            .chain(&self.bias);
        if params.copied().any(|p| !p.is_finite()) {
            return Err(ClassificationError::Model(
                "model contains non-finite parameters".to_string(),
            ));
        }
        Ok(())
    }

    /// Raw per-label scores `w·z + b` for a reading.
    pub fn scores(&self, reading: &SensorReading) -> Result<Vec<f64>, ClassificationError> {
        let raw = reading.features();
        if let Some((i, value)) = raw.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ClassificationError::InvalidFeature {
                name: FEATURE_NAMES[i],
                value: *value,
            });
        }

        let z = self.scaler.transform(&raw);
        Ok(self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(&z).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect())
    }
}

impl StatusClassifier for LinearStatusModel {
    fn predict(&self, reading: &SensorReading) -> Result<StatusLabel, ClassificationError> {
        let scores = self.scores(reading)?;
        // First maximum wins, matching label order on exact ties.
        let best = scores
            .iter()
            .enumerate()
            .fold(0, |best, (i, s)| if *s > scores[best] { i } else { best });
        Ok(self.labels[best].clone())
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
