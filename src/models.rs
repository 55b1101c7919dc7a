// Backing classifier access.
//
// The structural analyzer consumes a pretrained binary classifier as an
// opaque scoring service: a fixed-order feature tuple goes in, a
// genuine-class probability comes out. The default implementation loads a
// serialized linear model (standardization + weights) from an ordered list
// of candidate files; the first one that loads wins. When none loads the
// analyzers fall back to rule-only scoring, so a missing model degrades the
// pipeline instead of failing it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PipelineError;

/// Opaque genuine-probability scoring service.
pub trait StructuralModel: Send + Sync {
    /// Probability of the genuine class, in [0, 1].
    fn predict_genuine(&self, features: &[f64]) -> Result<f64, PipelineError>;
    /// Hard label fallback for backends without probability support.
    fn predict_label(&self, features: &[f64]) -> Result<bool, PipelineError> {
        Ok(self.predict_genuine(features)? >= 0.5)
    }
    fn name(&self) -> &str;
}

/// Logistic model over standardized features, deserialized from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub name: String,
    pub weights: Vec<f64>,
    pub bias: f64,
    /// Per-feature standardization; empty means identity.
    #[serde(default)]
    pub means: Vec<f64>,
    #[serde(default)]
    pub scales: Vec<f64>,
}

impl LinearModel {
    pub fn from_json_file(path: &Path) -> Result<Self, PipelineError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::ModelUnavailable(format!("{}: {e}", path.display())))?;
        let model: LinearModel = serde_json::from_str(&raw)
            .map_err(|e| PipelineError::ModelUnavailable(format!("{}: {e}", path.display())))?;
        if model.weights.is_empty() {
            return Err(PipelineError::ModelUnavailable(format!(
                "{}: empty weight vector",
                path.display()
            )));
        }
        Ok(model)
    }
}

impl StructuralModel for LinearModel {
    fn predict_genuine(&self, features: &[f64]) -> Result<f64, PipelineError> {
        if features.len() != self.weights.len() {
            return Err(PipelineError::ModelUnavailable(format!(
                "feature count {} does not match model width {}",
                features.len(),
                self.weights.len()
            )));
        }
        let mut z = self.bias;
        for (i, (&x, &w)) in features.iter().zip(&self.weights).enumerate() {
            let x = match (self.means.get(i), self.scales.get(i)) {
                (Some(&mean), Some(&scale)) if scale != 0.0 => (x - mean) / scale,
                _ => x,
            };
            z += x * w;
        }
        Ok(1.0 / (1.0 + (-z).exp()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Filenames probed in preference order: newest artifact first, older
/// production snapshots as fallbacks.
const STRUCTURAL_MODEL_CANDIDATES: &[&str] = &[
    "structural_retrained.json",
    "structural_production.json",
    "structural.json",
];

/// Every backing model handle, loaded once at startup and shared read-only.
pub struct ModelSet {
    pub structural: Option<Box<dyn StructuralModel>>,
    /// Load outcome per candidate, for the status report.
    pub load_log: Vec<String>,
}

impl ModelSet {
    /// Try each candidate in order; first successful load wins.
    pub fn load(model_dir: &Path) -> Self {
        let mut load_log = Vec::new();
        let mut structural: Option<Box<dyn StructuralModel>> = None;

        for candidate in STRUCTURAL_MODEL_CANDIDATES {
            let path: PathBuf = model_dir.join(candidate);
            if !path.exists() {
                continue;
            }
            match LinearModel::from_json_file(&path) {
                Ok(model) => {
                    info!(model = %model.name, path = %path.display(), "structural model loaded");
                    load_log.push(format!("loaded {}", path.display()));
                    structural = Some(Box::new(model));
                    break;
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "structural model failed to load");
                    load_log.push(format!("failed {}: {err}", path.display()));
                }
            }
        }

        if structural.is_none() {
            load_log.push("no structural model available, rule-only fallback".to_string());
        }
        Self { structural, load_log }
    }

    pub fn none() -> Self {
        Self {
            structural: None,
            load_log: vec!["models disabled".to_string()],
        }
    }

    pub fn loaded_count(&self) -> usize {
        usize::from(self.structural.is_some())
    }
}
