// Tuning Parameters
// Weights, logistic centres and calibration bands for the ensemble.
// Defaults reproduce the shipped scoring; the config file may override any field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Logistic squash `100 / (1 + e^(-(x - center) / slope))`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Logistic {
    pub center: f64,
    pub slope: f64,
}

impl Logistic {
    pub fn apply(&self, x: f64) -> f64 {
        100.0 / (1.0 + (-(x - self.center) / self.slope).exp())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureWeights {
    pub ai_phrase_density: f64,
    pub sentence_uniformity: f64,
    pub vocabulary_complexity: f64,
    pub transition_density: f64,
    pub repetition_score: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            ai_phrase_density: 0.35,
            sentence_uniformity: 0.25,
            vocabulary_complexity: 0.15,
            transition_density: 0.20,
            repetition_score: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleWeights {
    pub statistical: f64,
    pub perplexity: f64,
    pub coherence: f64,
    pub neural_embedding: f64,
    pub writing_style: f64,
}

impl EnsembleWeights {
    pub fn neural() -> Self {
        Self {
            statistical: 0.10,
            perplexity: 0.45,
            coherence: 0.20,
            neural_embedding: 0.10,
            writing_style: 0.15,
        }
    }

    pub fn fallback() -> Self {
        Self {
            statistical: 0.60,
            perplexity: 0.0,
            coherence: 0.0,
            neural_embedding: 0.0,
            writing_style: 0.40,
        }
    }
}

/// `raw * scale + offset`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinearAdjust {
    pub scale: f64,
    pub offset: f64,
}

impl LinearAdjust {
    pub fn apply(&self, raw: f64) -> f64 {
        raw * self.scale + self.offset
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CalibrationBands {
    /// Word counts below this use `very_short`
    pub very_short_below: usize,
    /// Word counts below this (and not very short) use `short`
    pub short_below: usize,
    /// Word counts above this use `long`
    pub long_above: usize,
    pub very_short: LinearAdjust,
    pub short: LinearAdjust,
    pub medium: LinearAdjust,
    pub long: LinearAdjust,
}

impl Default for CalibrationBands {
    fn default() -> Self {
        Self {
            very_short_below: 30,
            short_below: 100,
            long_above: 300,
            very_short: LinearAdjust { scale: 0.75, offset: 20.0 },
            short: LinearAdjust { scale: 0.9, offset: 10.0 },
            medium: LinearAdjust { scale: 1.05, offset: -2.0 },
            long: LinearAdjust { scale: 1.12, offset: -6.0 },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tuning {
    #[serde(default = "default_statistical_curve")]
    pub statistical_curve: Logistic,
    #[serde(default = "default_ensemble_curve")]
    pub ensemble_curve: Logistic,
    #[serde(default)]
    pub feature_weights: FeatureWeights,
    #[serde(default = "EnsembleWeights::neural")]
    pub neural_weights: EnsembleWeights,
    #[serde(default = "EnsembleWeights::fallback")]
    pub fallback_weights: EnsembleWeights,
    #[serde(default)]
    pub calibration: CalibrationBands,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            statistical_curve: default_statistical_curve(),
            ensemble_curve: default_ensemble_curve(),
            feature_weights: FeatureWeights::default(),
            neural_weights: EnsembleWeights::neural(),
            fallback_weights: EnsembleWeights::fallback(),
            calibration: CalibrationBands::default(),
        }
    }
}

impl Tuning {
    /// Overlay a partial JSON object onto the defaults, at any nesting depth
    pub fn from_overrides(overrides: Value) -> Result<Self, serde_json::Error> {
        if overrides.is_null() {
            return Ok(Self::default());
        }
        let mut merged = serde_json::to_value(Self::default())?;
        merge_json(&mut merged, overrides);
        serde_json::from_value(merged)
    }
}

fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                merge_json(base_map.entry(key).or_insert(Value::Null), value);
            }
        }
        (slot, value) => *slot = value,
    }
}

fn default_statistical_curve() -> Logistic { Logistic { center: 52.0, slope: 9.0 } }
fn default_ensemble_curve() -> Logistic { Logistic { center: 42.0, slope: 8.0 } }
