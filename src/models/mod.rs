// textprobe Data Models
// Request/response shapes of the detector's JSON contract

use serde::{Deserialize, Serialize};

pub const METHOD_BREAKDOWN: &str = "Advanced Hybrid Neural + Statistical + Style Analysis";
pub const METHOD_NEURAL: &str = "Advanced Hybrid Detection v2.0";
pub const METHOD_FALLBACK: &str = "Enhanced Statistical + Style Detection v2.0";
pub const MODEL_NAME_FALLBACK: &str = "Enhanced Statistical + Style";

/// Neutral score used whenever a signal is unavailable or inconclusive
pub const NEUTRAL_SCORE: f64 = 50.0;

// ============ Detection Request ============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectRequest {
    pub text: String,
}

// ============ Scores ============

/// Statistical features, each in [0, 100]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeatureSet {
    pub ai_phrase_density: f64,
    pub sentence_uniformity: f64,
    pub vocabulary_complexity: f64,
    pub transition_density: f64,
    pub repetition_score: f64,
}

impl FeatureSet {
    pub fn neutral() -> Self {
        Self {
            ai_phrase_density: NEUTRAL_SCORE,
            sentence_uniformity: NEUTRAL_SCORE,
            vocabulary_complexity: NEUTRAL_SCORE,
            transition_density: NEUTRAL_SCORE,
            repetition_score: NEUTRAL_SCORE,
        }
    }

    pub fn rounded(&self) -> Self {
        Self {
            ai_phrase_density: round1(self.ai_phrase_density),
            sentence_uniformity: round1(self.sentence_uniformity),
            vocabulary_complexity: round1(self.vocabulary_complexity),
            transition_density: round1(self.transition_density),
            repetition_score: round1(self.repetition_score),
        }
    }
}

/// Per-axis scores fed to the ensemble, each in [0, 100]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EnsembleScores {
    pub statistical: f64,
    pub perplexity: f64,
    pub coherence: f64,
    pub neural_embedding: f64,
    pub writing_style: f64,
}

impl EnsembleScores {
    pub fn values(&self) -> [f64; 5] {
        [
            self.statistical,
            self.perplexity,
            self.coherence,
            self.neural_embedding,
            self.writing_style,
        ]
    }
}

/// Neural sub-scores; all neutral when no backend is available
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NeuralScores {
    pub perplexity: f64,
    pub coherence: f64,
    pub embedding: f64,
}

impl NeuralScores {
    pub fn neutral() -> Self {
        Self {
            perplexity: NEUTRAL_SCORE,
            coherence: NEUTRAL_SCORE,
            embedding: NEUTRAL_SCORE,
        }
    }
}

// ============ Detection Response ============

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NeuralBreakdown {
    pub perplexity_score: f64,
    pub coherence_score: f64,
    pub embedding_score: f64,
    pub style_score: f64,
    pub ensemble_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Breakdown {
    /// Perplexity score when a neural backend is available, otherwise null
    pub transformer_score: Option<f64>,
    pub statistical_score: f64,
    pub feature_breakdown: FeatureSet,
    pub neural_breakdown: NeuralBreakdown,
    pub method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    pub transformer_available: bool,
    pub model_name: String,
    pub fallback_mode: bool,
    pub method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionResult {
    pub probability: f64,
    pub confidence: Confidence,
    pub breakdown: Breakdown,
    pub model_info: ModelInfo,
    /// Wall-clock milliseconds spent in detection
    pub processing_time: u64,
}

// ============ Monitoring Summary ============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccuracyIndicators {
    pub high_confidence: bool,
    pub clear_decision: bool,
    pub fast_processing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionSummary {
    pub probability: f64,
    pub confidence: Confidence,
    pub processing_time: u64,
    pub method: String,
    pub neural_available: bool,
    pub accuracy_indicators: AccuracyIndicators,
}

impl From<&DetectionResult> for DetectionSummary {
    fn from(result: &DetectionResult) -> Self {
        Self {
            probability: result.probability,
            confidence: result.confidence,
            processing_time: result.processing_time,
            method: result.model_info.method.clone(),
            neural_available: result.model_info.transformer_available,
            accuracy_indicators: AccuracyIndicators {
                high_confidence: result.confidence == Confidence::High,
                clear_decision: (result.probability - NEUTRAL_SCORE).abs() > 30.0,
                fast_processing: result.processing_time < 2000,
            },
        }
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result(probability: f64, confidence: Confidence, processing_time: u64) -> DetectionResult {
        DetectionResult {
            probability,
            confidence,
            breakdown: Breakdown {
                transformer_score: None,
                statistical_score: 40.0,
                feature_breakdown: FeatureSet::neutral(),
                neural_breakdown: NeuralBreakdown {
                    perplexity_score: 50.0,
                    coherence_score: 50.0,
                    embedding_score: 50.0,
                    style_score: 50.0,
                    ensemble_score: 45.0,
                },
                method: METHOD_BREAKDOWN.to_string(),
            },
            model_info: ModelInfo {
                transformer_available: false,
                model_name: MODEL_NAME_FALLBACK.to_string(),
                fallback_mode: true,
                method: METHOD_FALLBACK.to_string(),
            },
            processing_time,
        }
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(55.04), 55.0);
        assert_eq!(round1(55.06), 55.1);
        assert_eq!(round1(100.0), 100.0);
    }

    #[test]
    fn test_result_serializes_null_transformer_score() {
        let json = serde_json::to_value(sample_result(42.0, Confidence::Low, 3)).unwrap();
        assert!(json["breakdown"]["transformer_score"].is_null());
        assert_eq!(json["confidence"], "Low");
        assert_eq!(json["model_info"]["fallback_mode"], true);
        assert_eq!(json["processing_time"], 3);
        assert_eq!(json["breakdown"]["feature_breakdown"]["ai_phrase_density"], 50.0);
    }

    #[test]
    fn test_summary_indicators() {
        let summary = DetectionSummary::from(&sample_result(85.0, Confidence::High, 120));
        assert!(summary.accuracy_indicators.high_confidence);
        assert!(summary.accuracy_indicators.clear_decision);
        assert!(summary.accuracy_indicators.fast_processing);
        assert!(!summary.neural_available);

        let slow = DetectionSummary::from(&sample_result(60.0, Confidence::Medium, 2500));
        assert!(!slow.accuracy_indicators.clear_decision);
        assert!(!slow.accuracy_indicators.fast_processing);
    }
}
