// Detector
// Runs the full pipeline: features → axis scores → ensemble → calibration → confidence

use crate::models::{
    round1, Breakdown, DetectRequest, DetectionResult, EnsembleScores, ModelInfo, NeuralBreakdown,
    METHOD_BREAKDOWN, METHOD_FALLBACK, METHOD_NEURAL,
};
use crate::services::config_store::AppConfig;
use crate::services::providers::{select_backend, NeuralBackend};
use crate::services::text_processor::{normalize_whitespace, tokenize_words, DEFAULT_CHUNK_CHARS};
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use super::aggregation::{calibrate_prediction, ensemble_prediction};
use super::confidence::calculate_confidence;
use super::neural::score_neural;
use super::statistical::{extract_statistical_features, statistical_probability};
use super::style::analyze_writing_style;
use super::tuning::Tuning;

const LOG_PREVIEW_CHARS: usize = 50;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DetectError {
    #[error("No input provided")]
    EmptyInput,
    #[error("Invalid or missing text")]
    InvalidText,
    #[error("Processing failed: {0}")]
    MalformedRequest(String),
}

/// Parse the stdin request body into a validated request
pub fn parse_request(raw: &str) -> Result<DetectRequest, DetectError> {
    if raw.trim().is_empty() {
        return Err(DetectError::EmptyInput);
    }

    let value: Value =
        serde_json::from_str(raw).map_err(|e| DetectError::MalformedRequest(e.to_string()))?;

    match value.get("text").and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(DetectRequest {
            text: text.to_string(),
        }),
        _ => Err(DetectError::InvalidText),
    }
}

/// AI-text detector bound to one neural backend and one set of tuning parameters
pub struct Detector {
    backend: Box<dyn NeuralBackend>,
    tuning: Tuning,
    chunk_chars: usize,
}

impl Detector {
    pub fn new(backend: Box<dyn NeuralBackend>, tuning: Tuning) -> Self {
        Self {
            backend,
            tuning,
            chunk_chars: DEFAULT_CHUNK_CHARS,
        }
    }

    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars.max(1);
        self
    }

    /// Build a detector from configuration, probing the neural backend once
    pub async fn from_config(config: &AppConfig) -> Self {
        let backend = select_backend(&config.neural).await;
        Self::new(backend, config.tuning.clone()).with_chunk_chars(config.neural.chunk_chars)
    }

    pub fn neural_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Analyze `text` and return the full scored result
    pub async fn detect(&self, text: &str) -> Result<DetectionResult, DetectError> {
        if text.trim().is_empty() {
            return Err(DetectError::InvalidText);
        }

        let start = Instant::now();
        let neural_ready = self.backend.is_available();
        let preview: String = normalize_whitespace(text).chars().take(LOG_PREVIEW_CHARS).collect();
        info!(chars = text.chars().count(), neural = neural_ready, "[DETECT] Analyzing: {}...", preview);

        // 1. Statistical analysis
        let features = extract_statistical_features(text);
        let statistical_score = statistical_probability(&features, &self.tuning);

        // 2. Neural analysis (neutral when unavailable)
        let neural = score_neural(self.backend.as_ref(), text, self.chunk_chars).await;

        // 3. Writing style
        let style_score = analyze_writing_style(text);

        // 4. Ensemble
        let scores = EnsembleScores {
            statistical: statistical_score,
            perplexity: neural.perplexity,
            coherence: neural.coherence,
            neural_embedding: neural.embedding,
            writing_style: style_score,
        };
        let raw_probability = ensemble_prediction(&scores, &self.tuning, neural_ready);
        debug!(?scores, raw_probability, "[DETECT] Ensemble");

        // 5. Calibration by length
        let word_count = tokenize_words(text).len();
        let probability = calibrate_prediction(raw_probability, word_count, &self.tuning);

        // 6. Confidence
        let confidence = calculate_confidence(probability, &scores);

        let processing_time = start.elapsed().as_millis() as u64;
        info!(
            probability = round1(probability),
            ?confidence,
            word_count,
            processing_ms = processing_time,
            "[DETECT] Complete"
        );

        Ok(DetectionResult {
            probability: round1(probability),
            confidence,
            breakdown: Breakdown {
                transformer_score: neural_ready.then_some(round1(neural.perplexity)),
                statistical_score: round1(statistical_score),
                feature_breakdown: features.rounded(),
                neural_breakdown: NeuralBreakdown {
                    perplexity_score: round1(neural.perplexity),
                    coherence_score: round1(neural.coherence),
                    embedding_score: round1(neural.embedding),
                    style_score: round1(style_score),
                    ensemble_score: round1(raw_probability),
                },
                method: METHOD_BREAKDOWN.to_string(),
            },
            model_info: ModelInfo {
                transformer_available: neural_ready,
                model_name: self.backend.model_name(),
                fallback_mode: !neural_ready,
                method: if neural_ready { METHOD_NEURAL } else { METHOD_FALLBACK }.to_string(),
            },
            processing_time,
        })
    }
}
