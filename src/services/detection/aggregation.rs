// Aggregation Logic
// Combines per-axis scores into a raw probability and calibrates it by text length

use crate::models::EnsembleScores;
use super::tuning::{EnsembleWeights, Tuning};

/// Weight profile for the current backend capability
pub fn ensemble_weights(tuning: &Tuning, neural_available: bool) -> &EnsembleWeights {
    if neural_available {
        &tuning.neural_weights
    } else {
        &tuning.fallback_weights
    }
}

/// Weighted axis sum squashed onto [0, 100]
pub fn ensemble_prediction(scores: &EnsembleScores, tuning: &Tuning, neural_available: bool) -> f64 {
    let w = ensemble_weights(tuning, neural_available);
    let weighted = scores.statistical * w.statistical
        + scores.perplexity * w.perplexity
        + scores.coherence * w.coherence
        + scores.neural_embedding * w.neural_embedding
        + scores.writing_style * w.writing_style;

    tuning.ensemble_curve.apply(weighted)
}

/// Pull short texts toward a baseline and stretch long ones
pub fn calibrate_prediction(raw_probability: f64, word_count: usize, tuning: &Tuning) -> f64 {
    let bands = &tuning.calibration;
    let adjust = if word_count < bands.very_short_below {
        bands.very_short
    } else if word_count < bands.short_below {
        bands.short
    } else if word_count > bands.long_above {
        bands.long
    } else {
        bands.medium
    };

    adjust.apply(raw_probability).clamp(0.0, 100.0)
}
