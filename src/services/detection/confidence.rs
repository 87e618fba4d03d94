// Confidence estimation
// Confidence comes from how far the probability sits from neutral and how much the axes agree.

use crate::models::{Confidence, EnsembleScores, NEUTRAL_SCORE};
use super::statistical::std_dev;

#[derive(Debug, Clone, Copy)]
struct ConfidenceGate {
    min_distance: f64,
    max_spread: f64,
}

/// Distance + stddev gates that yield High
const HIGH_GATES: [ConfidenceGate; 2] = [
    ConfidenceGate { min_distance: 35.0, max_spread: 15.0 },
    ConfidenceGate { min_distance: 30.0, max_spread: 25.0 },
];

/// Distance + range gate that yields Medium
const MEDIUM_GATE: ConfidenceGate = ConfidenceGate { min_distance: 20.0, max_spread: 40.0 };

/// Any probability this far from neutral is at least Medium
const MEDIUM_DISTANCE: f64 = 10.0;

pub fn calculate_confidence(probability: f64, scores: &EnsembleScores) -> Confidence {
    let distance = (probability - NEUTRAL_SCORE).abs();
    let values = scores.values();

    let score_std = std_dev(&values);
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    let min = values.iter().cloned().fold(f64::MAX, f64::min);
    let score_range = max - min;

    if HIGH_GATES
        .iter()
        .any(|g| distance > g.min_distance && score_std < g.max_spread)
    {
        Confidence::High
    } else if (distance > MEDIUM_GATE.min_distance && score_range < MEDIUM_GATE.max_spread)
        || distance > MEDIUM_DISTANCE
    {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}
