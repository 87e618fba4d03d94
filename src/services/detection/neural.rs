// Neural Scoring
// Perplexity, semantic coherence and embedding-shape scores on top of a NeuralBackend.
// Every sub-score degrades to neutral on failure; nothing here aborts detection.

use crate::models::{NeuralScores, NEUTRAL_SCORE};
use crate::services::providers::{NeuralBackend, NeuralError};
use crate::services::text_processor::{split_into_chunks, tokenize_sentences};
use tracing::{debug, warn};

use super::tables::{COHERENCE_STEPS, EMBEDDING_SHAPE, PERPLEXITY_STEPS};

/// Sentences shorter than this (in characters) are ignored for coherence
const MIN_COHERENCE_SENTENCE_CHARS: usize = 10;

/// Run all three neural sub-scores; neutral across the board when the backend is unavailable
pub async fn score_neural(
    backend: &dyn NeuralBackend,
    text: &str,
    chunk_chars: usize,
) -> NeuralScores {
    if !backend.is_available() {
        return NeuralScores::neutral();
    }

    NeuralScores {
        perplexity: neutral_on_error("perplexity", perplexity_score(backend, text, chunk_chars).await),
        coherence: neutral_on_error("coherence", coherence_score(backend, text).await),
        embedding: neutral_on_error("embedding", embedding_score(backend, text).await),
    }
}

fn neutral_on_error(signal: &str, result: Result<f64, NeuralError>) -> f64 {
    result.unwrap_or_else(|e| {
        warn!(signal, "[NEURAL] Sub-score failed, using neutral value: {}", e);
        NEUTRAL_SCORE
    })
}

/// Average chunk perplexity mapped through the perplexity step table
pub async fn perplexity_score(
    backend: &dyn NeuralBackend,
    text: &str,
    chunk_chars: usize,
) -> Result<f64, NeuralError> {
    let chunks = split_into_chunks(text, chunk_chars);
    let mut perplexities = Vec::with_capacity(chunks.len());

    for chunk in &chunks {
        let losses = backend.token_losses(chunk).await?;
        perplexities.push(perplexity_from_losses(&losses)?);
    }

    let avg = perplexities.iter().sum::<f64>() / perplexities.len() as f64;
    debug!(chunks = chunks.len(), avg_perplexity = avg, "[NEURAL] Perplexity");

    Ok(PERPLEXITY_STEPS.below(avg))
}

/// `exp(mean loss)`
pub fn perplexity_from_losses(losses: &[f64]) -> Result<f64, NeuralError> {
    if losses.is_empty() {
        return Err(NeuralError::Malformed("empty token losses".to_string()));
    }
    let mean = losses.iter().sum::<f64>() / losses.len() as f64;
    let ppl = mean.exp();
    if !ppl.is_finite() {
        return Err(NeuralError::Malformed(format!("non-finite perplexity from mean loss {}", mean)));
    }
    Ok(ppl)
}

/// Mean cosine similarity of adjacent sentences mapped through the coherence step table
pub async fn coherence_score(backend: &dyn NeuralBackend, text: &str) -> Result<f64, NeuralError> {
    let sentences: Vec<String> = tokenize_sentences(text)
        .into_iter()
        .filter(|s| s.chars().count() >= MIN_COHERENCE_SENTENCE_CHARS)
        .collect();

    if sentences.len() < 2 {
        return Ok(NEUTRAL_SCORE);
    }

    let embeddings = backend.embed(&sentences).await?;
    if embeddings.len() != sentences.len() {
        return Err(NeuralError::Malformed(format!(
            "expected {} sentence embeddings, got {}",
            sentences.len(),
            embeddings.len()
        )));
    }
    let similarities = embeddings
        .windows(2)
        .map(|pair| cosine_similarity(&pair[0], &pair[1]))
        .collect::<Result<Vec<f64>, NeuralError>>()?;

    let avg = similarities.iter().sum::<f64>() / similarities.len() as f64;
    debug!(avg_similarity = avg, "[NEURAL] Semantic coherence");

    Ok(COHERENCE_STEPS.above(avg))
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, NeuralError> {
    if a.len() != b.len() || a.is_empty() {
        return Err(NeuralError::Malformed(format!(
            "embedding dimensions differ or are empty ({} vs {})",
            a.len(),
            b.len()
        )));
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

fn l2_norm(v: &[f32]) -> f64 {
    v.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt()
}

/// Shape heuristics over the whole-text embedding
pub async fn embedding_score(backend: &dyn NeuralBackend, text: &str) -> Result<f64, NeuralError> {
    let embeddings = backend.embed(&[text.to_string()]).await?;
    let embedding = embeddings
        .into_iter()
        .next()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| NeuralError::Malformed("empty text embedding".to_string()))?;

    Ok(embedding_shape_score(&embedding))
}

pub fn embedding_shape_score(embedding: &[f32]) -> f64 {
    let shape = &EMBEDDING_SHAPE;
    let values: Vec<f64> = embedding.iter().map(|x| *x as f64).collect();
    let norm = l2_norm(embedding);
    let mean = values.iter().sum::<f64>() / values.len().max(1) as f64;
    let std = super::statistical::std_dev(&values);

    debug!(norm, mean, std, "[NEURAL] Embedding stats");

    let mut score = shape.base;

    if norm > shape.high_norm {
        score += shape.high_norm_bonus;
    } else if norm < shape.low_norm {
        score -= shape.low_norm_penalty;
    }

    if std < shape.low_std {
        score += shape.low_std_bonus;
    } else if std > shape.high_std {
        score -= shape.high_std_penalty;
    }

    if mean.abs() < shape.centered_mean {
        score += shape.centered_bonus;
    }

    score.clamp(0.0, 100.0)
}
