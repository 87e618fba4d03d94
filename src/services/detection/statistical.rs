// Statistical Feature Extraction
// Five independent surface features over words and sentences, plus their weighted score.

use crate::models::{FeatureSet, NEUTRAL_SCORE};
use crate::services::text_processor::{tokenize_sentences, tokenize_words, whitespace_word_count};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use super::tables::{AI_PHRASES, TRANSITION_GROUPS};
use super::tuning::Tuning;

/// Below this many words every feature is neutral
pub const MIN_WORDS_FOR_FEATURES: usize = 10;

fn phrase_regexes() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        AI_PHRASES
            .iter()
            .map(|phrase| {
                Regex::new(&format!(r"\b{}\b", regex::escape(phrase))).expect("phrase regex")
            })
            .collect()
    })
}

fn transition_regexes() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        TRANSITION_GROUPS
            .iter()
            .map(|group| {
                let alternation = group
                    .iter()
                    .map(|w| regex::escape(w))
                    .collect::<Vec<_>>()
                    .join("|");
                Regex::new(&format!(r"(?i)\b({})\b", alternation)).expect("transition regex")
            })
            .collect()
    })
}

/// Extract all five features; neutral when the text is too short to say anything
pub fn extract_statistical_features(text: &str) -> FeatureSet {
    let words = tokenize_words(text);
    let sentences = tokenize_sentences(text);

    if words.len() < MIN_WORDS_FOR_FEATURES {
        return FeatureSet::neutral();
    }

    FeatureSet {
        ai_phrase_density: ai_phrase_density(text, &sentences),
        sentence_uniformity: sentence_uniformity(&sentences),
        vocabulary_complexity: vocabulary_complexity(&words),
        transition_density: transition_density(text, &sentences),
        repetition_score: repetition_score(&words),
    }
}

/// Weighted feature sum squashed onto [0, 100]
pub fn statistical_probability(features: &FeatureSet, tuning: &Tuning) -> f64 {
    let w = &tuning.feature_weights;
    let weighted = features.ai_phrase_density * w.ai_phrase_density
        + features.sentence_uniformity * w.sentence_uniformity
        + features.vocabulary_complexity * w.vocabulary_complexity
        + features.transition_density * w.transition_density
        + features.repetition_score * w.repetition_score;

    tuning.statistical_curve.apply(weighted)
}

pub fn ai_phrase_density(text: &str, sentences: &[String]) -> f64 {
    let lowered = text.to_lowercase();
    let count: usize = phrase_regexes()
        .iter()
        .map(|re| re.find_iter(&lowered).count())
        .sum();

    let density = count as f64 / sentences.len().max(1) as f64;
    (density * 180.0).min(100.0)
}

/// Lower variation in sentence length scores higher
pub fn sentence_uniformity(sentences: &[String]) -> f64 {
    if sentences.len() < 2 {
        return NEUTRAL_SCORE;
    }

    let lengths: Vec<f64> = sentences
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| whitespace_word_count(s) as f64)
        .collect();

    match coefficient_of_variation(&lengths) {
        Some(cv) => ((0.65 - cv) * 120.0).clamp(0.0, 100.0),
        None => NEUTRAL_SCORE,
    }
}

pub fn vocabulary_complexity(words: &[String]) -> f64 {
    if words.len() < MIN_WORDS_FOR_FEATURES {
        return NEUTRAL_SCORE;
    }

    let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
    let lexical_diversity = unique.len() as f64 / words.len() as f64;
    let avg_word_length =
        words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64;

    let complexity = (avg_word_length / 6.5) * 50.0;
    let diversity_factor = (lexical_diversity - 0.42) * -45.0;

    (complexity + diversity_factor + 52.0).clamp(0.0, 100.0)
}

pub fn transition_density(text: &str, sentences: &[String]) -> f64 {
    let count: usize = transition_regexes()
        .iter()
        .map(|re| re.find_iter(text).count())
        .sum();

    let density = count as f64 / sentences.len().max(1) as f64;
    (density * 140.0).min(100.0)
}

/// Mean of repeated-trigram and frequent-bigram rates
pub fn repetition_score(words: &[String]) -> f64 {
    if words.len() < MIN_WORDS_FOR_FEATURES {
        return 0.0;
    }

    let trigrams = ngram_counts(words, 3);
    let bigrams = ngram_counts(words, 2);
    let trigram_total = words.len() - 2;
    let bigram_total = words.len() - 1;

    let repeated_trigrams = trigrams.values().filter(|&&c| c > 1).count();
    let repeated_bigrams = bigrams.values().filter(|&&c| c > 2).count();

    let trigram_score = repeated_trigrams as f64 / trigram_total as f64 * 100.0;
    let bigram_score = repeated_bigrams as f64 / bigram_total as f64 * 50.0;

    (trigram_score + bigram_score) / 2.0
}

fn ngram_counts(words: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts: HashMap<&[String], usize> = HashMap::new();
    for gram in words.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Population standard deviation over mean; `None` for empty input or zero mean
pub(crate) fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean == 0.0 {
        return None;
    }
    Some(std_dev(values) / mean)
}

/// Population standard deviation
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISTINCT_WORDS: &str = "apple river stone cloud green table music paper light glass \
        horse bread chair grass lemon shirt candle bottle garden window \
        pencil mirror carpet jacket basket pillow hammer violin tiger orange";

    fn furthermore_text() -> String {
        "Furthermore, it is important to note that therefore the results indicate significant findings. "
            .repeat(10)
    }

    #[test]
    fn test_short_text_is_neutral() {
        let features = extract_statistical_features("Only a handful of words here.");
        assert_eq!(features, FeatureSet::neutral());
    }

    #[test]
    fn test_distinct_words_have_no_phrase_transition_or_repetition() {
        assert_eq!(tokenize_words(DISTINCT_WORDS).len(), 30);
        let features = extract_statistical_features(DISTINCT_WORDS);
        assert_eq!(features.ai_phrase_density, 0.0);
        assert_eq!(features.transition_density, 0.0);
        assert_eq!(features.repetition_score, 0.0);
        // a single sentence gives no length variation to measure
        assert_eq!(features.sentence_uniformity, NEUTRAL_SCORE);
    }

    #[test]
    fn test_connective_heavy_text_saturates() {
        let features = extract_statistical_features(&furthermore_text());
        assert_eq!(features.ai_phrase_density, 100.0);
        assert_eq!(features.transition_density, 100.0);
        // identical sentence lengths → cv 0 → 0.65 * 120
        assert!((features.sentence_uniformity - 78.0).abs() < 1e-9);
        assert_eq!(features.vocabulary_complexity, 100.0);
        assert!(features.repetition_score > 0.0);
    }

    #[test]
    fn test_statistical_probability_is_high_for_connective_text() {
        let features = extract_statistical_features(&furthermore_text());
        let prob = statistical_probability(&features, &Tuning::default());
        assert!(prob > 95.0, "prob = {prob}");
    }

    #[test]
    fn test_neutral_features_probability() {
        let prob = statistical_probability(&FeatureSet::neutral(), &Tuning::default());
        // weighted sum of 50s is 50, just under the 52 centre
        assert!(prob > 40.0 && prob < 50.0);
    }

    #[test]
    fn test_phrase_matching_respects_word_boundaries() {
        let sentences = vec!["Thusly we go".to_string()];
        assert_eq!(ai_phrase_density("Thusly we go", &sentences), 0.0);
        let sentences = vec!["Thus we go".to_string()];
        assert_eq!(ai_phrase_density("Thus we go", &sentences), 100.0);
    }

    #[test]
    fn test_transition_density_case_insensitive() {
        let sentences = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        // 1 match over 4 sentences → 0.25 * 140
        assert!((transition_density("HOWEVER it rained", &sentences) - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_sentence_uniformity_varied_lengths() {
        let sentences = vec![
            "one".to_string(),
            "one two three four five six seven eight nine ten eleven twelve".to_string(),
        ];
        // cv = 5.5 / 6.5 ≈ 0.846 > 0.65 → clamped to 0
        assert_eq!(sentence_uniformity(&sentences), 0.0);
    }

    #[test]
    fn test_repetition_score_counts_repeats() {
        let words: Vec<String> = "a b c a b c a b c d e f"
            .split(' ')
            .map(|s| s.to_string())
            .collect();
        // trigrams: 10 total, {abc, bca, cab} repeat → 30; bigrams: 11 total, {ab, bc} seen 3x → 2/11*50
        let expected = (30.0 + 2.0 / 11.0 * 50.0) / 2.0;
        assert!((repetition_score(&words) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_coefficient_of_variation() {
        assert_eq!(coefficient_of_variation(&[]), None);
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), None);
        assert_eq!(coefficient_of_variation(&[4.0, 4.0, 4.0]), Some(0.0));
        assert!((std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-9);
    }
}
