// Detection Tables
// Curated phrase lists and score step tables used by the feature extractors.
// Values are empirically tuned; keep them here so scoring code stays table-driven.

/// Connective phrases over-represented in machine-written prose (matched case-insensitively on word boundaries)
pub const AI_PHRASES: &[&str] = &[
    "furthermore",
    "moreover",
    "additionally",
    "in conclusion",
    "therefore",
    "thus",
    "hence",
    "consequently",
    "in summary",
    "as a result",
    "on the other hand",
    "in contrast",
    "similarly",
    "likewise",
    "for instance",
    "for example",
    "such as",
    "in particular",
    "it is important to note",
    "it should be noted",
    "as mentioned",
    "as previously stated",
    "in other words",
    "to summarize",
    "it can be argued",
    "it is worth noting",
    "it is evident that",
    "research indicates",
    "studies suggest",
    "analysis reveals",
    "findings demonstrate",
    "results show",
    "data indicates",
    // academic
    "based on the analysis",
    "the results indicate",
    "it can be concluded",
    "the findings suggest",
    "according to research",
    "studies have shown",
    "evidence suggests",
    "research demonstrates",
    "analysis shows",
    // conversational
    "it's worth mentioning",
    "let me explain",
    "here's the thing",
    "what's interesting is",
    "the key point is",
    "importantly",
];

/// Transition word groups, each compiled into one case-insensitive alternation
pub const TRANSITION_GROUPS: &[&[&str]] = &[
    &["however", "nevertheless", "furthermore", "moreover", "therefore", "thus", "hence"],
    &["in addition", "in conclusion", "as a result", "on the other hand"],
    &["similarly", "likewise", "consequently", "meanwhile", "thereafter", "notably"],
    &["specifically", "particularly", "essentially", "ultimately", "indeed"],
];

/// Punctuation symbols whose presence is counted by the style analyzer
pub const PUNCTUATION_SET: &[char] = &['.', ',', '!', '?', ';', ':', '-', '(', ')', '"', '\''];

/// A descending or ascending threshold table with a fallback value.
#[derive(Debug, Clone, Copy)]
pub struct StepTable {
    pub steps: &'static [(f64, f64)],
    pub otherwise: f64,
}

impl StepTable {
    /// First step whose threshold is strictly greater than `value`
    pub fn below(&self, value: f64) -> f64 {
        self.steps
            .iter()
            .find(|(threshold, _)| value < *threshold)
            .map(|(_, score)| *score)
            .unwrap_or(self.otherwise)
    }

    /// First step whose threshold is strictly less than `value`
    pub fn above(&self, value: f64) -> f64 {
        self.steps
            .iter()
            .find(|(threshold, _)| value > *threshold)
            .map(|(_, score)| *score)
            .unwrap_or(self.otherwise)
    }
}

/// Average perplexity → score (lower perplexity reads as more machine-like)
pub const PERPLEXITY_STEPS: StepTable = StepTable {
    steps: &[(20.0, 98.0), (30.0, 92.0), (45.0, 80.0), (65.0, 40.0), (100.0, 22.0)],
    otherwise: 10.0,
};

/// Mean adjacent-sentence cosine similarity → score
pub const COHERENCE_STEPS: StepTable = StepTable {
    steps: &[(0.85, 92.0), (0.75, 78.0), (0.6, 58.0), (0.4, 32.0)],
    otherwise: 18.0,
};

/// Fraction of words with 7+ characters → score
pub const SOPHISTICATION_STEPS: StepTable = StepTable {
    steps: &[(0.35, 85.0), (0.25, 70.0), (0.15, 45.0)],
    otherwise: 25.0,
};

/// Nudges applied to the whole-text embedding score
pub struct EmbeddingShape {
    pub base: f64,
    pub high_norm: f64,
    pub high_norm_bonus: f64,
    pub low_norm: f64,
    pub low_norm_penalty: f64,
    pub low_std: f64,
    pub low_std_bonus: f64,
    pub high_std: f64,
    pub high_std_penalty: f64,
    pub centered_mean: f64,
    pub centered_bonus: f64,
}

pub const EMBEDDING_SHAPE: EmbeddingShape = EmbeddingShape {
    base: 50.0,
    high_norm: 1.15,
    high_norm_bonus: 20.0,
    low_norm: 0.85,
    low_norm_penalty: 15.0,
    low_std: 0.12,
    low_std_bonus: 15.0,
    high_std: 0.28,
    high_std_penalty: 10.0,
    centered_mean: 0.02,
    centered_bonus: 10.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perplexity_steps() {
        assert_eq!(PERPLEXITY_STEPS.below(5.0), 98.0);
        assert_eq!(PERPLEXITY_STEPS.below(20.0), 92.0);
        assert_eq!(PERPLEXITY_STEPS.below(64.9), 40.0);
        assert_eq!(PERPLEXITY_STEPS.below(99.0), 22.0);
        assert_eq!(PERPLEXITY_STEPS.below(100.0), 10.0);
    }

    #[test]
    fn test_coherence_steps() {
        assert_eq!(COHERENCE_STEPS.above(0.99), 92.0);
        assert_eq!(COHERENCE_STEPS.above(0.85), 78.0);
        assert_eq!(COHERENCE_STEPS.above(0.5), 32.0);
        assert_eq!(COHERENCE_STEPS.above(0.4), 18.0);
    }

    #[test]
    fn test_sophistication_steps() {
        assert_eq!(SOPHISTICATION_STEPS.above(0.5), 85.0);
        assert_eq!(SOPHISTICATION_STEPS.above(0.3), 70.0);
        assert_eq!(SOPHISTICATION_STEPS.above(0.2), 45.0);
        assert_eq!(SOPHISTICATION_STEPS.above(0.1), 25.0);
    }

    #[test]
    fn test_punctuation_set_size() {
        assert_eq!(PUNCTUATION_SET.len(), 11);
    }
}
