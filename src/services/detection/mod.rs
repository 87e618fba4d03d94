// Detection Module
// AI text detection core logic organized into specialized submodules:
// - tables: phrase lists and step-scoring tables
// - tuning: ensemble weights, logistic curves and length calibration bands
// - statistical: lexical features and the statistical sub-score
// - style: writing-style heuristics
// - neural: perplexity, coherence and embedding scores over a NeuralBackend
// - aggregation: ensemble combination and length calibration
// - confidence: Low/Medium/High from distance and axis agreement
// - detector: end-to-end pipeline

pub mod tables;
pub mod tuning;
pub mod statistical;
pub mod style;
pub mod neural;
pub mod aggregation;
pub mod confidence;
pub mod detector;

// Re-export commonly used functions
pub use aggregation::{calibrate_prediction, ensemble_prediction, ensemble_weights};
pub use confidence::calculate_confidence;
pub use detector::{parse_request, DetectError, Detector};
pub use neural::{cosine_similarity, score_neural};
pub use statistical::{extract_statistical_features, statistical_probability};
pub use style::analyze_writing_style;
pub use tuning::Tuning;
