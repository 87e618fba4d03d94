// textprobe Core Services

pub mod text_processor;
pub mod config_store;
pub mod providers;
pub mod detection;
pub mod converter;

pub use text_processor::*;
pub use config_store::*;
pub use providers::*;
pub use converter::{convert_pdf_to_docx, ConversionSummary, ConvertError};

// Re-export detection module functions
pub use detection::{
    analyze_writing_style,
    calculate_confidence,
    calibrate_prediction,
    ensemble_prediction,
    extract_statistical_features,
    parse_request,
    statistical_probability,
    DetectError,
    Detector,
    Tuning,
};
