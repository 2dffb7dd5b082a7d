use crate::model::MetalKey;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum HmpiError {
    #[error("invalid sample: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid import file: {0}")]
    ImportFormat(String),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("no valid records found ({errors} record(s) rejected)")]
    NoValidRecords { errors: usize },

    #[error("no metal in the sample matches the reference table")]
    NoMatchedMetals,

    #[error("HMPI computation overflowed for {metal}")]
    ComputeOverflow { metal: MetalKey },

    #[error("failed to load reference table from {path}: {reason}")]
    ReferenceLoad { path: PathBuf, reason: String },

    #[error("invalid reference table: {0}")]
    ReferenceInvalid(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single sample failed a domain rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("sample name is required")]
    MissingName,

    #[error("{metal} concentration is required")]
    MissingConcentration { metal: MetalKey },

    #[error("{metal} concentration '{value}' is not a number")]
    InvalidConcentration { metal: MetalKey, value: String },

    #[error("{metal} concentration must be >= 0 (got {value})")]
    NegativeConcentration { metal: MetalKey, value: Decimal },

    #[error("latitude '{0}' is not a number")]
    InvalidLatitude(String),

    #[error("latitude must be between -90 and 90 (got {0})")]
    LatitudeOutOfRange(Decimal),

    #[error("longitude '{0}' is not a number")]
    InvalidLongitude(String),

    #[error("longitude must be between -180 and 180 (got {0})")]
    LongitudeOutOfRange(Decimal),
}

impl ValidationError {
    /// Input field the failure refers to, using import column names.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingName => "sampleName",
            ValidationError::MissingConcentration { metal }
            | ValidationError::InvalidConcentration { metal, .. }
            | ValidationError::NegativeConcentration { metal, .. } => metal.code(),
            ValidationError::InvalidLatitude(_) | ValidationError::LatitudeOutOfRange(_) => {
                "latitude"
            }
            ValidationError::InvalidLongitude(_) | ValidationError::LongitudeOutOfRange(_) => {
                "longitude"
            }
        }
    }
}
