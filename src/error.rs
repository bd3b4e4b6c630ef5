//! Error types for tfbs_align

use thiserror::Error;

/// Main error type for clustering and alignment operations
#[derive(Error, Debug)]
pub enum TfbsError {
    #[error("Insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error("Missing value for gene {gene_id} in condition {condition}")]
    MissingValue { gene_id: String, condition: String },

    #[error("Expression data has no row for gene {gene_id} required by the {table} ordering")]
    IncompleteExpression { gene_id: String, table: String },

    #[error("Duplicate gene {gene_id} in {table} table")]
    DuplicateGene { gene_id: String, table: String },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Newick parse error: {reason}")]
    NewickParse { reason: String },

    #[error("Architecture report failed during {stage}: {reason}")]
    ArchitectureFailed { stage: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for tfbs_align operations
pub type Result<T> = std::result::Result<T, TfbsError>;
