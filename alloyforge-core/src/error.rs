use alloyforge_schemas::composition::CompositionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlloyforgeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid composition: {0}")]
    InvalidComposition(#[from] CompositionError),

    #[error("Optimizer configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),

    #[error("An error occurred during logging: {0}")]
    LoggingError(#[from] anyhow::Error),
}
