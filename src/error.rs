use thiserror::Error;

/// Error types for the clusterkit library
#[derive(Error, Debug)]
pub enum KMeansError {
    /// A configuration value is out of range or an enum string is unknown
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The dataset is empty or smaller than the requested number of clusters
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Sample width disagrees with the fitted dataset's dimensionality
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Model has not been fitted yet
    #[error("model has not been fitted; call fit() first")]
    NotFitted,
}
