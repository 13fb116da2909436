use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    /// The maintenance offset sequence (or an activity's subset of it) is
    /// unusable. A configuration problem, never a data gap.
    #[error("Invalid maintenance template: {0}")]
    InvalidTemplate(String),

    #[error("Invalid completion key: {0}")]
    InvalidCompletionKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl FleetError {
    /// True for errors the operator must fix in configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, FleetError::InvalidTemplate(_) | FleetError::Yaml(_))
    }
}

/// Result alias for fleet core operations.
pub type Result<T> = std::result::Result<T, FleetError>;
