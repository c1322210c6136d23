use thiserror::Error;

/// The main error type for frigg operations
#[derive(Debug, Error)]
pub enum FriggError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("No tasks found: {0}")]
    ConfigNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Coverage error: {0}")]
    Coverage(String),
}

/// Result type alias for frigg operations
pub type FriggResult<T> = Result<T, FriggError>;
