use thiserror::Error;

#[derive(Debug, Error)]
pub enum AugxError {
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("invalid collection name '{0}': must not be empty or contain path separators")]
    InvalidName(String),

    #[error("invalid ADR status: {0}")]
    InvalidStatus(String),

    #[error("invalid conflict strategy '{0}': expected 'overwrite' or 'append-number'")]
    InvalidConflictStrategy(String),

    #[error("no YAML frontmatter block found")]
    MissingFrontmatter,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AugxError>;
