/// Core error types for dialectic scenes.
use std::path::PathBuf;

/// A specialized Result type for dialectic operations.
pub type DialecticResult<T> = Result<T, DialecticError>;

/// Top-level error type encompassing every stage from script to render.
#[derive(Debug, thiserror::Error)]
pub enum DialecticError {
    /// A node or scene parameter is malformed (non-positive size, empty text, ...).
    #[error("validation error: {field}: {message}")]
    Validation { field: String, message: String },

    /// A step or group names a node that has not been declared yet.
    #[error("reference error: {reference} is not declared in scene '{scene}'")]
    Reference { reference: String, scene: String },

    /// No scene with the given name is registered.
    #[error("unknown scene: {0}")]
    UnknownScene(String),

    /// The external renderer failed. The message carries its output verbatim.
    #[error("render error: {0}")]
    Render(String),

    #[error("config error: {message} ({path:?})")]
    Config { message: String, path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DialecticError {
    /// Create a validation error for a named parameter.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DialecticError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a reference error for a handle unknown to `scene`.
    pub fn reference(reference: impl std::fmt::Display, scene: impl Into<String>) -> Self {
        DialecticError::Reference {
            reference: reference.to_string(),
            scene: scene.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        DialecticError::Config {
            message: message.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = DialecticError::validation("rectangle.width", "must be positive, got -1");
        assert_eq!(
            err.to_string(),
            "validation error: rectangle.width: must be positive, got -1"
        );
    }

    #[test]
    fn test_reference_error_display() {
        let err = DialecticError::reference("#7", "Overview");
        assert_eq!(
            err.to_string(),
            "reference error: #7 is not declared in scene 'Overview'"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = DialecticError::config("bad resolution", "dialectic.toml");
        assert!(err.to_string().contains("bad resolution"));
    }
}
