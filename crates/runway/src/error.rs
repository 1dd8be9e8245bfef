//! # Host Error Types

use runway_content::ContentError;
use runway_procedural::GeneratorError;
use thiserror::Error;

/// Errors raised while setting up a run.
#[derive(Error, Debug)]
pub enum RunwayError {
    /// The content pack failed to load or validate.
    #[error("content error: {0}")]
    Content(#[from] ContentError),

    /// The generator rejected its inputs.
    #[error("generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// The run configuration is unusable.
    #[error("invalid run config: {0}")]
    Config(String),

    /// A run configuration file could not be read.
    #[error("failed to read run config: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for host operations.
pub type RunwayResult<T> = Result<T, RunwayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_error_converts() {
        let err: RunwayError = GeneratorError::NoThemes.into();
        assert!(matches!(err, RunwayError::Generator(GeneratorError::NoThemes)));
        assert!(err.to_string().starts_with("generator error"));
    }
}
