//! # Generator Error Types
//!
//! Errors raised while setting up a generator. Once running, the generator
//! never fails: bad content degrades to a no-op.

use thiserror::Error;

/// Errors that can occur when creating a generator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// The content library has no theme to start the run with.
    #[error("content library has no themes")]
    NoThemes,

    /// The content declares more obstacle lanes than can be addressed.
    #[error("content declares {0} lanes, at most {max} are supported", max = runway_content::MAX_LANE_COUNT)]
    TooManyLanes(usize),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(String),
}

/// Result type for generator operations.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GeneratorError::NoThemes.to_string(),
            "content library has no themes"
        );
        assert_eq!(
            GeneratorError::InvalidConfig("cell_depth must be positive".into()).to_string(),
            "invalid configuration: cell_depth must be positive"
        );
    }
}
