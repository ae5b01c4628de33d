//! Error types for schema inference

use thiserror::Error;

/// Failure conditions surfaced by the inference engine and its document providers
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InferError {
    /// A caller-supplied selector could not be parsed
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidInput { selector: String, reason: String },

    /// Nothing survived mining, filtering or the manual container query
    #[error("no patterns found: {0}")]
    NoPatternsFound(String),

    /// The document provider could not hand back a usable tree
    #[error("document unavailable: {0}")]
    DocumentUnavailable(String),
}

pub type Result<T> = std::result::Result<T, InferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_condition() {
        let err = InferError::NoPatternsFound("no group reached min_items = 3".into());
        assert_eq!(err.to_string(), "no patterns found: no group reached min_items = 3");

        let err = InferError::InvalidInput {
            selector: "div[".into(),
            reason: "unexpected end of input".into(),
        };
        assert!(err.to_string().contains("`div[`"));
    }
}
