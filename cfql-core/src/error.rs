//! Error types for cfql-core.
//!
//! Minimal error types without server dependencies (no axum, no sqlx).

use thiserror::Error;

/// CFQL compile error. Every failure mode of the scanner and the stack
/// evaluator has its own variant so callers can match on kind instead of
/// parsing messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CfqlError {
    #[error("string literal is missing a closing quote")]
    UnterminatedString,

    #[error("string literal ends in the middle of an escape sequence")]
    UnterminatedEscape,

    #[error("unexpected character: {0:?}")]
    UnexpectedCharacter(char),

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("unknown field: {0:?}")]
    UnknownField(String),

    #[error("unknown operator: {0:?}")]
    UnknownOperator(String),

    #[error("not enough operands for operator {0:?}")]
    InsufficientOperands(String),

    #[error("expression left {0} values on the stack, expected 1")]
    UnbalancedExpression(usize),
}

/// Result type for CFQL operations
pub type CfqlResult<T> = Result<T, CfqlError>;

impl serde::Serialize for CfqlError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CfqlError::UnknownField("brand".to_string());
        assert_eq!(err.to_string(), "unknown field: \"brand\"");

        let err = CfqlError::UnknownOperator("%".to_string());
        assert_eq!(err.to_string(), "unknown operator: \"%\"");

        let err = CfqlError::InsufficientOperands("and".to_string());
        assert_eq!(err.to_string(), "not enough operands for operator \"and\"");

        let err = CfqlError::UnbalancedExpression(3);
        assert_eq!(
            err.to_string(),
            "expression left 3 values on the stack, expected 1"
        );

        let err = CfqlError::UnexpectedCharacter(' ');
        assert_eq!(err.to_string(), "unexpected character: ' '");

        let err = CfqlError::InvalidNumber("12a4".to_string());
        assert_eq!(err.to_string(), "invalid number: \"12a4\"");
    }

    #[test]
    fn test_result_type() {
        let ok_result: CfqlResult<i32> = Ok(42);
        assert_eq!(ok_result.unwrap(), 42);

        let err_result: CfqlResult<i32> = Err(CfqlError::UnterminatedString);
        assert!(err_result.is_err());
    }
}
