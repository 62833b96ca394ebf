pub mod ast;
pub mod evaluator;
pub mod lexer;
pub mod number;
pub mod parser;

pub use ast::{BinaryOp, Expr, InternalError};
pub use evaluator::{evaluate, ArithmeticError};
pub use lexer::*;
pub use number::Number;
pub use parser::{ParsingError, DEFAULT_MAX_DEPTH, DEFAULT_MAX_HEIGHT};

use miette::Diagnostic;

#[derive(Diagnostic, Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parsing(#[from] ParsingError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Arithmetic(#[from] ArithmeticError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Internal(#[from] InternalError),
}

impl Error {
    /// Name of the pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Lexical(_) => "lexer",
            Error::Parsing(_) => "parser",
            Error::Arithmetic(_) => "evaluator",
            Error::Internal(_) => "internal",
        }
    }
}

/// Lexes, parses and evaluates one expression.
pub fn evaluate_str(input: &str) -> Result<Number, Error> {
    evaluate_with_max_depth(input, DEFAULT_MAX_DEPTH)
}

pub fn evaluate_with_max_depth(input: &str, max_depth: usize) -> Result<Number, Error> {
    let expr = parser::Parser::with_max_depth(input, max_depth).parse()?;
    Ok(evaluate(&expr)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end() {
        let cases = [
            ("3 + 5", Number::Integer(8)),
            ("10 - 2", Number::Integer(8)),
            ("7 * 4", Number::Integer(28)),
            ("8 / 2", Number::Real(4.0)),
            ("(3 + 5) * 2", Number::Integer(16)),
            ("14 + 2 * 3 - 6 / 2", Number::Real(17.0)),
        ];

        for (input, expected) in cases {
            assert_eq!(evaluate_str(input), Ok(expected), "{input}");
        }
    }

    #[test]
    fn test_whitespace_insensitive() {
        for input in ["3+5", "3 + 5", "  3   +   5  "] {
            assert_eq!(evaluate_str(input), Ok(Number::Integer(8)));
        }
    }

    #[test]
    fn test_error_stages() {
        assert_eq!(evaluate_str("3 & 5").unwrap_err().stage(), "lexer");
        assert_eq!(evaluate_str("(3 + 5").unwrap_err().stage(), "parser");
        assert_eq!(evaluate_str("3 + 5)").unwrap_err().stage(), "parser");
        assert_eq!(evaluate_str("5 / 0").unwrap_err().stage(), "evaluator");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(evaluate_str("5 / 0").unwrap_err().to_string(), "division by zero");
        assert_eq!(
            evaluate_str("(3 + 5").unwrap_err().to_string(),
            "expected closing parenthesis"
        );
        assert_eq!(
            evaluate_str("3 & 5").unwrap_err().to_string(),
            "unexpected character '&'"
        );
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = evaluate_str("5 / 0").unwrap_err();
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("eval::division_by_zero".to_string())
        );
    }

    #[test]
    fn test_max_depth_is_configurable() {
        assert!(evaluate_with_max_depth("((1))", 1).is_err());
        assert_eq!(evaluate_with_max_depth("((1))", 2), Ok(Number::Integer(1)));
    }

    #[test]
    fn test_long_chain_fails_cleanly() {
        let chain = format!("1{}", "+1".repeat(20_000));
        let err = evaluate_str(&chain).unwrap_err();
        assert_eq!(err.stage(), "parser");
        assert_eq!(err.to_string(), "expression too long");
    }
}
