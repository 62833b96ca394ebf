use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::lexer::TokenKind;

/// Raised when the parser hands the tree builder something it cannot
/// represent. Never caused by user input.
#[derive(Diagnostic, Debug, Error, Clone, PartialEq, Eq)]
#[error("internal error: {kind} is not a binary operator")]
#[diagnostic(code(ast::internal), help("this is a bug in the interpreter"))]
pub struct InternalError {
    pub kind: TokenKind,
    #[label("here")]
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    /// Maps an operator token to its tree operator, rejecting anything else.
    pub fn from_token(kind: TokenKind, span: SourceSpan) -> Result<Self, InternalError> {
        Self::try_from(kind).map_err(|kind| InternalError { kind, span })
    }
}

impl TryFrom<TokenKind> for BinaryOp {
    type Error = TokenKind;

    fn try_from(kind: TokenKind) -> Result<Self, Self::Error> {
        match kind {
            TokenKind::Plus => Ok(BinaryOp::Add),
            TokenKind::Minus => Ok(BinaryOp::Subtract),
            TokenKind::Star => Ok(BinaryOp::Multiply),
            TokenKind::Slash => Ok(BinaryOp::Divide),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BinaryOp::Add => "+",
                BinaryOp::Subtract => "-",
                BinaryOp::Multiply => "*",
                BinaryOp::Divide => "/",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number {
        value: i64,
        span: SourceSpan,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        op_span: SourceSpan,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(left: Expr, op: BinaryOp, op_span: SourceSpan, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            op_span,
            right: Box::new(right),
        }
    }

    /// Source range covered by this subexpression, excluding any
    /// surrounding parentheses.
    pub fn span(&self) -> SourceSpan {
        match self {
            Expr::Number { span, .. } => *span,
            Expr::Binary { left, right, .. } => {
                let start = left.span().offset();
                let right = right.span();
                (start, right.offset() + right.len() - start).into()
            }
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Number { value, .. } => write!(f, "{}", value),
            Expr::Binary {
                left, op, right, ..
            } => write!(f, "({} {} {})", op, left, right),
        }
    }
}
