use miette::{Diagnostic, SourceSpan};
use thiserror::Error;
use crate::{
    ast::{BinaryOp, Expr},
    lexer::{Token, TokenKind},
    Error, Lexer,
};

/// Parenthesis nesting allowed before the parser gives up.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Height allowed for the syntax tree, counting chained operators as well
/// as parentheses.
pub const DEFAULT_MAX_HEIGHT: usize = 2048;

#[derive(Diagnostic, Debug, Error, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("unexpected token in factor position")]
    #[diagnostic(
        code(parser::unexpected_factor),
        help("expected an integer or '(' but found {found}")
    )]
    UnexpectedFactor {
        found: TokenKind,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(parser::unexpected_token))]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        #[label("unexpected {found}")]
        span: SourceSpan,
    },

    #[error("expected closing parenthesis")]
    #[diagnostic(code(parser::unclosed_paren))]
    UnclosedParen {
        found: TokenKind,
        #[label("unclosed parenthesis")]
        open: SourceSpan,
        #[label("found {found}")]
        span: SourceSpan,
    },

    #[error("expression nested too deeply")]
    #[diagnostic(
        code(parser::too_deep),
        help("at most {limit} levels of parentheses are allowed")
    )]
    TooDeep {
        limit: usize,
        #[label("this parenthesis exceeds the limit")]
        span: SourceSpan,
    },

    #[error("expression too long")]
    #[diagnostic(
        code(parser::too_long),
        help("the syntax tree may be at most {limit} levels high; split the expression up")
    )]
    TooLong {
        limit: usize,
        #[label("this operator exceeds the limit")]
        span: SourceSpan,
    },
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token<'a>,
    primed: bool,
    depth: usize,
    max_depth: usize,
    max_height: usize,
}

/// A subtree together with its height.
type Node = (Expr, usize);

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_max_depth(input, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(input: &'a str, max_depth: usize) -> Self {
        Self {
            lexer: Lexer::new(input),
            current: Token::eof(0),
            primed: false,
            depth: 0,
            max_depth,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }

    pub fn max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }

    /// Parses the whole input as a single expression.
    ///
    /// Anything left over after the expression is an error, so `3 + 5)`
    /// is rejected rather than silently evaluated as `3 + 5`.
    pub fn parse(&mut self) -> Result<Expr, Error> {
        let node = self.parse_expr()?;
        self.eat(TokenKind::Eof)?;
        Ok(node)
    }

    /// Parses one `expr` production, leaving any following tokens unread.
    pub fn parse_expr(&mut self) -> Result<Expr, Error> {
        if !self.primed {
            self.current = self.lexer.next_token()?;
            self.primed = true;
        }
        Ok(self.expr()?.0)
    }

    /// `expr := term (('+' | '-') term)*`
    fn expr(&mut self) -> Result<Node, Error> {
        let (mut node, mut height) = self.term()?;

        while matches!(self.current.kind, TokenKind::Plus | TokenKind::Minus) {
            let (op, op_span) = self.operator()?;
            let (right, right_height) = self.term()?;
            height = self.grow(height, right_height, op_span)?;
            node = Expr::binary(node, op, op_span, right);
        }

        Ok((node, height))
    }

    /// `term := factor (('*' | '/') factor)*`
    fn term(&mut self) -> Result<Node, Error> {
        let (mut node, mut height) = self.factor()?;

        while matches!(self.current.kind, TokenKind::Star | TokenKind::Slash) {
            let (op, op_span) = self.operator()?;
            let (right, right_height) = self.factor()?;
            height = self.grow(height, right_height, op_span)?;
            node = Expr::binary(node, op, op_span, right);
        }

        Ok((node, height))
    }

    /// `factor := INTEGER | '(' expr ')'`
    fn factor(&mut self) -> Result<Node, Error> {
        let token = self.current;
        match token {
            Token {
                kind: TokenKind::Integer,
                value: Some(value),
                ..
            } => {
                self.eat(TokenKind::Integer)?;
                let node = Expr::Number {
                    value,
                    span: token.span(),
                };
                Ok((node, 1))
            }
            Token {
                kind: TokenKind::LeftParen,
                ..
            } => {
                if self.depth >= self.max_depth {
                    return Err(ParsingError::TooDeep {
                        limit: self.max_depth,
                        span: token.span(),
                    }
                    .into());
                }

                self.eat(TokenKind::LeftParen)?;
                self.depth += 1;
                let node = self.expr()?;
                self.depth -= 1;

                if self.current.kind != TokenKind::RightParen {
                    return Err(ParsingError::UnclosedParen {
                        found: self.current.kind,
                        open: token.span(),
                        span: self.current.span(),
                    }
                    .into());
                }
                self.eat(TokenKind::RightParen)?;
                Ok(node)
            }
            token => Err(ParsingError::UnexpectedFactor {
                found: token.kind,
                span: token.span(),
            }
            .into()),
        }
    }

    /// Height of a new binary node, rejecting trees that would be too tall
    /// to evaluate on the call stack.
    fn grow(&self, left: usize, right: usize, op_span: SourceSpan) -> Result<usize, Error> {
        let height = left.max(right) + 1;
        if height > self.max_height {
            return Err(ParsingError::TooLong {
                limit: self.max_height,
                span: op_span,
            }
            .into());
        }
        Ok(height)
    }

    fn operator(&mut self) -> Result<(BinaryOp, SourceSpan), Error> {
        let token = self.current;
        let op = BinaryOp::from_token(token.kind, token.span())?;
        self.eat(token.kind)?;
        Ok((op, token.span()))
    }

    /// Consumes the current token if it is of the given kind.
    fn eat(&mut self, kind: TokenKind) -> Result<(), Error> {
        if self.current.kind != kind {
            return Err(ParsingError::UnexpectedToken {
                expected: kind,
                found: self.current.kind,
                span: self.current.span(),
            }
            .into());
        }

        self.current = self.lexer.next_token()?;
        Ok(())
    }
}
