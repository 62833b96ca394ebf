use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Diagnostic, Debug, Error, Clone, PartialEq, Eq)]
pub enum LexicalError {
    #[error("unexpected character '{ch}'")]
    #[diagnostic(
        code(lexer::unexpected_character),
        help("expressions may only contain digits, `+ - * /`, parentheses and whitespace")
    )]
    UnexpectedCharacter {
        ch: char,
        #[label("this input character")]
        span: SourceSpan,
    },

    #[error("integer literal `{literal}` does not fit in 64 bits")]
    #[diagnostic(code(lexer::integer_overflow))]
    IntegerOverflow {
        literal: String,
        #[label("this numeric literal")]
        span: SourceSpan,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub slice: &'a str,
    pub offset: usize,
    pub kind: TokenKind,
    /// Parsed value, only set for [`TokenKind::Integer`].
    pub value: Option<i64>,
}

impl<'a> Token<'a> {
    pub(crate) fn eof(offset: usize) -> Self {
        Self {
            slice: "",
            offset,
            kind: TokenKind::Eof,
            value: None,
        }
    }

    pub fn span(&self) -> SourceSpan {
        (self.offset, self.slice.len()).into()
    }
}

impl<'a> std::fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Integer,
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TokenKind::Integer => "integer",
                TokenKind::Plus => "'+'",
                TokenKind::Minus => "'-'",
                TokenKind::Star => "'*'",
                TokenKind::Slash => "'/'",
                TokenKind::LeftParen => "'('",
                TokenKind::RightParen => "')'",
                TokenKind::Eof => "end of input",
            }
        )
    }
}

#[derive(Debug)]
pub struct Lexer<'a> {
    rest: &'a str,
    byte: usize,
    // Set once the iterator has handed out Eof or an error.
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            byte: 0,
            done: false,
        }
    }

    /// Produces the next token and advances past it.
    ///
    /// Once the source is exhausted every call returns an Eof token.
    pub fn next_token(&mut self) -> Result<Token<'a>, LexicalError> {
        loop {
            let mut chars = self.rest.chars();
            let Some(c) = chars.next() else {
                return Ok(Token::eof(self.byte));
            };
            let offset = self.byte;
            let c_onwards = self.rest;
            let slice = &c_onwards[..c.len_utf8()];
            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            let make_token = |kind: TokenKind| -> Result<Token<'a>, LexicalError> {
                Ok(Token {
                    slice,
                    offset,
                    kind,
                    value: None,
                })
            };

            return match c {
                '+' => make_token(TokenKind::Plus),
                '-' => make_token(TokenKind::Minus),
                '*' => make_token(TokenKind::Star),
                '/' => make_token(TokenKind::Slash),
                '(' => make_token(TokenKind::LeftParen),
                ')' => make_token(TokenKind::RightParen),
                '0'..='9' => {
                    let end = c_onwards
                        .find(|c: char| !c.is_ascii_digit())
                        .unwrap_or(c_onwards.len());
                    let literal = &c_onwards[..end];
                    let extra_byte = literal.len() - c.len_utf8();
                    self.byte += extra_byte;
                    self.rest = &self.rest[extra_byte..];

                    match literal.parse::<i64>() {
                        Ok(n) => Ok(Token {
                            slice: literal,
                            offset,
                            kind: TokenKind::Integer,
                            value: Some(n),
                        }),
                        Err(_) => Err(LexicalError::IntegerOverflow {
                            literal: literal.to_string(),
                            span: (offset, literal.len()).into(),
                        }),
                    }
                }
                c if c.is_whitespace() => continue,
                _ => Err(LexicalError::UnexpectedCharacter {
                    ch: c,
                    span: (offset, c.len_utf8()).into(),
                }),
            };
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let next = self.next_token();
        self.done = !matches!(&next, Ok(token) if token.kind != TokenKind::Eof);
        Some(next)
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}
