use crate::error::write_located;
use crate::lexer::Token;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("cannot parse number")]
    InvalidNumber,
    #[error("number is out of range")]
    NumberOutOfRange,
}

/// Tokenization failure, located either by the offending token or by a raw
/// byte offset when no token could be formed.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    token: Option<Token>,
    offset: Option<usize>,
    kind: LexErrorKind,
}

impl LexError {
    pub fn at(offset: usize, kind: LexErrorKind) -> Self {
        Self {
            token: None,
            offset: Some(offset),
            kind,
        }
    }

    pub fn for_token(token: Token, kind: LexErrorKind) -> Self {
        Self {
            token: Some(token),
            offset: None,
            kind,
        }
    }

    pub fn kind(&self) -> &LexErrorKind {
        &self.kind
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// 0-based byte offset of the error in the source, `None` if unknown.
    pub fn position(&self) -> Option<usize> {
        self.token.as_ref().map(Token::start).or(self.offset)
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_located(f, &self.kind, self.token(), self.position(), true)
    }
}

impl std::error::Error for LexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
