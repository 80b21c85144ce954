use crate::error::write_located;
use crate::lexer::Token;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("there are no tokens to parse")]
    EmptyInput,
    #[error("expected number, identifier or left parenthesis")]
    ExpectedOperand,
    #[error("expected operator or right parenthesis")]
    ExpectedOperator,
    #[error("last token is expected to be the end of input")]
    ExpectedEndOfInput,
    #[error("unexpected token")]
    UnexpectedToken,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("cannot find matching left parenthesis")]
    MissingLeftParen,
    #[error("cannot find matching right parenthesis")]
    MissingRightParen,
    #[error("unsupported token")]
    UnsupportedToken,
    #[error("internal error, {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    token: Option<Token>,
    kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(token: Option<&Token>, kind: ParseErrorKind) -> Self {
        Self {
            token: token.cloned(),
            kind,
        }
    }

    pub(crate) fn at(token: &Token, kind: ParseErrorKind) -> Self {
        Self::new(Some(token), kind)
    }

    pub(crate) fn internal(token: Option<&Token>, message: impl Into<String>) -> Self {
        Self::new(token, ParseErrorKind::Internal(message.into()))
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn position(&self) -> Option<usize> {
        self.token.as_ref().map(Token::start)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_located(f, &self.kind, self.token(), self.position(), true)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
