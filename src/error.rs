use crate::evaluator::{EnvironmentError, EvalError};
use crate::lexer::{LexError, Token};
use crate::parser::{ParseError, PrioritiesError};
use std::fmt;
use thiserror::Error;

/// Any failure produced while turning text into a number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Priorities(#[from] PrioritiesError),
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}

impl Error {
    /// Byte offset into the source expression, when the failure has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::Lex(err) => err.position(),
            Error::Parse(err) => err.position(),
            Error::Eval(err) => err.position(),
            Error::Priorities(_) | Error::Environment(_) => None,
        }
    }
}

/// Shared rendering for errors that point into the source text.
pub(crate) fn write_located(
    f: &mut fmt::Formatter<'_>,
    kind: &dyn fmt::Display,
    token: Option<&Token>,
    position: Option<usize>,
    show_token: bool,
) -> fmt::Result {
    let Some(position) = position else {
        return write!(f, "unexpected error {kind}");
    };

    write!(f, "{kind}")?;
    if show_token {
        if let Some(token) = token {
            write!(f, "; found {} token", token.token_type())?;
        }
    }
    write!(f, " at position {position}")
}
