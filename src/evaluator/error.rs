use crate::ast::Operator;
use crate::error::write_located;
use crate::lexer::Token;
use std::fmt;
use thiserror::Error;

/// Argument count outside of what a function declares.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArityMismatch {
    #[error("function '{name}' require {expected} arguments, got {got}")]
    Exact {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("function '{name}' require at least {min} arguments, got {got}")]
    TooFew {
        name: String,
        min: usize,
        got: usize,
    },
    #[error(
        "function '{name}' require between {min} and {max} arguments, got {got}"
    )]
    OutOfRange {
        name: String,
        min: usize,
        max: usize,
        got: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),
    #[error("undefined function '{0}'")]
    UndefinedFunction(String),
    #[error(transparent)]
    ArityMismatch(#[from] ArityMismatch),
    #[error("{message} in function '{name}'")]
    FunctionFailed { name: String, message: String },
    #[error("unary node supports only Addition and Subtraction operator, got {0}")]
    UnsupportedUnaryOperator(Operator),
    #[error("unimplemented operator {0}")]
    UnimplementedOperator(Operator),
}

/// Evaluation failure located by the node that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    token: Option<Token>,
    kind: EvalErrorKind,
}

impl EvalError {
    pub fn new(token: Option<&Token>, kind: impl Into<EvalErrorKind>) -> Self {
        Self {
            token: token.cloned(),
            kind: kind.into(),
        }
    }

    pub fn kind(&self) -> &EvalErrorKind {
        &self.kind
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn position(&self) -> Option<usize> {
        self.token.as_ref().map(Token::start)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_located(f, &self.kind, self.token(), self.position(), false)
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Rejected evaluator configuration. Names are compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    #[error(
        "variable with name '{name}' was defined as '{previous}' before, variables are case insensitive"
    )]
    DuplicateVariable { name: String, previous: String },
    #[error(
        "function named '{name}' was defined as '{previous}' before, function names are case insensitive"
    )]
    DuplicateFunction { name: String, previous: String },
}
