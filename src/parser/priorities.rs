use crate::lexer::TokenType;
use std::collections::HashMap;
use thiserror::Error;

pub type Precedence = u16;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Associativity {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct TokenMeta {
    pub precedence: Precedence,
    pub associativity: Associativity,
}

impl TokenMeta {
    pub fn new(precedence: Precedence, associativity: Associativity) -> Self {
        Self {
            precedence,
            associativity,
        }
    }

    pub fn left(precedence: Precedence) -> Self {
        Self::new(precedence, Associativity::Left)
    }

    pub fn right(precedence: Precedence) -> Self {
        Self::new(precedence, Associativity::Right)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrioritiesError {
    #[error("precedence must be greater than 0")]
    ZeroPrecedence,
}

/// Operator precedence and associativity shared by both parsers.
///
/// Precedence `0` means "not an operator" and is what lookups of unmapped
/// token types return.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPriorities {
    table: HashMap<TokenType, TokenMeta>,
}

impl Default for TokenPriorities {
    fn default() -> Self {
        Self {
            table: HashMap::from([
                (TokenType::Equal, TokenMeta::right(10)),
                (TokenType::Addition, TokenMeta::left(20)),
                (TokenType::Subtraction, TokenMeta::left(20)),
                (TokenType::Multiplication, TokenMeta::left(40)),
                (TokenType::Division, TokenMeta::left(40)),
                (TokenType::FloorDiv, TokenMeta::left(40)),
                (TokenType::Modulus, TokenMeta::left(40)),
                (TokenType::UnaryAddition, TokenMeta::left(60)),
                (TokenType::UnarySubtraction, TokenMeta::left(60)),
                (TokenType::Exponent, TokenMeta::right(80)),
            ]),
        }
    }
}

impl TokenPriorities {
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    pub fn insert(&mut self, token_type: TokenType, meta: TokenMeta) -> &mut Self {
        self.table.insert(token_type, meta);
        self
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Drops entries for non-operator token types and checks that every
    /// remaining operator has a non-zero precedence.
    pub fn normalize(&mut self) -> Result<(), PrioritiesError> {
        self.table.retain(|token_type, _| token_type.is_operator());
        if self.min_precedence() == 0 {
            return Err(PrioritiesError::ZeroPrecedence);
        }
        Ok(())
    }

    pub fn meta(&self, token_type: TokenType) -> Option<TokenMeta> {
        self.table.get(&token_type).copied()
    }

    pub fn precedence(&self, token_type: TokenType) -> Precedence {
        self.meta(token_type).unwrap_or_default().precedence
    }

    pub fn associativity(&self, token_type: TokenType) -> Associativity {
        self.meta(token_type).unwrap_or_default().associativity
    }

    /// Lowest precedence in the table, `0` when the table is empty.
    pub fn min_precedence(&self) -> Precedence {
        self.table
            .values()
            .map(|meta| meta.precedence)
            .min()
            .unwrap_or(0)
    }

    pub fn max_precedence(&self) -> Precedence {
        self.table
            .values()
            .map(|meta| meta.precedence)
            .max()
            .unwrap_or(0)
    }

    /// Smallest precedence strictly above `current`, or the maximum when
    /// there is none.
    pub fn next_precedence(&self, current: Precedence) -> Precedence {
        self.table
            .values()
            .map(|meta| meta.precedence)
            .filter(|&precedence| precedence > current)
            .min()
            .unwrap_or_else(|| self.max_precedence())
    }
}
