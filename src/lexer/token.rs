use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenType {
    EndOfLine,
    LeftParen,
    RightParen,
    Exponent,
    Multiplication,
    Division,
    FloorDiv,
    Modulus,
    Addition,
    Subtraction,
    UnaryAddition,
    UnarySubtraction,
    Number,
    Identifier,
    Whitespace,
    Comma,
    Equal,
}

impl TokenType {
    /// Returns the unary counterpart of `Addition` and `Subtraction`.
    ///
    /// The lexer cannot tell `-` in `1 - 2` from `-` in `-2`, so parsers
    /// re-type the token once they know which one they are looking at.
    pub fn to_unary(self) -> Option<TokenType> {
        match self {
            TokenType::Addition | TokenType::UnaryAddition => Some(TokenType::UnaryAddition),
            TokenType::Subtraction | TokenType::UnarySubtraction => {
                Some(TokenType::UnarySubtraction)
            }
            _ => None,
        }
    }

    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenType::Equal
                | TokenType::Addition
                | TokenType::Subtraction
                | TokenType::Multiplication
                | TokenType::Division
                | TokenType::FloorDiv
                | TokenType::Modulus
                | TokenType::UnaryAddition
                | TokenType::UnarySubtraction
                | TokenType::Exponent
        )
    }

    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            TokenType::Addition
                | TokenType::Subtraction
                | TokenType::Multiplication
                | TokenType::Division
                | TokenType::FloorDiv
                | TokenType::Modulus
                | TokenType::Exponent
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::EndOfLine => "EOL",
            TokenType::LeftParen => "LPar",
            TokenType::RightParen => "RPar",
            TokenType::Exponent => "Exponent",
            TokenType::Multiplication => "Multiplication",
            TokenType::Division => "Division",
            TokenType::FloorDiv => "FloorDiv",
            TokenType::Modulus => "Modulus",
            TokenType::Addition => "Addition",
            TokenType::Subtraction => "Subtraction",
            TokenType::UnaryAddition => "UnaryAddition",
            TokenType::UnarySubtraction => "UnarySubtraction",
            TokenType::Number => "Number",
            TokenType::Identifier => "Identifier",
            TokenType::Whitespace => "Whitespace",
            TokenType::Comma => "Comma",
            TokenType::Equal => "Equal",
        };
        f.write_str(name)
    }
}

/// A classified lexical unit covering the byte range `[start, end)` of the
/// source expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    token_type: TokenType,
    value: f64,
    identifier: String,
    start: usize,
    end: usize,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        value: f64,
        identifier: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        debug_assert!(start <= end, "token start must not be after its end");
        Self {
            token_type,
            value,
            identifier: identifier.into(),
            start,
            end,
        }
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Copy of this token with a different type, same span.
    pub fn with_type(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            ..self.clone()
        }
    }

    /// Copy of this token re-typed as a unary operator, if it can be one.
    pub fn to_unary(&self) -> Option<Token> {
        self.token_type.to_unary().map(|t| self.with_type(t))
    }
}
