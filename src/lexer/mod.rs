mod error;
mod token;

pub use error::*;
pub use token::*;

use log::{debug, trace};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "lexer/tokens.pest"]
struct TokenGrammar;

/// Splits an expression into position-tagged tokens.
pub struct Lexer<'a> {
    expression: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(expression: &'a str) -> Self {
        Self { expression }
    }

    /// The source text, used by callers to slice error context.
    pub fn expression(&self) -> &'a str {
        self.expression
    }

    /// Converts the expression into a token list.
    ///
    /// Whitespace is kept as tokens so positions stay exact; parsers drop it.
    /// The list always ends with a zero-width `EndOfLine` token.
    pub fn tokenize(&self) -> Result<Vec<Token>, LexError> {
        debug!("Tokenizing expression: {}", self.expression);

        let stream = TokenGrammar::parse(Rule::token_stream, self.expression)
            .map_err(|_| LexError::at(0, LexErrorKind::UnexpectedCharacter))?
            .next()
            .ok_or_else(|| LexError::at(0, LexErrorKind::UnexpectedCharacter))?;

        let mut tokens = Vec::new();
        let mut last_end = 0;
        for pair in stream.into_inner() {
            let span = pair.as_span();
            // A token starting later than the previous one ended means some
            // characters matched nothing.
            if span.start() != last_end {
                return Err(LexError::at(last_end, LexErrorKind::UnexpectedCharacter));
            }
            last_end = span.end();

            let token = Self::build_token(pair)?;
            trace!(
                "Token {} at {}..{}",
                token.token_type(),
                token.start(),
                token.end()
            );
            tokens.push(token);
        }

        if last_end != self.expression.len() {
            return Err(LexError::at(last_end, LexErrorKind::UnexpectedCharacter));
        }

        let end_of_line = Token::new(TokenType::EndOfLine, 0.0, "", last_end, last_end);
        tokens.push(end_of_line);
        debug!("Produced {} tokens", tokens.len());
        Ok(tokens)
    }

    fn build_token(pair: Pair<Rule>) -> Result<Token, LexError> {
        let span = pair.as_span();
        let (start, end) = (span.start(), span.end());

        let token_type = match pair.as_rule() {
            Rule::left_paren => TokenType::LeftParen,
            Rule::right_paren => TokenType::RightParen,
            Rule::exponent => TokenType::Exponent,
            Rule::floor_div => TokenType::FloorDiv,
            Rule::modulus => TokenType::Modulus,
            Rule::plus => TokenType::Addition,
            Rule::minus => TokenType::Subtraction,
            Rule::star => TokenType::Multiplication,
            Rule::slash => TokenType::Division,
            Rule::comma => TokenType::Comma,
            Rule::equal => TokenType::Equal,
            Rule::whitespace => TokenType::Whitespace,
            Rule::identifier => {
                let name = pair.as_str();
                return Ok(Token::new(TokenType::Identifier, 0.0, name, start, end));
            }
            Rule::number => return Self::build_number(pair.as_str(), start, end),
            _ => return Err(LexError::at(start, LexErrorKind::UnexpectedCharacter)),
        };

        Ok(Token::new(token_type, 0.0, "", start, end))
    }

    fn build_number(text: &str, start: usize, end: usize) -> Result<Token, LexError> {
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                Ok(Token::new(TokenType::Number, value, "", start, end))
            }
            Ok(_) => Err(LexError::for_token(
                Token::new(TokenType::Number, 0.0, "", start, end),
                LexErrorKind::NumberOutOfRange,
            )),
            Err(_) => Err(LexError::for_token(
                Token::new(TokenType::Number, 0.0, "", start, end),
                LexErrorKind::InvalidNumber,
            )),
        }
    }
}

/// Shorthand for `Lexer::new(expression).tokenize()`.
pub fn tokenize(expression: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(expression).tokenize()
}
