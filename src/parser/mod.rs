mod error;
mod priorities;
mod recursive_descent;
mod shunting_yard;

pub use error::*;
pub use priorities::*;
pub use recursive_descent::RecursiveDescentParser;
pub use shunting_yard::ShuntingYardParser;

use crate::ast::ASTNode;
use crate::lexer::{Token, TokenType};
use std::fmt;
use std::str::FromStr;

/// Turns a token list (as produced by the lexer) into an expression tree.
pub trait Parser {
    fn parse(&self, tokens: &[Token]) -> Result<ASTNode, ParseError>;
}

/// Which parsing algorithm to use.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum ParserKind {
    /// Operator-stack parser. Supports single-argument function calls only
    /// and no assignment.
    #[default]
    ShuntingYard,
    /// Precedence-climbing parser with multi-argument calls and assignment.
    RecursiveDescent,
}

impl ParserKind {
    pub const ALL: [ParserKind; 2] = [ParserKind::ShuntingYard, ParserKind::RecursiveDescent];

    /// Builds the parser. Fails when the priorities cannot be normalized.
    pub fn build(self, priorities: TokenPriorities) -> Result<Box<dyn Parser>, PrioritiesError> {
        Ok(match self {
            ParserKind::ShuntingYard => Box::new(ShuntingYardParser::new(priorities)?),
            ParserKind::RecursiveDescent => Box::new(RecursiveDescentParser::new(priorities)?),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParserKind::ShuntingYard => "shunting-yard",
            ParserKind::RecursiveDescent => "recursive-descent",
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shunting-yard" | "shunt-yard" | "sy" => Ok(ParserKind::ShuntingYard),
            "recursive-descent" | "rd" => Ok(ParserKind::RecursiveDescent),
            _ => Err(format!(
                "Invalid parser '{}', available ones are: 'shunting-yard', 'recursive-descent'",
                s
            )),
        }
    }
}

/// Drops whitespace tokens and checks the list is terminated by `EndOfLine`.
pub(crate) fn strip_whitespace(tokens: &[Token]) -> Result<Vec<&Token>, ParseError> {
    let tokens: Vec<&Token> = tokens
        .iter()
        .filter(|token| token.token_type() != TokenType::Whitespace)
        .collect();

    match tokens.last() {
        None => Err(ParseError::new(None, ParseErrorKind::EmptyInput)),
        Some(last) if last.token_type() != TokenType::EndOfLine => {
            Err(ParseError::at(last, ParseErrorKind::ExpectedEndOfInput))
        }
        Some(_) => Ok(tokens),
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::ast::{ASTNode, Operator};
    use crate::lexer::{Token, TokenType};

    pub fn t(token_type: TokenType, start: usize, end: usize) -> Token {
        Token::new(token_type, 0.0, "", start, end)
    }

    pub fn num(value: f64, start: usize, end: usize) -> Token {
        Token::new(TokenType::Number, value, "", start, end)
    }

    pub fn ident(name: &str, start: usize, end: usize) -> Token {
        Token::new(TokenType::Identifier, 0.0, name, start, end)
    }

    pub fn eol(at: usize) -> Token {
        Token::new(TokenType::EndOfLine, 0.0, "", at, at)
    }

    /// Strips tokens from a tree so tests can compare shape only.
    pub fn shape(node: &ASTNode) -> String {
        match node {
            ASTNode::Number { value, .. } => format!("{}", value),
            ASTNode::Variable(variable) => variable.name.clone(),
            ASTNode::Unary {
                operator, operand, ..
            } => format!("({}{})", operator, shape(operand)),
            ASTNode::Binary {
                left,
                operator,
                right,
                ..
            } => format!("({} {} {})", shape(left), operator, shape(right)),
            ASTNode::Assign { target, value, .. } => {
                format!("({} = {})", target.name, shape(value))
            }
            ASTNode::FunctionCall { name, args, .. } => format!(
                "{}({})",
                name,
                args.iter().map(shape).collect::<Vec<_>>().join(", ")
            ),
        }
    }

    pub fn unary_op(operator: Operator) -> TokenType {
        match operator {
            Operator::Add => TokenType::UnaryAddition,
            _ => TokenType::UnarySubtraction,
        }
    }
}
