use super::{strip_whitespace, Associativity, ParseError, ParseErrorKind, Parser};
use super::{Precedence, PrioritiesError, TokenPriorities};
use crate::ast::{ASTNode, Operator, Variable};
use crate::lexer::{Token, TokenType};
use log::debug;

/// Precedence-climbing parser.
///
/// Unlike [`ShuntingYardParser`](super::ShuntingYardParser) it accepts
/// comma-separated function arguments and a top-level `name = expression`
/// assignment.
#[derive(Debug, Clone)]
pub struct RecursiveDescentParser {
    priorities: TokenPriorities,
}

impl RecursiveDescentParser {
    pub fn new(mut priorities: TokenPriorities) -> Result<Self, PrioritiesError> {
        priorities.normalize()?;
        Ok(Self { priorities })
    }

    pub fn priorities(&self) -> &TokenPriorities {
        &self.priorities
    }
}

impl Parser for RecursiveDescentParser {
    fn parse(&self, tokens: &[Token]) -> Result<ASTNode, ParseError> {
        let tokens = strip_whitespace(tokens)?;
        debug!("Recursive-descent parsing {} tokens", tokens.len());

        let mut cursor = Cursor {
            priorities: &self.priorities,
            tokens,
            pos: 0,
        };
        cursor.parse_block()
    }
}

/// Walks the whitespace-free token list. The last token is always
/// `EndOfLine` and the cursor never moves past it.
struct Cursor<'p, 't> {
    priorities: &'p TokenPriorities,
    tokens: Vec<&'t Token>,
    pos: usize,
}

impl<'p, 't> Cursor<'p, 't> {
    fn current(&self) -> &'t Token {
        self.tokens[self.pos]
    }

    fn peek_type(&self) -> Option<TokenType> {
        self.tokens
            .get(self.pos + 1)
            .map(|token| token.token_type())
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn at(&self, token_type: TokenType) -> bool {
        self.current().token_type() == token_type
    }

    fn parse_block(&mut self) -> Result<ASTNode, ParseError> {
        let first = self.current();
        if first.token_type() == TokenType::EndOfLine {
            return Err(ParseError::at(first, ParseErrorKind::EmptyInput));
        }

        let node = if first.token_type() == TokenType::Identifier
            && self.peek_type() == Some(TokenType::Equal)
        {
            self.advance();
            let equal = self.current();
            self.advance();

            let value = self.parse_required(self.priorities.precedence(TokenType::Equal))?;
            let target = Variable::new(first.identifier(), Some(first.clone()));
            ASTNode::assign(target, value, Some(equal.clone()))
        } else {
            self.parse_required(self.priorities.min_precedence())?
        };

        match self.current().token_type() {
            TokenType::EndOfLine => Ok(node),
            TokenType::RightParen => {
                Err(ParseError::at(self.current(), ParseErrorKind::MissingLeftParen))
            }
            _ => Err(ParseError::at(self.current(), ParseErrorKind::UnexpectedToken)),
        }
    }

    fn parse_required(&mut self, precedence: Precedence) -> Result<ASTNode, ParseError> {
        let node = self.parse_expression(precedence)?;
        self.expect_operand(node)
    }

    fn expect_operand(&self, node: Option<ASTNode>) -> Result<ASTNode, ParseError> {
        node.ok_or_else(|| ParseError::at(self.current(), ParseErrorKind::ExpectedOperand))
    }

    /// Parses an operand at `precedence` and then folds every following
    /// operator of exactly that precedence into it.
    fn parse_expression(&mut self, precedence: Precedence) -> Result<Option<ASTNode>, ParseError> {
        let Some(mut left) = self.parse_operand(precedence)? else {
            return Ok(None);
        };

        while let Some(meta) = self.priorities.meta(self.current().token_type()) {
            if meta.precedence != precedence {
                break;
            }
            left = self.parse_binary(left, precedence, meta.associativity)?;
        }
        Ok(Some(left))
    }

    /// Operand for an operator of `precedence`: a tighter-binding
    /// sub-expression, a term, or a unary operator when `precedence` is
    /// the unary level. `None` when nothing matches.
    fn parse_operand(&mut self, precedence: Precedence) -> Result<Option<ASTNode>, ParseError> {
        if precedence < self.priorities.max_precedence() {
            let next = self.priorities.next_precedence(precedence);
            if let Some(node) = self.parse_expression(next)? {
                return Ok(Some(node));
            }
        }

        if let Some(term) = self.parse_term()? {
            return Ok(Some(term));
        }
        if self.unary_precedence() == Some(precedence) {
            return self.parse_unary().map(Some);
        }
        Ok(None)
    }

    fn parse_binary(
        &mut self,
        left: ASTNode,
        precedence: Precedence,
        associativity: Associativity,
    ) -> Result<ASTNode, ParseError> {
        let token = self.current();
        if !token.token_type().is_binary_operator() {
            return Err(ParseError::at(token, ParseErrorKind::UnexpectedToken));
        }
        let operator = operator(token.token_type(), token)?;
        self.advance();

        // Descending from here never reaches a unary level below this
        // operator, so a sign right after it is taken as unary directly.
        let right = match self.unary_precedence() {
            Some(unary) if unary < precedence => self.parse_unary()?,
            _ => match associativity {
                Associativity::Right => self.parse_required(precedence)?,
                Associativity::Left => {
                    let operand = self.parse_operand(precedence)?;
                    self.expect_operand(operand)?
                }
            },
        };

        Ok(ASTNode::binary(operator, left, right, Some(token.clone())))
    }

    /// Precedence of the current token read as a unary operator, if it can
    /// be one and the table knows it.
    fn unary_precedence(&self) -> Option<Precedence> {
        let unary = self.current().token_type().to_unary()?;
        self.priorities.meta(unary).map(|meta| meta.precedence)
    }

    fn parse_unary(&mut self) -> Result<ASTNode, ParseError> {
        let token = self.current();
        let unary = token
            .to_unary()
            .ok_or_else(|| ParseError::at(token, ParseErrorKind::UnexpectedToken))?;
        let operator = operator(unary.token_type(), token)?;
        self.advance();

        let operand = self.parse_required(self.priorities.precedence(unary.token_type()))?;
        Ok(ASTNode::unary(operator, operand, Some(unary)))
    }

    fn parse_term(&mut self) -> Result<Option<ASTNode>, ParseError> {
        let token = self.current();
        match token.token_type() {
            TokenType::Number => {
                self.advance();
                Ok(Some(ASTNode::number(token.value(), Some(token.clone()))))
            }
            TokenType::Identifier => {
                let name = token.identifier();
                self.advance();
                if self.at(TokenType::LeftParen) {
                    let open = self.current();
                    self.advance();
                    let args = self.parse_arguments(open)?;
                    let call = ASTNode::function_call(name, args, Some(token.clone()));
                    Ok(Some(call))
                } else {
                    Ok(Some(ASTNode::variable(name, Some(token.clone()))))
                }
            }
            TokenType::LeftParen => {
                self.advance();
                let inner = self.parse_required(self.priorities.min_precedence())?;
                self.expect_right_paren(token)?;
                Ok(Some(inner))
            }
            _ => Ok(None),
        }
    }

    /// Arguments after an already consumed `(`, up to and including `)`.
    fn parse_arguments(&mut self, open: &Token) -> Result<Vec<ASTNode>, ParseError> {
        let mut args = Vec::new();
        if self.at(TokenType::RightParen) {
            self.advance();
            return Ok(args);
        }

        loop {
            args.push(self.parse_required(self.priorities.min_precedence())?);
            if !self.at(TokenType::Comma) {
                break;
            }
            self.advance();
        }

        self.expect_right_paren(open)?;
        Ok(args)
    }

    fn expect_right_paren(&mut self, open: &Token) -> Result<(), ParseError> {
        match self.current().token_type() {
            TokenType::RightParen => {
                self.advance();
                Ok(())
            }
            TokenType::EndOfLine => Err(ParseError::at(open, ParseErrorKind::MissingRightParen)),
            _ => Err(ParseError::at(self.current(), ParseErrorKind::UnexpectedToken)),
        }
    }
}

fn operator(kind: TokenType, token: &Token) -> Result<Operator, ParseError> {
    Operator::try_from(kind).map_err(|kind| {
        let message = format!("{} is not an operator", kind);
        ParseError::internal(Some(token), message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::test_utils::*;
    use crate::parser::TokenMeta;

    fn parser() -> RecursiveDescentParser {
        RecursiveDescentParser::new(TokenPriorities::default()).unwrap()
    }

    fn parse(input: &str) -> Result<ASTNode, ParseError> {
        parser().parse(&tokenize(input).unwrap())
    }

    fn parse_shape(input: &str) -> String {
        shape(&parse(input).unwrap())
    }

    #[test]
    fn test_single_operand() {
        let tokens = vec![ident("Foo", 0, 3), eol(3)];
        assert_eq!(
            parser().parse(&tokens),
            Ok(ASTNode::variable("Foo", Some(tokens[0].clone())))
        );
    }

    #[test]
    fn test_assignment() {
        let tokens = tokenize("x = 5 + 3").unwrap();
        let expected = ASTNode::assign(
            Variable::new("x", Some(ident("x", 0, 1))),
            ASTNode::binary(
                Operator::Add,
                ASTNode::number(5.0, Some(num(5.0, 4, 5))),
                ASTNode::number(3.0, Some(num(3.0, 8, 9))),
                Some(t(TokenType::Addition, 6, 7)),
            ),
            Some(t(TokenType::Equal, 2, 3)),
        );
        assert_eq!(parser().parse(&tokens), Ok(expected));
    }

    #[test]
    fn test_precedence_and_associativity() {
        let cases = vec![
            ("2 + 3 * 4", "(2 + (3 * 4))"),
            ("(2 + 3) * 4", "((2 + 3) * 4)"),
            ("8 - 4 - 2", "((8 - 4) - 2)"),
            ("2 ^ 3 ^ 2", "(2 ^ (3 ^ 2))"),
            ("-2 ^ 2", "(-(2 ^ 2))"),
            ("-2 * 3", "((-2) * 3)"),
            ("7 // 2 % 3 / 4", "(((7 // 2) % 3) / 4)"),
            ("20 - - - - 5 + + 7", "((20 - (-(-(-5)))) + (+7))"),
            ("2 ^ -3 * 4", "((2 ^ (-3)) * 4)"),
            ("2 - -3 * 4", "(2 - ((-3) * 4))"),
            ("2 * -3 ^ 2", "(2 * (-(3 ^ 2)))"),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_shape(input), expected, "input '{}'", input);
        }
    }

    #[test]
    fn test_function_arguments() {
        assert_eq!(parse_shape("pi()"), "pi()");
        assert_eq!(parse_shape("max(1, 5, 3)"), "max(1, 5, 3)");
        assert_eq!(
            parse_shape("max(min(1, 2), -x * 3) + 1"),
            "(max(min(1, 2), ((-x) * 3)) + 1)"
        );
        assert_eq!(parse_shape("y = log(8, 2)"), "(y = log(8, 2))");
    }

    #[test]
    fn test_left_associative_top_level() {
        let mut priorities = TokenPriorities::default();
        priorities.insert(TokenType::Exponent, TokenMeta::left(80));
        let parser = RecursiveDescentParser::new(priorities).unwrap();

        let node = parser.parse(&tokenize("2 ^ 3 ^ 4").unwrap()).unwrap();
        assert_eq!(shape(&node), "((2 ^ 3) ^ 4)");
        let node = parser.parse(&tokenize("2 ^ -3 ^ 4").unwrap()).unwrap();
        assert_eq!(shape(&node), "(2 ^ (-(3 ^ 4)))");
    }

    #[test]
    fn test_errors() {
        let cases = vec![
            ("", ParseErrorKind::EmptyInput, Some(0)),
            ("   ", ParseErrorKind::EmptyInput, Some(3)),
            ("1 2", ParseErrorKind::UnexpectedToken, Some(2)),
            ("1 , 2", ParseErrorKind::UnexpectedToken, Some(2)),
            ("(1 2)", ParseErrorKind::UnexpectedToken, Some(3)),
            ("1 + 2)", ParseErrorKind::MissingLeftParen, Some(5)),
            ("(1 + 2", ParseErrorKind::MissingRightParen, Some(0)),
            ("f(1", ParseErrorKind::MissingRightParen, Some(1)),
            ("* 3", ParseErrorKind::ExpectedOperand, Some(0)),
            ("1 +", ParseErrorKind::ExpectedOperand, Some(3)),
            ("()", ParseErrorKind::ExpectedOperand, Some(1)),
            ("f(1,)", ParseErrorKind::ExpectedOperand, Some(4)),
            ("x = ", ParseErrorKind::ExpectedOperand, Some(4)),
            ("1 + x = 3", ParseErrorKind::UnexpectedToken, Some(6)),
            ("x = y = 3", ParseErrorKind::UnexpectedToken, Some(6)),
            ("2 = 3", ParseErrorKind::UnexpectedToken, Some(2)),
        ];
        for (input, kind, position) in cases {
            let err = parse(input).unwrap_err();
            assert_eq!(
                (err.kind().clone(), err.position()),
                (kind, position),
                "input '{}'",
                input
            );
        }
    }

    #[test]
    fn test_missing_end_of_line() {
        let err = parser().parse(&[num(1.0, 0, 1)]).unwrap_err();
        assert_eq!(err.kind(), &ParseErrorKind::ExpectedEndOfInput);
        assert_eq!(err.position(), Some(0));
    }
}
