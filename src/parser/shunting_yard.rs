use super::{strip_whitespace, Associativity, ParseError, ParseErrorKind, Parser};
use super::{PrioritiesError, TokenPriorities};
use crate::ast::{ASTNode, Operator};
use crate::lexer::{Token, TokenType};
use log::{debug, trace};

/// Operator-stack parser.
///
/// Function calls take exactly one argument and assignment is not
/// understood; commas and `=` are rejected as unsupported tokens.
#[derive(Debug, Clone)]
pub struct ShuntingYardParser {
    priorities: TokenPriorities,
}

impl ShuntingYardParser {
    pub fn new(mut priorities: TokenPriorities) -> Result<Self, PrioritiesError> {
        priorities.normalize()?;
        Ok(Self { priorities })
    }

    pub fn priorities(&self) -> &TokenPriorities {
        &self.priorities
    }
}

impl Parser for ShuntingYardParser {
    fn parse(&self, tokens: &[Token]) -> Result<ASTNode, ParseError> {
        let tokens = strip_whitespace(tokens)?;
        debug!("Shunting-yard parsing {} tokens", tokens.len());

        let mut state = State::new(&self.priorities);
        for (i, &token) in tokens.iter().enumerate() {
            let next = tokens.get(i + 1).map(|t| t.token_type());
            if !state.step(token, next)? {
                break;
            }
        }
        state.finish()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Expect {
    Operand,
    Operator,
}

/// Operator stack entry. `kind` may differ from the token's own type when a
/// `+` or `-` was recognized as unary.
#[derive(Debug, Copy, Clone)]
struct Pending<'t> {
    kind: TokenType,
    token: &'t Token,
}

struct State<'p, 't> {
    priorities: &'p TokenPriorities,
    expect: Expect,
    operators: Vec<Pending<'t>>,
    output: Vec<ASTNode>,
}

impl<'p, 't> State<'p, 't> {
    fn new(priorities: &'p TokenPriorities) -> Self {
        Self {
            priorities,
            expect: Expect::Operand,
            operators: Vec::new(),
            output: Vec::new(),
        }
    }

    /// Handles one token. Returns `false` once the end of input was reached.
    fn step(&mut self, token: &'t Token, next: Option<TokenType>) -> Result<bool, ParseError> {
        trace!(
            "{} token at {}, expecting {:?}",
            token.token_type(),
            token.start(),
            self.expect
        );

        match token.token_type() {
            TokenType::Number => {
                self.require(Expect::Operand, token, ParseErrorKind::ExpectedOperator)?;
                self.output
                    .push(ASTNode::number(token.value(), Some(token.clone())));
                self.expect = Expect::Operator;
            }
            TokenType::Identifier => {
                self.require(Expect::Operand, token, ParseErrorKind::ExpectedOperator)?;
                if next == Some(TokenType::LeftParen) {
                    self.push(TokenType::Identifier, token);
                } else {
                    self.output
                        .push(ASTNode::variable(token.identifier(), Some(token.clone())));
                    self.expect = Expect::Operator;
                }
            }
            TokenType::Addition | TokenType::Subtraction if self.expect == Expect::Operand => {
                let kind = token
                    .token_type()
                    .to_unary()
                    .ok_or_else(|| ParseError::internal(Some(token), "no unary form"))?;
                self.push(kind, token);
            }
            kind if kind.is_binary_operator() => {
                self.require(Expect::Operator, token, ParseErrorKind::ExpectedOperand)?;
                self.pop_while_binding(kind)?;
                self.push(kind, token);
                self.expect = Expect::Operand;
            }
            TokenType::LeftParen => {
                self.require(Expect::Operand, token, ParseErrorKind::ExpectedOperator)?;
                self.push(TokenType::LeftParen, token);
            }
            TokenType::RightParen => {
                self.require(Expect::Operator, token, ParseErrorKind::ExpectedOperand)?;
                self.close_paren(token)?;
            }
            TokenType::EndOfLine => {
                self.require(
                    Expect::Operator,
                    token,
                    ParseErrorKind::UnexpectedEndOfInput,
                )?;
                return Ok(false);
            }
            _ => return Err(ParseError::at(token, ParseErrorKind::UnsupportedToken)),
        }

        Ok(true)
    }

    fn require(
        &self,
        expect: Expect,
        token: &Token,
        kind: ParseErrorKind,
    ) -> Result<(), ParseError> {
        if self.expect == expect {
            Ok(())
        } else {
            Err(ParseError::at(token, kind))
        }
    }

    fn push(&mut self, kind: TokenType, token: &'t Token) {
        self.operators.push(Pending { kind, token });
    }

    /// Reduces stacked operators that bind at least as tightly as `incoming`.
    fn pop_while_binding(&mut self, incoming: TokenType) -> Result<(), ParseError> {
        let precedence = self.priorities.precedence(incoming);
        let left_assoc = self.priorities.associativity(incoming) == Associativity::Left;

        while let Some(top) = self.operators.last().copied() {
            if top.kind == TokenType::LeftParen {
                break;
            }
            let top_precedence = self.priorities.precedence(top.kind);
            if top_precedence > precedence || (top_precedence == precedence && left_assoc) {
                self.operators.pop();
                self.reduce(top)?;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn close_paren(&mut self, token: &'t Token) -> Result<(), ParseError> {
        loop {
            match self.operators.pop() {
                None => return Err(ParseError::at(token, ParseErrorKind::MissingLeftParen)),
                Some(top) if top.kind == TokenType::LeftParen => break,
                Some(top) => self.reduce(top)?,
            }
        }

        if let Some(top) = self.operators.last().copied() {
            if top.kind == TokenType::Identifier {
                self.operators.pop();
                self.reduce(top)?;
            }
        }
        self.expect = Expect::Operator;
        Ok(())
    }

    fn finish(mut self) -> Result<ASTNode, ParseError> {
        while let Some(top) = self.operators.pop() {
            if top.kind == TokenType::LeftParen {
                let kind = ParseErrorKind::MissingRightParen;
                return Err(ParseError::at(top.token, kind));
            }
            self.reduce(top)?;
        }

        if self.output.len() != 1 {
            return Err(ParseError::internal(
                None,
                format!("expected a single output node, got {}", self.output.len()),
            ));
        }
        self.output
            .pop()
            .ok_or_else(|| ParseError::internal(None, "empty output"))
    }

    /// Combines the top output nodes under a popped operator.
    fn reduce(&mut self, pending: Pending<'t>) -> Result<(), ParseError> {
        let Pending { kind, token } = pending;

        let node = match kind {
            TokenType::Identifier => {
                let argument = self.pop_output(token)?;
                ASTNode::function_call(token.identifier(), vec![argument], Some(token.clone()))
            }
            TokenType::UnaryAddition | TokenType::UnarySubtraction => {
                let operand = self.pop_output(token)?;
                let operator = operator(kind, token)?;
                ASTNode::unary(operator, operand, Some(token.with_type(kind)))
            }
            _ => {
                let right = self.pop_output(token)?;
                let left = self.pop_output(token)?;
                ASTNode::binary(operator(kind, token)?, left, right, Some(token.clone()))
            }
        };

        self.output.push(node);
        Ok(())
    }

    fn pop_output(&mut self, token: &Token) -> Result<ASTNode, ParseError> {
        self.output
            .pop()
            .ok_or_else(|| ParseError::internal(Some(token), "missing operand on output stack"))
    }
}

fn operator(kind: TokenType, token: &Token) -> Result<Operator, ParseError> {
    Operator::try_from(kind).map_err(|kind| {
        let message = format!("{} is not an operator", kind);
        ParseError::internal(Some(token), message)
    })
}
