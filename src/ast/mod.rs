use crate::lexer::{Token, TokenType};
use std::fmt;

/// Name of a variable together with the token it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub token: Option<Token>,
}

impl Variable {
    pub fn new(name: impl Into<String>, token: Option<Token>) -> Self {
        Self {
            name: name.into(),
            token,
        }
    }
}

/// Expression tree produced by the parsers.
///
/// Every node keeps the token it originated from so evaluation errors can
/// point back into the source. Nodes built by hand may leave it `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Number {
        value: f64,
        token: Option<Token>,
    },
    Variable(Variable),
    Unary {
        operator: Operator,
        operand: Box<ASTNode>,
        token: Option<Token>,
    },
    Binary {
        left: Box<ASTNode>,
        operator: Operator,
        right: Box<ASTNode>,
        token: Option<Token>,
    },
    Assign {
        target: Variable,
        value: Box<ASTNode>,
        token: Option<Token>,
    },
    FunctionCall {
        name: String,
        args: Vec<ASTNode>,
        token: Option<Token>,
    },
}

impl ASTNode {
    pub fn number(value: f64, token: Option<Token>) -> Self {
        ASTNode::Number { value, token }
    }

    pub fn variable(name: impl Into<String>, token: Option<Token>) -> Self {
        ASTNode::Variable(Variable::new(name, token))
    }

    pub fn unary(operator: Operator, operand: ASTNode, token: Option<Token>) -> Self {
        ASTNode::Unary {
            operator,
            operand: Box::new(operand),
            token,
        }
    }

    pub fn binary(operator: Operator, left: ASTNode, right: ASTNode, token: Option<Token>) -> Self {
        ASTNode::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            token,
        }
    }

    pub fn assign(target: Variable, value: ASTNode, token: Option<Token>) -> Self {
        ASTNode::Assign {
            target,
            value: Box::new(value),
            token,
        }
    }

    pub fn function_call(
        name: impl Into<String>,
        args: Vec<ASTNode>,
        token: Option<Token>,
    ) -> Self {
        ASTNode::FunctionCall {
            name: name.into(),
            args,
            token,
        }
    }

    /// The token this node was built from.
    pub fn token(&self) -> Option<&Token> {
        match self {
            ASTNode::Number { token, .. }
            | ASTNode::Unary { token, .. }
            | ASTNode::Binary { token, .. }
            | ASTNode::Assign { token, .. }
            | ASTNode::FunctionCall { token, .. } => token.as_ref(),
            ASTNode::Variable(variable) => variable.token.as_ref(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Exponent,
    FloorDiv,
    Modulo,
    /// `=` read as an operator. Neither parser builds a `Binary` node with
    /// it (assignment becomes [`ASTNode::Assign`]), so evaluating one is
    /// reported as unimplemented.
    Assign,
}

impl Operator {
    /// Applies the operator to two operands with IEEE-754 semantics.
    ///
    /// Division by zero yields infinities or NaN. `Modulo` is the truncated
    /// remainder (sign follows the dividend) while `FloorDiv` floors the
    /// quotient. Returns `None` for operators that are not binary arithmetic.
    pub fn apply(&self, left: f64, right: f64) -> Option<f64> {
        match self {
            Operator::Add => Some(left + right),
            Operator::Subtract => Some(left - right),
            Operator::Multiply => Some(left * right),
            Operator::Divide => Some(left / right),
            Operator::Exponent => Some(left.powf(right)),
            Operator::FloorDiv => Some((left / right).floor()),
            Operator::Modulo => Some(left % right),
            Operator::Assign => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Exponent => "^",
            Operator::FloorDiv => "//",
            Operator::Modulo => "%",
            Operator::Assign => "=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl TryFrom<TokenType> for Operator {
    type Error = TokenType;

    fn try_from(value: TokenType) -> Result<Self, Self::Error> {
        match value {
            TokenType::Addition | TokenType::UnaryAddition => Ok(Operator::Add),
            TokenType::Subtraction | TokenType::UnarySubtraction => Ok(Operator::Subtract),
            TokenType::Multiplication => Ok(Operator::Multiply),
            TokenType::Division => Ok(Operator::Divide),
            TokenType::Exponent => Ok(Operator::Exponent),
            TokenType::FloorDiv => Ok(Operator::FloorDiv),
            TokenType::Modulus => Ok(Operator::Modulo),
            // Outside the arithmetic grammar, see `Operator::Assign`.
            TokenType::Equal => Ok(Operator::Assign),
            other => Err(other),
        }
    }
}
