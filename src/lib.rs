//! Arithmetic expression interpreter.
//!
//! Text goes through the [`lexer`], one of two interchangeable [`parser`]s
//! (shunting-yard or recursive descent, both building the same [`ast`]) and
//! finally the tree-walking [`evaluator`].

pub mod ast;
pub mod calculator;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod parser;

pub use calculator::{Calculator, CalculatorConfig};
pub use error::Error;

use parser::ParserKind;
use std::collections::HashMap;

/// Evaluates a single expression with the built-in functions and `context`
/// as variables. Uses the recursive-descent parser so multi-argument calls
/// work.
pub fn evaluate_expression(expression: &str, context: &HashMap<String, f64>) -> Result<f64, Error> {
    let config = CalculatorConfig::default()
        .with_parser(ParserKind::RecursiveDescent)
        .with_variables(context.clone());
    Calculator::new(config)?.evaluate(expression)
}
