use crate::ast::ASTNode;
use crate::error::Error;
use crate::evaluator::{Evaluator, FunctionHandler};
use crate::functions::builtin_functions;
use crate::lexer::Lexer;
use crate::parser::{Parser, ParserKind, TokenPriorities};
use log::debug;
use std::collections::HashMap;

/// Everything needed to set up a [`Calculator`].
#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    pub parser: ParserKind,
    pub priorities: TokenPriorities,
    pub variables: HashMap<String, f64>,
    /// Register [`builtin_functions`] next to `functions`.
    pub builtin_functions: bool,
    pub functions: Vec<HashMap<String, FunctionHandler>>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            parser: ParserKind::default(),
            priorities: TokenPriorities::default(),
            variables: HashMap::new(),
            builtin_functions: true,
            functions: Vec::new(),
        }
    }
}

impl CalculatorConfig {
    pub fn with_parser(mut self, parser: ParserKind) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_priorities(mut self, priorities: TokenPriorities) -> Self {
        self.priorities = priorities;
        self
    }

    pub fn with_variables(mut self, variables: HashMap<String, f64>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: f64) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    pub fn with_builtin_functions(mut self, enabled: bool) -> Self {
        self.builtin_functions = enabled;
        self
    }

    pub fn with_functions(mut self, functions: HashMap<String, FunctionHandler>) -> Self {
        self.functions.push(functions);
        self
    }
}

/// Lexer, parser and evaluator wired together.
///
/// Variables assigned by one expression stay visible to later ones.
pub struct Calculator {
    kind: ParserKind,
    parser: Box<dyn Parser>,
    evaluator: Evaluator,
}

impl Calculator {
    pub fn new(config: CalculatorConfig) -> Result<Self, Error> {
        let CalculatorConfig {
            parser: kind,
            priorities,
            variables,
            builtin_functions: with_builtins,
            functions,
        } = config;

        let parser = kind.build(priorities)?;

        let mut function_sets = Vec::new();
        if with_builtins {
            function_sets.extend(builtin_functions());
        }
        function_sets.extend(functions);
        let evaluator = Evaluator::new(variables, function_sets)?;

        debug!("Calculator ready, using {} parser", kind);
        Ok(Self {
            kind,
            parser,
            evaluator,
        })
    }

    pub fn parser_kind(&self) -> ParserKind {
        self.kind
    }

    /// Tokenizes and parses without evaluating.
    pub fn parse(&self, expression: &str) -> Result<ASTNode, Error> {
        let tokens = Lexer::new(expression).tokenize()?;
        Ok(self.parser.parse(&tokens)?)
    }

    pub fn evaluate(&mut self, expression: &str) -> Result<f64, Error> {
        let ast = self.parse(expression)?;
        self.evaluate_ast(&ast)
    }

    pub fn evaluate_ast(&mut self, ast: &ASTNode) -> Result<f64, Error> {
        Ok(self.evaluator.evaluate(ast)?)
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut Evaluator {
        &mut self.evaluator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenType;
    use crate::parser::{PrioritiesError, TokenMeta};

    #[test]
    fn test_default_config() {
        let config = CalculatorConfig::default();
        assert_eq!(config.parser, ParserKind::ShuntingYard);
        assert!(config.builtin_functions);
        assert!(config.variables.is_empty());
    }

    #[test]
    fn test_variables_persist_between_calls() {
        let config = CalculatorConfig::default().with_parser(ParserKind::RecursiveDescent);
        let mut calculator = Calculator::new(config).unwrap();
        assert_eq!(calculator.evaluate("x = 5 + 3"), Ok(8.0));
        assert_eq!(calculator.evaluate("X * 2"), Ok(16.0));
        assert_eq!(calculator.evaluator().variable("x"), Some(8.0));
    }

    #[test]
    fn test_without_builtins() {
        let config = CalculatorConfig::default().with_builtin_functions(false);
        let mut calculator = Calculator::new(config).unwrap();
        assert!(calculator.evaluator().list_functions().is_empty());
        assert!(matches!(
            calculator.evaluate("sqrt(4)"),
            Err(Error::Eval(_))
        ));
    }

    #[test]
    fn test_user_function_clashing_with_builtin() {
        let functions = HashMap::from([(
            "Sqrt".to_string(),
            FunctionHandler::new("", &["x"], 1, 1, |args| Ok(args[0])),
        )]);
        let result = Calculator::new(CalculatorConfig::default().with_functions(functions));
        assert!(matches!(result, Err(Error::Environment(_))));
    }

    #[test]
    fn test_invalid_priorities() {
        let mut priorities = TokenPriorities::default();
        priorities.insert(TokenType::Multiplication, TokenMeta::left(0));
        let result = Calculator::new(CalculatorConfig::default().with_priorities(priorities));
        assert!(matches!(
            result,
            Err(Error::Priorities(PrioritiesError::ZeroPrecedence))
        ));
    }
}
