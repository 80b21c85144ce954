mod error;
mod function;

pub use error::*;
pub use function::*;

use crate::ast::{ASTNode, Operator};
use log::{debug, trace};
use std::collections::HashMap;

/// Tree-walking interpreter over [`ASTNode`]s.
///
/// Variable and function names are case-insensitive: they are stored
/// lowercased and looked up the same way. Variables can be reassigned by
/// evaluating an `Assign` node; functions are fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    variables: HashMap<String, f64>,
    functions: HashMap<String, FunctionHandler>,
}

impl Evaluator {
    /// Builds the environment, failing on names that only differ by case.
    ///
    /// Several function sets can be passed (e.g. built-ins and user
    /// functions); a name may appear in only one of them.
    pub fn new<I>(
        variables: HashMap<String, f64>,
        function_sets: I,
    ) -> Result<Self, EnvironmentError>
    where
        I: IntoIterator<Item = HashMap<String, FunctionHandler>>,
    {
        let mut evaluator = Self::default();

        let mut seen = HashMap::new();
        for (name, value) in sorted(variables) {
            let key = name.to_lowercase();
            if let Some(previous) = seen.insert(key.clone(), name.clone()) {
                return Err(EnvironmentError::DuplicateVariable { name, previous });
            }
            evaluator.variables.insert(key, value);
        }

        let mut seen = HashMap::new();
        for set in function_sets {
            for (name, handler) in sorted(set) {
                let key = name.to_lowercase();
                if let Some(previous) = seen.insert(key.clone(), name.clone()) {
                    return Err(EnvironmentError::DuplicateFunction { name, previous });
                }
                evaluator.functions.insert(key, handler);
            }
        }

        debug!(
            "Evaluator created with {} variables and {} functions",
            evaluator.variables.len(),
            evaluator.functions.len()
        );
        Ok(evaluator)
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(&name.to_lowercase()).copied()
    }

    pub fn set_variable(&mut self, name: &str, value: f64) {
        self.variables.insert(name.to_lowercase(), value);
    }

    pub fn function(&self, name: &str) -> Option<&FunctionHandler> {
        self.functions.get(&name.to_lowercase())
    }

    /// All variables with their current values, sorted by name.
    pub fn list_variables(&self) -> Vec<(String, f64)> {
        let mut list: Vec<_> = self
            .variables
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        list.sort_by(|a, b| a.0.cmp(&b.0));
        list
    }

    /// All functions, sorted by name.
    pub fn list_functions(&self) -> Vec<(String, &FunctionHandler)> {
        let mut list: Vec<_> = self
            .functions
            .iter()
            .map(|(name, handler)| (name.clone(), handler))
            .collect();
        list.sort_by(|a, b| a.0.cmp(&b.0));
        list
    }

    /// Reduces the tree to a number. The first failure aborts evaluation.
    pub fn evaluate(&mut self, node: &ASTNode) -> Result<f64, EvalError> {
        match node {
            ASTNode::Number { value, .. } => Ok(*value),

            ASTNode::Variable(variable) => self.variable(&variable.name).ok_or_else(|| {
                EvalError::new(
                    variable.token.as_ref(),
                    EvalErrorKind::UndefinedVariable(variable.name.clone()),
                )
            }),

            ASTNode::Assign { target, value, .. } => {
                let value = self.evaluate(value)?;
                trace!("Assigning {} = {}", target.name, value);
                self.set_variable(&target.name, value);
                Ok(value)
            }

            ASTNode::Unary {
                operator,
                operand,
                token,
            } => {
                let value = self.evaluate(operand)?;
                match operator {
                    Operator::Add => Ok(value),
                    Operator::Subtract => Ok(-value),
                    other => Err(EvalError::new(
                        token.as_ref(),
                        EvalErrorKind::UnsupportedUnaryOperator(*other),
                    )),
                }
            }

            ASTNode::Binary {
                left,
                operator,
                right,
                token,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                operator.apply(left, right).ok_or_else(|| {
                    EvalError::new(
                        token.as_ref(),
                        EvalErrorKind::UnimplementedOperator(*operator),
                    )
                })
            }

            ASTNode::FunctionCall { name, args, token } => {
                let function = self.function(name).cloned().ok_or_else(|| {
                    EvalError::new(
                        token.as_ref(),
                        EvalErrorKind::UndefinedFunction(name.clone()),
                    )
                })?;
                function
                    .check_arity(name, args.len())
                    .map_err(|err| EvalError::new(token.as_ref(), err))?;

                let values = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<Result<Vec<_>, _>>()?;

                function.call(&values).map_err(|message| {
                    EvalError::new(
                        token.as_ref(),
                        EvalErrorKind::FunctionFailed {
                            name: name.clone(),
                            message,
                        },
                    )
                })
            }
        }
    }
}

fn sorted<V>(map: HashMap<String, V>) -> Vec<(String, V)> {
    let mut entries: Vec<_> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Variable;
    use crate::lexer::{Token, TokenType};

    fn vars(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    fn unary_fn(f: fn(f64) -> f64) -> FunctionHandler {
        FunctionHandler::new("", &["x"], 1, 1, move |args| Ok(f(args[0])))
    }

    fn num(value: f64) -> ASTNode {
        ASTNode::number(value, None)
    }

    fn var(name: &str) -> ASTNode {
        ASTNode::variable(name, None)
    }

    fn call(name: &str, args: Vec<ASTNode>) -> ASTNode {
        ASTNode::function_call(name, args, None)
    }

    fn token(token_type: TokenType, start: usize) -> Token {
        Token::new(token_type, 0.0, "", start, start + 1)
    }

    #[test]
    fn test_binary_operators() {
        let mut evaluator = Evaluator::default();
        let cases = vec![
            (Operator::Add, 3.87, 2.89, 3.87 + 2.89),
            (Operator::Subtract, 3.87, 2.89, 3.87 - 2.89),
            (Operator::Multiply, 3.87, 2.89, 3.87 * 2.89),
            (Operator::Divide, 3.87, 2.89, 3.87 / 2.89),
            (Operator::Exponent, 3.75, 3.0, 52.734375),
            (Operator::FloorDiv, 38.7, 2.89, 13.0),
            (Operator::Modulo, 39.0, 2.5, 1.5),
            (Operator::Modulo, -10.0, 3.0, -1.0),
            (Operator::FloorDiv, -10.0, 3.0, -4.0),
        ];

        for (operator, left, right, expected) in cases {
            let node = ASTNode::binary(operator, num(left), num(right), None);
            assert_eq!(evaluator.evaluate(&node), Ok(expected), "{}", operator);
        }
    }

    #[test]
    fn test_unary_operators() {
        let mut evaluator = Evaluator::default();
        let node = ASTNode::unary(Operator::Subtract, num(4.5), None);
        assert_eq!(evaluator.evaluate(&node), Ok(-4.5));
        let node = ASTNode::unary(Operator::Add, num(-4.5), None);
        assert_eq!(evaluator.evaluate(&node), Ok(-4.5));

        let node = ASTNode::unary(
            Operator::Multiply,
            num(1.0),
            Some(token(TokenType::Multiplication, 3)),
        );
        let err = evaluator.evaluate(&node).unwrap_err();
        assert_eq!(
            err.kind(),
            &EvalErrorKind::UnsupportedUnaryOperator(Operator::Multiply)
        );
        assert_eq!(err.position(), Some(3));
    }

    #[test]
    fn test_assign_as_binary_is_unimplemented() {
        let mut evaluator = Evaluator::default();
        let node = ASTNode::binary(Operator::Assign, num(1.0), num(2.0), None);
        let err = evaluator.evaluate(&node).unwrap_err();
        assert_eq!(
            err.kind(),
            &EvalErrorKind::UnimplementedOperator(Operator::Assign)
        );
    }

    #[test]
    fn test_division_by_zero_follows_ieee() {
        let mut evaluator = Evaluator::default();
        let node = ASTNode::binary(Operator::Divide, num(-1.0), num(0.0), None);
        assert_eq!(evaluator.evaluate(&node), Ok(f64::NEG_INFINITY));
        let node = ASTNode::binary(Operator::Modulo, num(1.0), num(0.0), None);
        assert!(evaluator.evaluate(&node).unwrap().is_nan());
    }

    #[test]
    fn test_variables_are_case_insensitive() {
        let mut evaluator = Evaluator::new(vars(&[("My_Var", 4.0)]), []).unwrap();
        assert_eq!(evaluator.evaluate(&var("my_var")), Ok(4.0));
        assert_eq!(evaluator.evaluate(&var("MY_VAR")), Ok(4.0));

        let ident = Token::new(TokenType::Identifier, 0.0, "other", 6, 11);
        let err = evaluator
            .evaluate(&ASTNode::variable("other", Some(ident)))
            .unwrap_err();
        assert_eq!(err.to_string(), "undefined variable 'other' at position 6");
    }

    #[test]
    fn test_assignment_updates_environment() {
        let mut evaluator = Evaluator::new(vars(&[("x", 1.0)]), []).unwrap();
        let node = ASTNode::assign(
            Variable::new("X", None),
            ASTNode::binary(Operator::Add, num(5.0), num(3.0), None),
            None,
        );

        assert_eq!(evaluator.evaluate(&node), Ok(8.0));
        assert_eq!(evaluator.variable("x"), Some(8.0));
        assert_eq!(evaluator.list_variables(), vec![("x".to_string(), 8.0)]);

        let node = ASTNode::assign(Variable::new("NewOne", None), num(2.0), None);
        assert_eq!(evaluator.evaluate(&node), Ok(2.0));
        assert_eq!(
            evaluator.list_variables(),
            vec![("newone".to_string(), 2.0), ("x".to_string(), 8.0)]
        );
    }

    #[test]
    fn test_duplicate_variable_names() {
        let variables = vars(&[("my_var", 1.0), ("My_Var", 2.0)]);
        let err = Evaluator::new(variables, []).unwrap_err();
        assert_eq!(
            err,
            EnvironmentError::DuplicateVariable {
                name: "my_var".into(),
                previous: "My_Var".into(),
            }
        );
        assert_eq!(
            err.to_string(),
            "variable with name 'my_var' was defined as 'My_Var' before, variables are case insensitive"
        );
    }

    #[test]
    fn test_duplicate_function_names_across_sets() {
        let first = HashMap::from([("Abs".to_string(), unary_fn(f64::abs))]);
        let second = HashMap::from([("ABS".to_string(), unary_fn(f64::abs))]);

        let err = Evaluator::new(HashMap::new(), [first, second]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "function named 'ABS' was defined as 'Abs' before, function names are case insensitive"
        );
    }

    #[test]
    fn test_function_errors() {
        let functions = HashMap::from([
            ("Sqrt".to_string(), unary_fn(f64::sqrt)),
            (
                "fail".to_string(),
                FunctionHandler::new("", &[], 0, 0, |_| Err("it broke".to_string())),
            ),
            (
                "max".to_string(),
                FunctionHandler::new("", &[], 1, 0, |args| {
                    Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max))
                }),
            ),
        ]);
        let mut evaluator = Evaluator::new(HashMap::new(), [functions]).unwrap();
        let at = |start| Some(token(TokenType::Identifier, start));

        assert_eq!(evaluator.evaluate(&call("SQRT", vec![num(16.0)])), Ok(4.0));
        assert_eq!(
            evaluator.evaluate(&call("max", vec![num(1.0), num(5.0), num(3.0)])),
            Ok(5.0)
        );

        let cases = vec![
            (
                ASTNode::function_call("nope", vec![], at(1)),
                "undefined function 'nope' at position 1",
            ),
            (
                ASTNode::function_call("sqrt", vec![], at(2)),
                "function 'sqrt' require 1 arguments, got 0 at position 2",
            ),
            (
                ASTNode::function_call("MAX", vec![], at(3)),
                "function 'MAX' require at least 1 arguments, got 0 at position 3",
            ),
            (
                ASTNode::function_call("Fail", vec![], at(4)),
                "it broke in function 'Fail' at position 4",
            ),
            (
                ASTNode::function_call("sqrt", vec![var("missing")], at(5)),
                "unexpected error undefined variable 'missing'",
            ),
        ];
        for (node, message) in cases {
            assert_eq!(evaluator.evaluate(&node).unwrap_err().to_string(), message);
        }
    }

    #[test]
    fn test_first_error_aborts() {
        let mut evaluator = Evaluator::default();
        let node = ASTNode::binary(Operator::Add, var("a"), var("b"), None);
        assert_eq!(
            evaluator.evaluate(&node).unwrap_err().kind(),
            &EvalErrorKind::UndefinedVariable("a".into())
        );
    }

    #[test]
    fn test_complex_tree() {
        let functions = HashMap::from([
            (
                "AddTwo".to_string(),
                FunctionHandler::new("", &["x"], 1, 1, |args| Ok(args[0] + 2.0)),
            ),
            ("Abs".to_string(), unary_fn(f64::abs)),
            ("Ceil".to_string(), unary_fn(f64::ceil)),
        ]);
        let variables = vars(&[("X", 13.8), ("Y", 8.9), ("Z", 3.0)]);
        let mut evaluator = Evaluator::new(variables, [functions]).unwrap();

        // -AddTwo(1246.67 % Y) + Abs(5 - X) * Ceil(2.2 ^ Z)
        let remainder = ASTNode::binary(Operator::Modulo, num(1246.67), var("Y"), None);
        let difference = ASTNode::binary(Operator::Subtract, num(5.0), var("X"), None);
        let power = ASTNode::binary(Operator::Exponent, num(2.2), var("Z"), None);
        let tree = ASTNode::binary(
            Operator::Add,
            ASTNode::unary(Operator::Subtract, call("AddTwo", vec![remainder]), None),
            ASTNode::binary(
                Operator::Multiply,
                call("Abs", vec![difference]),
                call("Ceil", vec![power]),
                None,
            ),
            None,
        );

        let result = evaluator.evaluate(&tree).unwrap();
        assert!((result - 94.13).abs() < 1e-9, "got {}", result);
    }

    #[test]
    fn test_list_functions_sorted() {
        let functions = HashMap::from([
            ("Sin".to_string(), unary_fn(f64::sin)),
            ("abs".to_string(), unary_fn(f64::abs)),
            ("Cos".to_string(), unary_fn(f64::cos)),
        ]);
        let evaluator = Evaluator::new(HashMap::new(), [functions]).unwrap();
        let names: Vec<_> = evaluator
            .list_functions()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["abs", "cos", "sin"]);
    }
}
