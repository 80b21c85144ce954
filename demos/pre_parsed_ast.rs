use exprcalc_macros::builtin;
use exprcalc_rs::evaluator::FunctionHandler;
use exprcalc_rs::parser::ParserKind;
use exprcalc_rs::{Calculator, CalculatorConfig};
use log::debug;
use std::collections::HashMap;

/// Returns the hypotenuse of a right triangle with legs a and b.
#[builtin]
fn hypot(a: f64, b: f64) -> Result<f64, String> {
    Ok(a.hypot(b))
}

fn main() {
    pretty_env_logger::init();

    let config = CalculatorConfig::default()
        .with_parser(ParserKind::RecursiveDescent)
        .with_functions(HashMap::from([("Hypot".to_string(), hypot_handler())]))
        .with_variable("step", 0.0);
    let mut calculator = Calculator::new(config).expect("Invalid config");

    let ast = calculator
        .parse("step = step + hypot(3, 4)")
        .expect("Failed to parse");
    debug!("ast: {ast:?}");

    for _ in 0..3 {
        match calculator.evaluate_ast(&ast) {
            Ok(result) => println!("Result: {}", result),
            Err(err) => println!("Error: {}", err),
        }
    }

    for (name, function) in calculator.evaluator().list_functions() {
        if name == "hypot" {
            println!(
                "{}({}): {}",
                name,
                function.arg_names().join(", "),
                function.description()
            );
        }
    }
}
