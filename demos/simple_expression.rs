use exprcalc_rs::parser::ParserKind;
use exprcalc_rs::{Calculator, CalculatorConfig};
use std::env;

fn main() {
    pretty_env_logger::init();

    let expression = env::args()
        .nth(1)
        .unwrap_or_else(|| "radius = sqrt(2) * 3".to_string());
    let parser = env::args()
        .nth(2)
        .map(|name| name.parse::<ParserKind>().expect("Unknown parser"))
        .unwrap_or(ParserKind::RecursiveDescent);

    let config = CalculatorConfig::default().with_parser(parser);
    let mut calculator = Calculator::new(config).expect("Invalid config");

    match calculator.evaluate(&expression) {
        Ok(result) => println!("{} = {}", expression, result),
        Err(err) => {
            println!("{}", expression);
            if let Some(position) = err.position() {
                println!("{}^", " ".repeat(position));
            }
            println!("Error: {}", err);
        }
    }

    for (name, value) in calculator.evaluator().list_variables() {
        println!("  {} = {}", name, value);
    }
}
