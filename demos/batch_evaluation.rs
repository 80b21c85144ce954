use exprcalc_rs::evaluate_expression;
use std::collections::HashMap;

fn context(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

fn main() {
    pretty_env_logger::init();

    let contexts = vec![
        context(&[("price", 120.0), ("volume", 3000.0)]),
        context(&[("price", 80.0), ("volume", 6000.0)]),
        context(&[("Price", 95.5)]),
    ];

    let expression = "max(price - 100, 0) * volume // 1000";

    for (i, context) in contexts.iter().enumerate() {
        match evaluate_expression(expression, context) {
            Ok(result) => println!("Result {}: {}", i, result),
            Err(err) => println!("Result {}: error: {}", i, err),
        }
    }
}
