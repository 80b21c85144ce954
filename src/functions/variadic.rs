use crate::evaluator::FunctionHandler;
use rand::Rng;
use std::collections::HashMap;

fn max() -> FunctionHandler {
    FunctionHandler::new(
        "Returns maximum of provided numbers.",
        &["a", "..."],
        1,
        0,
        |args| {
            args.iter()
                .copied()
                .reduce(f64::max)
                .ok_or_else(|| "no arguments".to_string())
        },
    )
}

fn min() -> FunctionHandler {
    FunctionHandler::new(
        "Returns minimum of provided numbers.",
        &["a", "..."],
        1,
        0,
        |args| {
            args.iter()
                .copied()
                .reduce(f64::min)
                .ok_or_else(|| "no arguments".to_string())
        },
    )
}

fn rand_i() -> FunctionHandler {
    FunctionHandler::new(
        "Returns random decimal number in range <0, a) or <a, b) if b is provided.",
        &["a", "b"],
        1,
        2,
        |args| {
            let (low, high) = match *args {
                [high] => (0.0, high),
                [low, high] => (low, high),
                _ => {
                    let message = format!("Expected 1 or 2 arguments, but got {}", args.len());
                    return Err(message);
                }
            };
            if low >= high {
                return Err(format!(
                    "number {} (min) cannot be higher or equal to {} (max)",
                    low, high
                ));
            }
            Ok(rand::rng().random_range(low..high))
        },
    )
}

/// Functions taking a variable number of arguments, keyed by name.
pub fn variadic_functions() -> HashMap<String, FunctionHandler> {
    HashMap::from([
        ("max".to_string(), max()),
        ("min".to_string(), min()),
        ("rand_i".to_string(), rand_i()),
    ])
}
