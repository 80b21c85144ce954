pub mod math;
pub mod variadic;

use crate::evaluator::FunctionHandler;
use std::collections::HashMap;

pub use math::math_functions;
pub use variadic::variadic_functions;

/// Every built-in function set, ready to pass to `Evaluator::new`.
pub fn builtin_functions() -> Vec<HashMap<String, FunctionHandler>> {
    vec![math_functions(), variadic_functions()]
}
