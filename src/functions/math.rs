use crate::evaluator::FunctionHandler;
use exprcalc_macros::builtin;
use std::collections::HashMap;

/// Returns the absolute value of x.
#[builtin]
fn abs(x: f64) -> Result<f64, String> {
    Ok(x.abs())
}

/// Returns the arccosine, in radians, of x.
#[builtin]
fn acos(x: f64) -> Result<f64, String> {
    Ok(x.acos())
}

/// Returns the arcsine, in radians, of x.
#[builtin]
fn asin(x: f64) -> Result<f64, String> {
    Ok(x.asin())
}

/// Returns the arctangent, in radians, of x.
#[builtin]
fn atan(x: f64) -> Result<f64, String> {
    Ok(x.atan())
}

/// Returns the least integer value greater than or equal to x.
#[builtin]
fn ceil(x: f64) -> Result<f64, String> {
    Ok(x.ceil())
}

/// Returns the cosine of the radian argument x.
#[builtin]
fn cos(x: f64) -> Result<f64, String> {
    Ok(x.cos())
}

/// Returns the greatest integer value less than or equal to x.
#[builtin]
fn floor(x: f64) -> Result<f64, String> {
    Ok(x.floor())
}

/// Returns the sine of the radian argument x.
#[builtin]
fn sin(x: f64) -> Result<f64, String> {
    Ok(x.sin())
}

/// Returns the square root of x.
#[builtin]
fn sqrt(x: f64) -> Result<f64, String> {
    Ok(x.sqrt())
}

/// Returns the tangent of the radian argument x.
#[builtin]
fn tan(x: f64) -> Result<f64, String> {
    Ok(x.tan())
}

/// Returns Pi value.
#[builtin]
fn pi() -> Result<f64, String> {
    Ok(std::f64::consts::PI)
}

/// Returns e value (base of natural logarithm).
#[builtin]
fn e() -> Result<f64, String> {
    Ok(std::f64::consts::E)
}

/// Returns Phi value.
#[builtin]
fn phi() -> Result<f64, String> {
    Ok((1.0 + 5f64.sqrt()) / 2.0)
}

/// Returns log of value n with given base.
#[builtin]
fn log(n: f64, base: f64) -> Result<f64, String> {
    Ok(n.ln() / base.ln())
}

/// Returns n-th root of a.
#[builtin]
fn nth_root(a: f64, n: f64) -> Result<f64, String> {
    if a < 0.0 {
        return Err("number a cannot be negative".to_string());
    }
    if n <= 0.0 {
        return Err("number n cannot be 0 or negative".to_string());
    }
    Ok(a.powf(1.0 / n))
}

/// Fixed-arity math functions, keyed by name.
pub fn math_functions() -> HashMap<String, FunctionHandler> {
    [
        ("abs", abs_handler()),
        ("acos", acos_handler()),
        ("asin", asin_handler()),
        ("atan", atan_handler()),
        ("ceil", ceil_handler()),
        ("cos", cos_handler()),
        ("floor", floor_handler()),
        ("sin", sin_handler()),
        ("sqrt", sqrt_handler()),
        ("tan", tan_handler()),
        ("pi", pi_handler()),
        ("e", e_handler()),
        ("phi", phi_handler()),
        ("log", log_handler()),
        ("nth_root", nth_root_handler()),
    ]
    .into_iter()
    .map(|(name, handler)| (name.to_string(), handler))
    .collect()
}
