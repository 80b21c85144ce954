use super::ArityMismatch;
use std::fmt;
use std::sync::Arc;

pub type Handler = Arc<dyn Fn(&[f64]) -> Result<f64, String> + Send + Sync>;

/// A callable registered with the evaluator along with its arity contract.
///
/// `max_args == 0` means there is no upper bound, unless `min_args` is also
/// `0`, in which case the function takes no arguments at all.
#[derive(Clone)]
pub struct FunctionHandler {
    description: String,
    arg_names: Vec<String>,
    min_args: usize,
    max_args: usize,
    handler: Handler,
}

impl FunctionHandler {
    pub fn new<F>(
        description: impl Into<String>,
        arg_names: &[&str],
        min_args: usize,
        max_args: usize,
        handler: F,
    ) -> Self
    where
        F: Fn(&[f64]) -> Result<f64, String> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            arg_names: arg_names.iter().map(|name| name.to_string()).collect(),
            min_args,
            max_args,
            handler: Arc::new(handler),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn arg_names(&self) -> &[String] {
        &self.arg_names
    }

    pub fn min_args(&self) -> usize {
        self.min_args
    }

    pub fn max_args(&self) -> usize {
        self.max_args
    }

    /// Validates an argument count against the declared bounds.
    pub fn check_arity(&self, name: &str, count: usize) -> Result<(), ArityMismatch> {
        let (min, max) = (self.min_args, self.max_args);

        if min == max && count != min {
            Err(ArityMismatch::Exact {
                name: name.to_string(),
                expected: min,
                got: count,
            })
        } else if count < min && max == 0 {
            Err(ArityMismatch::TooFew {
                name: name.to_string(),
                min,
                got: count,
            })
        } else if count < min || (max > 0 && count > max) {
            Err(ArityMismatch::OutOfRange {
                name: name.to_string(),
                min,
                max,
                got: count,
            })
        } else {
            Ok(())
        }
    }

    pub fn call(&self, args: &[f64]) -> Result<f64, String> {
        (self.handler)(args)
    }
}

impl fmt::Debug for FunctionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionHandler")
            .field("description", &self.description)
            .field("arg_names", &self.arg_names)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish_non_exhaustive()
    }
}
