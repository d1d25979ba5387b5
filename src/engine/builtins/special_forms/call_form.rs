use crate::engine::ast::Expr;
use crate::engine::builtins::special_forms::var_forms::eval_get;
use crate::engine::env::Frame;
use crate::engine::eval::{EvalError, Interpreter};
use crate::engine::ops;
use crate::engine::value::Value;
use std::io::Write;
use tracing::{debug, error, instrument, trace};

/// Calls the function bound to `name` in the caller's frame.
///
/// Arguments are evaluated left to right in the caller's frame before the
/// function is fetched. The body then runs in a new frame that holds nothing but
/// the parameters; that frame is popped again whether or not the body succeeds.
#[instrument(skip(interp, args), fields(argc = args.len()), ret, err)]
pub fn eval_call<W: Write>(
    interp: &mut Interpreter<W>,
    name: &str,
    args: &[Expr],
) -> Result<Value, EvalError> {
    trace!("Executing 'call'");
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(interp.eval(arg)?);
    }

    let function = match eval_get(interp, name)? {
        Value::Function(function) => function,
        other => {
            error!(function_name = %name, found = other.type_name(), "Attempted to call a non-function value");
            return Err(EvalError::TypeError {
                op: ops::CALL,
                expected: "Function",
                found: other.type_name(),
            });
        }
    };

    if values.len() != function.params.len() {
        error!(
            function_name = %name,
            expected = function.params.len(),
            got = values.len(),
            "Arity mismatch for function call"
        );
        return Err(EvalError::ArityError {
            name: name.to_string(),
            expected: function.params.len(),
            found: values.len(),
        });
    }

    let frame: Frame = function.params.iter().cloned().zip(values).collect();
    interp.scopes_mut().push_frame(frame);
    debug!(function_name = %name, body = %function.body, "Evaluating function body");
    let result = interp.eval(&function.body);
    interp.scopes_mut().pop_frame();
    result
}
