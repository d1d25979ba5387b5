use crate::engine::ast::Expr;
use crate::engine::builtins::special_forms::var_forms::bind;
use crate::engine::eval::{EvalError, Interpreter};
use crate::engine::value::{Function, Value};
use std::io::Write;
use tracing::{debug, instrument, trace};

/// Builds a function value. The body is stored as-is and nothing from the
/// current frame is captured.
#[instrument(skip(body), ret)]
pub fn eval_func(params: &[String], body: &Expr) -> Result<Value, EvalError> {
    trace!("Executing 'func'");
    debug!(parameters = ?params, body = %body, "'func' creating function");
    Ok(Value::Function(Function {
        params: params.to_vec(),
        body: Box::new(body.clone()),
    }))
}

/// Builds a function value and binds it to `name` the same way `set` does.
#[instrument(skip(interp, body), ret, err)]
pub fn eval_def<W: Write>(
    interp: &mut Interpreter<W>,
    name: &str,
    params: &[String],
    body: &Expr,
) -> Result<Value, EvalError> {
    trace!("Executing 'def'");
    let function = eval_func(params, body)?;
    bind(interp, name, function.clone());
    Ok(function)
}
