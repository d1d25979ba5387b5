use crate::engine::ast::Expr;
use crate::engine::eval::{EvalError, Interpreter};
use crate::engine::value::Value;
use std::io::Write;
use tracing::{debug, error, instrument, trace};

/// Looks `name` up in the top frame.
#[instrument(skip(interp), ret, err)]
pub fn eval_get<W: Write>(interp: &mut Interpreter<W>, name: &str) -> Result<Value, EvalError> {
    trace!("Executing 'get'");
    interp.scopes().get(name).ok_or_else(|| {
        error!(variable_name = %name, "Undefined variable in top frame");
        EvalError::NameError(name.to_string())
    })
}

/// Evaluates `value_expr` and binds the result to `name` in the top frame.
#[instrument(skip(interp, value_expr), ret, err)]
pub fn eval_set<W: Write>(
    interp: &mut Interpreter<W>,
    name: &str,
    value_expr: &Expr,
) -> Result<Value, EvalError> {
    trace!("Executing 'set'");
    let value = interp.eval(value_expr)?;
    bind(interp, name, value.clone());
    Ok(value)
}

/// Stores an already evaluated value in the top frame. `def` shares this path.
pub(crate) fn bind<W: Write>(interp: &mut Interpreter<W>, name: &str, value: Value) {
    debug!(variable_name = %name, value = ?value, "Binding variable in top frame");
    interp.scopes_mut().define(name.to_string(), value);
}
