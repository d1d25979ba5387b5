use crate::engine::ast::Expr;
use crate::engine::eval::{EvalError, Interpreter};
use crate::engine::value::Value;
use std::io::Write;
use tracing::{instrument, trace};

/// Evaluates each expression in order and returns the last result, or `Null` when empty.
#[instrument(skip_all, fields(len = exprs.len()), ret, err)]
pub fn eval_seq<W: Write>(interp: &mut Interpreter<W>, exprs: &[Expr]) -> Result<Value, EvalError> {
    trace!("Executing 'seq'");
    let mut result = Value::Null;
    for expr in exprs {
        result = interp.eval(expr)?;
    }
    Ok(result)
}
