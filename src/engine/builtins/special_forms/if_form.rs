use crate::engine::ast::Expr;
use crate::engine::builtins::math::extract_integer;
use crate::engine::eval::{EvalError, Interpreter};
use crate::engine::ops;
use crate::engine::value::Value;
use std::io::Write;
use tracing::{debug, instrument, trace};

/// Evaluates the condition, then only the selected branch. Zero is false.
#[instrument(skip_all, ret, err)]
pub fn eval_if<W: Write>(
    interp: &mut Interpreter<W>,
    cond: &Expr,
    then: &Expr,
    otherwise: &Expr,
) -> Result<Value, EvalError> {
    trace!("Executing 'if'");
    let condition = interp.eval(cond)?;
    let truthy = extract_integer(&condition, ops::IF)? != 0;
    debug!(?condition, truthy, "Evaluated 'if' condition");

    if truthy {
        trace!("Condition is nonzero, evaluating then-branch");
        interp.eval(then)
    } else {
        trace!("Condition is zero, evaluating else-branch");
        interp.eval(otherwise)
    }
}
