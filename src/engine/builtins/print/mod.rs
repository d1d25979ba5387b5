use crate::engine::ast::Expr;
use crate::engine::eval::{EvalError, Interpreter};
use crate::engine::value::Value;
use std::io::Write;
use tracing::{debug, instrument, trace};

/// Renders one `print` line: the evaluated values as a bracketed, comma separated list.
pub fn format_print_line(values: &[Value]) -> String {
    let rendered: Vec<String> = values.iter().map(|value| value.to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

#[instrument(skip_all, fields(count = args.len()), ret, err)]
pub fn eval_print<W: Write>(
    interp: &mut Interpreter<W>,
    args: &[Expr],
) -> Result<Value, EvalError> {
    trace!("Executing 'print'");
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(interp.eval(arg)?);
    }

    let line = format_print_line(&values);
    debug!(line = %line, "Emitting print line");
    interp.emit(&line)?;
    Ok(Value::Null)
}
