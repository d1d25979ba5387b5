use crate::engine::ast::Expr;
use crate::engine::eval::{EvalError, Interpreter};
use crate::engine::value::Value;
use std::io::Write;
use tracing::{instrument, trace};

/// Evaluates `body` `count` times, returning the final iteration's value (`Null` for zero).
#[instrument(skip(interp, body), ret, err)]
pub fn eval_repeat<W: Write>(
    interp: &mut Interpreter<W>,
    count: usize,
    body: &Expr,
) -> Result<Value, EvalError> {
    trace!("Executing 'repeat'");
    let mut result = Value::Null;
    for iteration in 0..count {
        trace!(iteration, "Evaluating 'repeat' body");
        result = interp.eval(body)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use crate::engine::ast::*;
    use crate::engine::env::Frame;
    use crate::engine::eval::test_support::{run, run_with};
    use crate::engine::eval::EvalError;
    use crate::engine::value::Value;
    use crate::logging::init_test_logging;

    #[test]
    fn repeat_counts_exactly() {
        init_test_logging();
        let globals = Frame::from([("a".to_string(), Value::Integer(0))]);
        let program = seq(vec![
            repeat(4, set("a", add(get("a"), int(1)))),
            get("a"),
        ]);
        assert_eq!(run_with(globals, &program).0, Ok(Value::Integer(4)));
    }

    #[test]
    fn repeat_returns_last_iteration() {
        init_test_logging();
        let program = seq(vec![
            set("a", int(1)),
            repeat(3, set("a", mul(get("a"), int(10)))),
        ]);
        assert_eq!(run(&program).0, Ok(Value::Integer(1000)));
    }

    #[test]
    fn repeat_zero_is_null_and_skips_body() {
        init_test_logging();
        let (result, output) = run(&repeat(0, print(vec![int(1)])));
        assert_eq!(result, Ok(Value::Null));
        assert_eq!(output, "");
    }

    #[test]
    fn repeat_aborts_on_error() {
        init_test_logging();
        let program = repeat(
            5,
            seq(vec![print(vec![int(0)]), get("missing")]),
        );
        let (result, output) = run(&program);
        assert_eq!(result, Err(EvalError::NameError("missing".to_string())));
        assert_eq!(output, "[0]\n");
    }

    #[test]
    fn fills_array_with_doubles() {
        init_test_logging();
        let program = seq(vec![
            def("double", &["num"], add(get("num"), get("num"))),
            set("a", array(3)),
            set("counter", int(0)),
            repeat(
                3,
                seq(vec![
                    array_set("a", 0, call("double", vec![get("counter")])),
                    set("counter", add(get("counter"), int(1))),
                ]),
            ),
            print(vec![get("a"), get("counter")]),
        ]);
        let (result, output) = run(&program);
        assert_eq!(result, Ok(Value::Null));
        assert_eq!(output, "[[arr, 4, null, null], 3]\n");
    }
}
