use crate::engine::ast::Expr;
use crate::engine::eval::{EvalError, Interpreter};
use crate::engine::ops;
use crate::engine::value::Value;
use std::io::Write;
use tracing::{error, instrument, trace};

/// Unwraps an integer operand, reporting a type error against `op` otherwise.
pub fn extract_integer(value: &Value, op: &'static str) -> Result<i64, EvalError> {
    value.as_integer().ok_or_else(|| {
        let type_error = EvalError::TypeError {
            op,
            expected: "Integer",
            found: value.type_name(),
        };
        error!(operator = %op, error = %type_error, "Expected an integer operand");
        type_error
    })
}

fn eval_operands<W: Write>(
    interp: &mut Interpreter<W>,
    op: &'static str,
    left: &Expr,
    right: &Expr,
) -> Result<(i64, i64), EvalError> {
    let left = interp.eval(left)?;
    let right = interp.eval(right)?;
    Ok((extract_integer(&left, op)?, extract_integer(&right, op)?))
}

#[instrument(skip_all, ret, err)]
pub fn eval_add<W: Write>(
    interp: &mut Interpreter<W>,
    left: &Expr,
    right: &Expr,
) -> Result<Value, EvalError> {
    trace!("Executing 'add'");
    let (a, b) = eval_operands(interp, ops::ADD, left, right)?;
    a.checked_add(b).map(Value::Integer).ok_or_else(|| {
        error!(a, b, "Integer overflow in 'add'");
        EvalError::Overflow { op: ops::ADD }
    })
}

#[instrument(skip_all, ret, err)]
pub fn eval_mul<W: Write>(
    interp: &mut Interpreter<W>,
    left: &Expr,
    right: &Expr,
) -> Result<Value, EvalError> {
    trace!("Executing 'mul'");
    let (a, b) = eval_operands(interp, ops::MUL, left, right)?;
    a.checked_mul(b).map(Value::Integer).ok_or_else(|| {
        error!(a, b, "Integer overflow in 'mul'");
        EvalError::Overflow { op: ops::MUL }
    })
}

#[cfg(test)]
mod tests {
    use crate::engine::ast::*;
    use crate::engine::eval::EvalError;
    use crate::engine::eval::test_support::run;
    use crate::engine::value::Value;
    use crate::logging::init_test_logging;

    #[test]
    fn add_integers() {
        init_test_logging();
        for (a, b) in [(0, 0), (1, 2), (-7, 3), (i64::MAX, 0), (-40, -2)] {
            assert_eq!(run(&add(int(a), int(b))).0, Ok(Value::Integer(a + b)));
        }
    }

    #[test]
    fn mul_integers() {
        init_test_logging();
        for (a, b) in [(0, 9), (2, 3), (-7, 3), (-4, -4), (1, i64::MIN)] {
            assert_eq!(run(&mul(int(a), int(b))).0, Ok(Value::Integer(a * b)));
        }
    }

    #[test]
    fn nested_arithmetic() {
        init_test_logging();
        // 1 + (2 * 3)
        assert_eq!(
            run(&add(int(1), mul(int(2), int(3)))).0,
            Ok(Value::Integer(7))
        );
    }

    #[test]
    fn add_rejects_non_integer_operand() {
        init_test_logging();
        assert_eq!(
            run(&add(int(1), array(2))).0,
            Err(EvalError::TypeError {
                op: "add",
                expected: "Integer",
                found: "Array",
            })
        );
    }

    #[test]
    fn mul_rejects_null_operand() {
        init_test_logging();
        // `print` yields Null.
        assert_eq!(
            run(&mul(print(vec![]), int(2))).0,
            Err(EvalError::TypeError {
                op: "mul",
                expected: "Integer",
                found: "Null",
            })
        );
    }

    #[test]
    fn both_operands_evaluated_before_type_check() {
        init_test_logging();
        let program = add(func(&[], int(1)), print(vec![int(5)]));
        let (result, output) = run(&program);
        assert!(matches!(result, Err(EvalError::TypeError { found: "Function", .. })));
        assert_eq!(output, "[5]\n");
    }

    #[test]
    fn overflow_is_checked() {
        init_test_logging();
        assert_eq!(
            run(&add(int(i64::MAX), int(1))).0,
            Err(EvalError::Overflow { op: "add" })
        );
        assert_eq!(
            run(&mul(int(i64::MIN), int(-1))).0,
            Err(EvalError::Overflow { op: "mul" })
        );
    }
}
