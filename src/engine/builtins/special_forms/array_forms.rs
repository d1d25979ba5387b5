use crate::engine::ast::{Datum, Expr};
use crate::engine::eval::{EvalError, Interpreter};
use crate::engine::ops;
use crate::engine::value::{ArrayRef, Value};
use std::io::Write;
use tracing::{debug, error, instrument, trace};

#[instrument(ret)]
pub fn eval_array(size: usize) -> Result<Value, EvalError> {
    trace!("Executing 'array'");
    Ok(Value::new_array(size))
}

/// Turns quoted data into a new array. Each evaluation allocates a fresh one.
#[instrument(skip_all, fields(len = data.len()), ret)]
pub fn eval_arr(data: &[Datum]) -> Result<Value, EvalError> {
    trace!("Executing 'arr'");
    Ok(Value::from_data(data))
}

#[instrument(skip(interp), ret, err)]
pub fn eval_array_get<W: Write>(
    interp: &mut Interpreter<W>,
    name: &str,
    index: i64,
) -> Result<Value, EvalError> {
    trace!("Executing 'array_get'");
    let array = lookup_array(interp, ops::ARRAY_GET, name)?;
    let slots = array.borrow();
    let slot = checked_slot(name, index, slots.len())?;
    Ok(slots[slot].clone())
}

/// Evaluates `value_expr`, then overwrites the slot in place.
#[instrument(skip(interp, value_expr), ret, err)]
pub fn eval_array_set<W: Write>(
    interp: &mut Interpreter<W>,
    name: &str,
    index: i64,
    value_expr: &Expr,
) -> Result<Value, EvalError> {
    trace!("Executing 'array_set'");
    let value = interp.eval(value_expr)?;
    let array = lookup_array(interp, ops::ARRAY_SET, name)?;
    let mut slots = array.borrow_mut();
    let slot = checked_slot(name, index, slots.len())?;
    debug!(array_name = %name, slot, value = ?value, "Writing array slot");
    slots[slot] = value.clone();
    Ok(value)
}

fn lookup_array<W: Write>(
    interp: &Interpreter<W>,
    op: &'static str,
    name: &str,
) -> Result<ArrayRef, EvalError> {
    match interp.scopes().get(name) {
        Some(Value::Array(array)) => Ok(array),
        Some(other) => {
            error!(array_name = %name, found = other.type_name(), "Value is not an array");
            Err(EvalError::TypeError {
                op,
                expected: "Array",
                found: other.type_name(),
            })
        }
        None => {
            error!(array_name = %name, "Undefined array in top frame");
            Err(EvalError::NameError(name.to_string()))
        }
    }
}

fn checked_slot(name: &str, index: i64, length: usize) -> Result<usize, EvalError> {
    match usize::try_from(index) {
        Ok(slot) if slot < length => Ok(slot),
        _ => {
            error!(array_name = %name, index, length, "Array index out of bounds");
            Err(EvalError::IndexError {
                name: name.to_string(),
                index,
                length,
            })
        }
    }
}
