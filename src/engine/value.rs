use crate::engine::ast::{Datum, Expr};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

type Slots = RefCell<Vec<Value>>;

/// A handle to array storage. Arrays are shared by identity: every handle
/// cloned from the same array observes writes made through any of them.
///
/// Arrays may contain themselves, directly or through other arrays, so
/// rendering, comparison and teardown all walk the slots with an explicit
/// worklist instead of recursing.
#[derive(Clone)]
pub struct ArrayRef(Rc<Slots>);

impl ArrayRef {
    pub fn new(slots: Vec<Value>) -> Self {
        ArrayRef(Rc::new(RefCell::new(slots)))
    }

    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Vec<Value>> {
        self.0.borrow_mut()
    }

    /// Whether both handles point at the same storage.
    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> *const Slots {
        Rc::as_ptr(&self.0)
    }

    // Empties the slots and hands back the nested arrays that were in them.
    fn take_nested(&self) -> Vec<ArrayRef> {
        let Ok(mut slots) = self.0.try_borrow_mut() else {
            return Vec::new();
        };
        std::mem::take(&mut *slots)
            .into_iter()
            .filter_map(|slot| match slot {
                Value::Array(array) => Some(array),
                _ => None,
            })
            .collect()
    }
}

impl Drop for ArrayRef {
    fn drop(&mut self) {
        if Rc::strong_count(&self.0) != 1 {
            return;
        }
        // Last handle: unlink nested arrays here so a long chain is freed one
        // level at a time rather than by recursive drops.
        let mut pending = self.take_nested();
        while let Some(array) = pending.pop() {
            if Rc::strong_count(&array.0) == 1 {
                pending.extend(array.take_nested());
            }
        }
    }
}

// Structural equality. Pairs already under comparison count as equal, which
// keeps cyclic arrays from looping.
impl PartialEq for ArrayRef {
    fn eq(&self, other: &ArrayRef) -> bool {
        let mut seen = HashSet::new();
        let mut pending = vec![(self.clone(), other.clone())];
        while let Some((left, right)) = pending.pop() {
            if left.ptr_eq(&right) || !seen.insert((left.addr(), right.addr())) {
                continue;
            }
            let (left_slots, right_slots) = (left.borrow(), right.borrow());
            if left_slots.len() != right_slots.len() {
                return false;
            }
            for pair in left_slots.iter().zip(right_slots.iter()) {
                match pair {
                    (Value::Array(a), Value::Array(b)) => pending.push((a.clone(), b.clone())),
                    (Value::Array(_), _) | (_, Value::Array(_)) => return false,
                    (a, b) if a != b => return false,
                    _ => {}
                }
            }
        }
        true
    }
}

enum Step {
    Close,
    Enter(ArrayRef),
    Scalar(String),
}

impl ArrayRef {
    /// Writes `[arr, ...slots]`. An array met again while it is still being
    /// written is shown as `[arr, ...]`.
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[arr")?;
        let mut path: Vec<(ArrayRef, usize)> = vec![(self.clone(), 0)];
        while let Some((array, next)) = path.last_mut() {
            let step = match array.borrow().get(*next) {
                None => Step::Close,
                Some(Value::Array(child)) => Step::Enter(child.clone()),
                Some(scalar) => Step::Scalar(scalar.to_string()),
            };
            *next += 1;

            match step {
                Step::Close => {
                    write!(f, "]")?;
                    path.pop();
                }
                Step::Scalar(text) => write!(f, ", {}", text)?,
                Step::Enter(child) => {
                    if path.iter().any(|(open, _)| open.ptr_eq(&child)) {
                        write!(f, ", [arr, ...]")?;
                    } else {
                        write!(f, ", [arr")?;
                        path.push((child, 0));
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub params: Vec<String>,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Array(ArrayRef),
    Function(Function),
    Null,
}

impl Value {
    /// Allocates a new array of `size` empty slots.
    pub fn new_array(size: usize) -> Value {
        Value::Array(ArrayRef::new(vec![Value::Null; size]))
    }

    /// Builds a fresh array from quoted data. Nested data becomes nested arrays.
    pub fn from_data(data: &[Datum]) -> Value {
        let slots = data
            .iter()
            .map(|datum| match datum {
                Datum::Integer(n) => Value::Integer(*n),
                Datum::Null => Value::Null,
                Datum::Array(items) => Value::from_data(items),
            })
            .collect();
        Value::Array(ArrayRef::new(slots))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Array(_) => "Array",
            Value::Function(_) => "Function",
            Value::Null => "Null",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<func({})>", self.params.join(", "))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Null => write!(f, "null"),
            Value::Function(func) => write!(f, "{}", func),
            Value::Array(array) => array.render(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ast::{add, get};

    fn array_of(value: &Value) -> &ArrayRef {
        match value {
            Value::Array(array) => array,
            other => panic!("Expected Array, got {:?}", other),
        }
    }

    // A one-slot array nested `depth` levels deep.
    fn nested_chain(depth: usize) -> Value {
        let mut chain = Value::new_array(1);
        for _ in 0..depth {
            let outer = Value::new_array(1);
            array_of(&outer).borrow_mut()[0] = chain;
            chain = outer;
        }
        chain
    }

    #[test]
    fn new_array_is_all_null() {
        let value = Value::new_array(3);
        assert_eq!(
            *array_of(&value).borrow(),
            vec![Value::Null, Value::Null, Value::Null]
        );
    }

    #[test]
    fn display_values() {
        assert_eq!(Value::Integer(-4).to_string(), "-4");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::new_array(2).to_string(), "[arr, null, null]");
        assert_eq!(Value::new_array(0).to_string(), "[arr]");

        let func = Value::Function(Function {
            params: vec!["a".to_string(), "b".to_string()],
            body: Box::new(add(get("a"), get("b"))),
        });
        assert_eq!(func.to_string(), "<func(a, b)>");
    }

    #[test]
    fn from_data_nests_arrays() {
        let value = Value::from_data(&[
            Datum::Integer(1),
            Datum::Array(vec![Datum::Integer(2), Datum::Null]),
        ]);
        assert_eq!(value.to_string(), "[arr, 1, [arr, 2, null]]");
        assert_eq!(format!("{:?}", value), "Array([arr, 1, [arr, 2, null]])");
    }

    #[test]
    fn cloned_array_shares_slots() {
        let first = Value::new_array(1);
        let second = first.clone();
        array_of(&first).borrow_mut()[0] = Value::Integer(9);
        assert_eq!(second.to_string(), "[arr, 9]");
    }

    #[test]
    fn self_containing_array_renders_marker() {
        let value = Value::new_array(2);
        array_of(&value).borrow_mut()[0] = value.clone();
        array_of(&value).borrow_mut()[1] = Value::Integer(3);
        assert_eq!(value.to_string(), "[arr, [arr, ...], 3]");
        assert_eq!(format!("{:?}", value), "Array([arr, [arr, ...], 3])");
        assert_eq!(value, value.clone());

        // Break the cycle so the test does not leak.
        array_of(&value).borrow_mut()[0] = Value::Null;
    }

    #[test]
    fn indirect_cycle_renders_marker() {
        let outer = Value::new_array(1);
        let inner = Value::new_array(1);
        array_of(&outer).borrow_mut()[0] = inner.clone();
        array_of(&inner).borrow_mut()[0] = outer.clone();
        assert_eq!(outer.to_string(), "[arr, [arr, [arr, ...]]]");
        assert_eq!(inner.to_string(), "[arr, [arr, [arr, ...]]]");

        array_of(&inner).borrow_mut()[0] = Value::Null;
    }

    #[test]
    fn shared_but_acyclic_array_renders_in_full() {
        let shared = Value::from_data(&[Datum::Integer(1)]);
        let holder = Value::new_array(2);
        array_of(&holder).borrow_mut()[0] = shared.clone();
        array_of(&holder).borrow_mut()[1] = shared;
        assert_eq!(holder.to_string(), "[arr, [arr, 1], [arr, 1]]");
    }

    #[test]
    fn equality_is_structural() {
        let left = Value::from_data(&[Datum::Integer(1), Datum::Array(vec![Datum::Null])]);
        let right = Value::from_data(&[Datum::Integer(1), Datum::Array(vec![Datum::Null])]);
        let other = Value::from_data(&[Datum::Integer(1), Datum::Array(vec![])]);
        assert_eq!(left, right);
        assert_ne!(left, other);
        assert_ne!(left, Value::Null);
    }

    #[test]
    fn deep_chain_renders_and_drops() {
        let depth = 200_000;
        let chain = nested_chain(depth);
        let rendered = chain.to_string();
        assert!(rendered.starts_with("[arr, [arr, [arr"));
        assert!(rendered.ends_with("[arr, null]]]"));
        assert_eq!(rendered.matches("[arr").count(), depth + 1);
        assert_eq!(chain, nested_chain(depth));
        assert_ne!(chain, nested_chain(depth - 1));
        drop(chain);
    }

    #[test]
    fn dropping_outer_array_keeps_shared_inner_alive() {
        let inner = Value::from_data(&[Datum::Integer(5)]);
        let outer = Value::new_array(1);
        array_of(&outer).borrow_mut()[0] = inner.clone();
        drop(outer);
        assert_eq!(inner.to_string(), "[arr, 5]");
    }

    #[test]
    fn as_integer_only_accepts_integers() {
        assert_eq!(Value::Integer(7).as_integer(), Some(7));
        assert_eq!(Value::Null.as_integer(), None);
        assert_eq!(Value::new_array(1).as_integer(), None);
    }
}
