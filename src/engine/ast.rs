//! The program tree. Every operation is its own variant, so positions that are
//! taken literally (names, counts, indices, parameter lists) are plain fields and
//! only the positions an operation evaluates hold nested `Expr`s.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integers evaluate to themselves.
    Integer(i64),
    Add(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Get {
        name: String,
    },
    Set {
        name: String,
        value: Box<Expr>,
    },
    Seq(Vec<Expr>),
    Repeat {
        count: usize,
        body: Box<Expr>,
    },
    Print(Vec<Expr>),
    /// Allocates `size` empty slots.
    Array {
        size: usize,
    },
    /// Quoted array data, copied into a fresh array each time it is evaluated.
    Arr(Vec<Datum>),
    ArrayGet {
        name: String,
        index: i64,
    },
    ArraySet {
        name: String,
        index: i64,
        value: Box<Expr>,
    },
    If {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Def {
        name: String,
        params: Vec<String>,
        body: Box<Expr>,
    },
    Func {
        params: Vec<String>,
        body: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

/// A literal slot inside an `arr` form.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Integer(i64),
    Null,
    Array(Vec<Datum>),
}

impl Expr {
    /// The operation name this node is written with in the list encoding.
    pub fn op_name(&self) -> &'static str {
        use crate::engine::ops;
        match self {
            Expr::Integer(_) => "integer",
            Expr::Add(..) => ops::ADD,
            Expr::Mul(..) => ops::MUL,
            Expr::Get { .. } => ops::GET,
            Expr::Set { .. } => ops::SET,
            Expr::Seq(_) => ops::SEQ,
            Expr::Repeat { .. } => ops::REPEAT,
            Expr::Print(_) => ops::PRINT,
            Expr::Array { .. } => ops::ARRAY,
            Expr::Arr(_) => ops::ARR,
            Expr::ArrayGet { .. } => ops::ARRAY_GET,
            Expr::ArraySet { .. } => ops::ARRAY_SET,
            Expr::If { .. } => ops::IF,
            Expr::Def { .. } => ops::DEF,
            Expr::Func { .. } => ops::FUNC,
            Expr::Call { .. } => ops::CALL,
        }
    }
}

// Renders the node back into its list encoding, e.g. `["add", 1, ["get", "x"]]`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, head: &str, rest: &[&dyn fmt::Display]) -> fmt::Result {
            write!(f, "[\"{}\"", head)?;
            for item in rest {
                write!(f, ", {}", item)?;
            }
            write!(f, "]")
        }
        // JSON string escaping, so the output loads back unchanged.
        fn quoted(s: &str) -> String {
            serde_json::Value::from(s).to_string()
        }
        fn names(params: &[String]) -> String {
            let quoted: Vec<String> = params.iter().map(|p| quoted(p)).collect();
            format!("[{}]", quoted.join(", "))
        }

        let op = self.op_name();
        match self {
            Expr::Integer(n) => write!(f, "{}", n),
            Expr::Add(l, r) | Expr::Mul(l, r) => list(f, op, &[l, r]),
            Expr::Get { name } => list(f, op, &[&quoted(name)]),
            Expr::Set { name, value } => list(f, op, &[&quoted(name), value]),
            Expr::Seq(exprs) | Expr::Print(exprs) => {
                let items: Vec<&dyn fmt::Display> =
                    exprs.iter().map(|e| e as &dyn fmt::Display).collect();
                list(f, op, &items)
            }
            Expr::Repeat { count, body } => list(f, op, &[count, body]),
            Expr::Array { size } => list(f, op, &[size]),
            Expr::Arr(data) => {
                let items: Vec<&dyn fmt::Display> =
                    data.iter().map(|d| d as &dyn fmt::Display).collect();
                list(f, op, &items)
            }
            Expr::ArrayGet { name, index } => list(f, op, &[&quoted(name), index]),
            Expr::ArraySet { name, index, value } => {
                list(f, op, &[&quoted(name), index, value])
            }
            Expr::If {
                cond,
                then,
                otherwise,
            } => list(f, op, &[cond, then, otherwise]),
            Expr::Def { name, params, body } => {
                list(f, op, &[&quoted(name), &names(params), body])
            }
            Expr::Func { params, body } => list(f, op, &[&names(params), body]),
            Expr::Call { name, args } => {
                let quoted_name = quoted(name);
                let mut items: Vec<&dyn fmt::Display> = vec![&quoted_name as &dyn fmt::Display];
                items.extend(args.iter().map(|e| e as &dyn fmt::Display));
                list(f, op, &items)
            }
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Integer(n) => write!(f, "{}", n),
            Datum::Null => write!(f, "null"),
            Datum::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

// Shorthand constructors, mostly for building programs in tests.
pub fn int(n: i64) -> Expr {
    Expr::Integer(n)
}

pub fn add(left: Expr, right: Expr) -> Expr {
    Expr::Add(Box::new(left), Box::new(right))
}

pub fn mul(left: Expr, right: Expr) -> Expr {
    Expr::Mul(Box::new(left), Box::new(right))
}

pub fn get(name: &str) -> Expr {
    Expr::Get {
        name: name.to_string(),
    }
}

pub fn set(name: &str, value: Expr) -> Expr {
    Expr::Set {
        name: name.to_string(),
        value: Box::new(value),
    }
}

pub fn seq(exprs: Vec<Expr>) -> Expr {
    Expr::Seq(exprs)
}

pub fn repeat(count: usize, body: Expr) -> Expr {
    Expr::Repeat {
        count,
        body: Box::new(body),
    }
}

pub fn print(exprs: Vec<Expr>) -> Expr {
    Expr::Print(exprs)
}

pub fn array(size: usize) -> Expr {
    Expr::Array { size }
}

pub fn arr(data: Vec<Datum>) -> Expr {
    Expr::Arr(data)
}

pub fn array_get(name: &str, index: i64) -> Expr {
    Expr::ArrayGet {
        name: name.to_string(),
        index,
    }
}

pub fn array_set(name: &str, index: i64, value: Expr) -> Expr {
    Expr::ArraySet {
        name: name.to_string(),
        index,
        value: Box::new(value),
    }
}

pub fn if_(cond: Expr, then: Expr, otherwise: Expr) -> Expr {
    Expr::If {
        cond: Box::new(cond),
        then: Box::new(then),
        otherwise: Box::new(otherwise),
    }
}

pub fn def(name: &str, params: &[&str], body: Expr) -> Expr {
    Expr::Def {
        name: name.to_string(),
        params: params.iter().map(|p| p.to_string()).collect(),
        body: Box::new(body),
    }
}

pub fn func(params: &[&str], body: Expr) -> Expr {
    Expr::Func {
        params: params.iter().map(|p| p.to_string()).collect(),
        body: Box::new(body),
    }
}

pub fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        name: name.to_string(),
        args,
    }
}
