//! Load-time validation of list-encoded programs.
//!
//! Programs arrive as nested JSON arrays such as `["add", 1, ["get", "x"]]`.
//! Everything that can be checked without running the program is checked here:
//! operation names, argument counts and the kind of every literal position.

use crate::engine::ast::{Datum, Expr};
use crate::engine::ops;
use serde_json::Value as Json;
use thiserror::Error;
use tracing::{debug, error, instrument, trace};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Invalid JSON: {0}")]
    Json(String),
    #[error("Unknown operation '{name}' at {at}")]
    UnknownOperation { name: String, at: String },
    #[error("Operation '{op}' at {at} expects {expected} arguments, got {found}")]
    Arity {
        op: &'static str,
        expected: String,
        found: usize,
        at: String,
    },
    #[error("Operation '{op}' at {at} expects {expected}, found {found}")]
    InvalidLiteral {
        op: &'static str,
        expected: &'static str,
        found: String,
        at: String,
    },
    #[error("Expected an integer or an operation list at {at}, found {found}")]
    Malformed { found: String, at: String },
}

/// Parses JSON text and validates it into a program.
#[instrument(skip(text), fields(len = text.len()), err)]
pub fn load_program(text: &str) -> Result<Expr, LoadError> {
    trace!("Loading program from JSON text");
    let json: Json = serde_json::from_str(text).map_err(|e| {
        error!(error = %e, "Program is not valid JSON");
        LoadError::Json(e.to_string())
    })?;
    let program = load_json(&json)?;
    debug!(program = %program, "Loaded program");
    Ok(program)
}

/// Validates an already parsed JSON tree into a program.
pub fn load_json(json: &Json) -> Result<Expr, LoadError> {
    load_expr(json, "$")
}

fn load_expr(json: &Json, at: &str) -> Result<Expr, LoadError> {
    match json {
        Json::Number(n) => n.as_i64().map(Expr::Integer).ok_or_else(|| malformed(json, at)),
        Json::Array(items) => {
            let Some((Json::String(head), rest)) = items.split_first() else {
                return Err(malformed(json, at));
            };
            load_operation(head, rest, at)
        }
        _ => Err(malformed(json, at)),
    }
}

fn load_operation(head: &str, args: &[Json], at: &str) -> Result<Expr, LoadError> {
    trace!(op = %head, at = %at, "Loading operation");
    let op = ops::OPERATIONS
        .iter()
        .copied()
        .find(|name| *name == head)
        .ok_or_else(|| {
            error!(op = %head, at = %at, "Unknown operation");
            LoadError::UnknownOperation {
                name: head.to_string(),
                at: at.to_string(),
            }
        })?;
    let args = Args { op, args, at };

    let expr = match op {
        ops::ADD => {
            args.exactly(2)?;
            Expr::Add(Box::new(args.expr(0)?), Box::new(args.expr(1)?))
        }
        ops::MUL => {
            args.exactly(2)?;
            Expr::Mul(Box::new(args.expr(0)?), Box::new(args.expr(1)?))
        }
        ops::GET => {
            args.exactly(1)?;
            Expr::Get { name: args.name(0)? }
        }
        ops::SET => {
            args.exactly(2)?;
            Expr::Set {
                name: args.name(0)?,
                value: Box::new(args.expr(1)?),
            }
        }
        ops::SEQ => Expr::Seq(args.exprs_from(0)?),
        ops::REPEAT => {
            args.exactly(2)?;
            Expr::Repeat {
                count: args.count(0)?,
                body: Box::new(args.expr(1)?),
            }
        }
        ops::PRINT => Expr::Print(args.exprs_from(0)?),
        ops::ARRAY => {
            args.exactly(1)?;
            Expr::Array {
                size: args.count(0)?,
            }
        }
        ops::ARR => Expr::Arr(
            (0..args.len())
                .map(|i| args.datum(&args.args[i], &args.child(i)))
                .collect::<Result<_, _>>()?,
        ),
        ops::ARRAY_GET => {
            args.exactly(2)?;
            Expr::ArrayGet {
                name: args.name(0)?,
                index: args.index(1)?,
            }
        }
        ops::ARRAY_SET => {
            args.exactly(3)?;
            Expr::ArraySet {
                name: args.name(0)?,
                index: args.index(1)?,
                value: Box::new(args.expr(2)?),
            }
        }
        ops::IF => {
            args.exactly(3)?;
            Expr::If {
                cond: Box::new(args.expr(0)?),
                then: Box::new(args.expr(1)?),
                otherwise: Box::new(args.expr(2)?),
            }
        }
        ops::DEF => {
            args.exactly(3)?;
            Expr::Def {
                name: args.name(0)?,
                params: args.params(1)?,
                body: Box::new(args.expr(2)?),
            }
        }
        ops::FUNC => {
            args.exactly(2)?;
            Expr::Func {
                params: args.params(0)?,
                body: Box::new(args.expr(1)?),
            }
        }
        ops::CALL => {
            args.at_least(1)?;
            Expr::Call {
                name: args.name(0)?,
                args: args.exprs_from(1)?,
            }
        }
        // `op` came out of OPERATIONS, which lists exactly the arms above.
        other => unreachable!("operation '{other}' has no loader"),
    };
    Ok(expr)
}

/// The raw arguments of one operation, with the location used in error messages.
struct Args<'a> {
    op: &'static str,
    args: &'a [Json],
    at: &'a str,
}

impl Args<'_> {
    fn len(&self) -> usize {
        self.args.len()
    }

    // Argument `i` sits at list position `i + 1`, after the operation name.
    fn child(&self, i: usize) -> String {
        format!("{}[{}]", self.at, i + 1)
    }

    fn exactly(&self, n: usize) -> Result<(), LoadError> {
        if self.args.len() == n {
            return Ok(());
        }
        Err(self.arity(n.to_string()))
    }

    fn at_least(&self, n: usize) -> Result<(), LoadError> {
        if self.args.len() >= n {
            return Ok(());
        }
        Err(self.arity(format!("at least {}", n)))
    }

    fn arity(&self, expected: String) -> LoadError {
        error!(op = self.op, at = %self.at, expected = %expected, found = self.args.len(), "Wrong argument count");
        LoadError::Arity {
            op: self.op,
            expected,
            found: self.args.len(),
            at: self.at.to_string(),
        }
    }

    fn invalid(&self, i: usize, expected: &'static str, found: &Json) -> LoadError {
        let at = self.child(i);
        error!(op = self.op, at = %at, expected, "Invalid literal argument");
        LoadError::InvalidLiteral {
            op: self.op,
            expected,
            found: found.to_string(),
            at,
        }
    }

    fn expr(&self, i: usize) -> Result<Expr, LoadError> {
        load_expr(&self.args[i], &self.child(i))
    }

    fn exprs_from(&self, start: usize) -> Result<Vec<Expr>, LoadError> {
        (start..self.args.len()).map(|i| self.expr(i)).collect()
    }

    fn name(&self, i: usize) -> Result<String, LoadError> {
        match &self.args[i] {
            Json::String(name) => Ok(name.clone()),
            other => Err(self.invalid(i, "a variable name string", other)),
        }
    }

    fn count(&self, i: usize) -> Result<usize, LoadError> {
        self.args[i]
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| self.invalid(i, "a non-negative integer literal", &self.args[i]))
    }

    fn index(&self, i: usize) -> Result<i64, LoadError> {
        self.args[i]
            .as_i64()
            .ok_or_else(|| self.invalid(i, "an integer index literal", &self.args[i]))
    }

    fn params(&self, i: usize) -> Result<Vec<String>, LoadError> {
        let expected = "a list of parameter name strings";
        let Json::Array(items) = &self.args[i] else {
            return Err(self.invalid(i, expected, &self.args[i]));
        };
        items
            .iter()
            .map(|item| match item {
                Json::String(name) => Ok(name.clone()),
                _ => Err(self.invalid(i, expected, &self.args[i])),
            })
            .collect()
    }

    fn datum(&self, json: &Json, at: &str) -> Result<Datum, LoadError> {
        match json {
            Json::Null => Ok(Datum::Null),
            Json::Number(n) => n.as_i64().map(Datum::Integer).ok_or_else(|| self.bad_datum(json, at)),
            Json::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.datum(item, &format!("{}[{}]", at, i)))
                .collect::<Result<_, _>>()
                .map(Datum::Array),
            _ => Err(self.bad_datum(json, at)),
        }
    }

    fn bad_datum(&self, json: &Json, at: &str) -> LoadError {
        error!(op = self.op, at = %at, "Invalid quoted data");
        LoadError::InvalidLiteral {
            op: self.op,
            expected: "an integer, null or a nested list",
            found: json.to_string(),
            at: at.to_string(),
        }
    }
}

fn malformed(json: &Json, at: &str) -> LoadError {
    error!(at = %at, found = %json, "Malformed program node");
    LoadError::Malformed {
        found: json.to_string(),
        at: at.to_string(),
    }
}
