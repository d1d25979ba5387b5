use crate::engine::ast::Expr;
use crate::engine::builtins::{math, print, special_forms};
use crate::engine::env::{Frame, ScopeStack};
use crate::engine::value::Value;
use std::io::{self, Write};
use thiserror::Error;
use tracing::{error, instrument, trace};

/// Default limit on how deeply evaluation may nest (expressions plus calls).
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

// Headroom kept on the native stack before `stacker` switches to a fresh segment.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 2 * 1024 * 1024;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Name error: '{0}' is not defined in the current frame")]
    NameError(String),
    #[error("Type error in '{op}': expected {expected}, found {found}")]
    TypeError {
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Index error: index {index} is out of bounds for array '{name}' of length {length}")]
    IndexError {
        name: String,
        index: i64,
        length: usize,
    },
    #[error("Arity error: function '{name}' expects {expected} arguments, got {found}")]
    ArityError {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Stack overflow: evaluation nested deeper than {limit} levels")]
    StackOverflow { limit: usize },
    #[error("Integer overflow in '{op}'")]
    Overflow { op: &'static str },
    #[error("Output error: {0}")]
    Output(String),
}

/// Evaluates programs against one scope stack, sending `print` output to `out`.
pub struct Interpreter<W: Write = io::Stdout> {
    scopes: ScopeStack,
    out: W,
    depth: usize,
    max_depth: usize,
}

impl Interpreter<io::Stdout> {
    /// An interpreter whose `print` output goes to stdout.
    pub fn new(globals: Frame) -> Self {
        Self::with_output(globals, io::stdout())
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(globals: Frame, out: W) -> Self {
        Interpreter {
            scopes: ScopeStack::with_globals(globals),
            out,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum evaluation depth.
    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeStack {
        &mut self.scopes
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Writes one line to the print side channel.
    pub(crate) fn emit(&mut self, line: &str) -> Result<(), EvalError> {
        writeln!(self.out, "{}", line)
            .and_then(|_| self.out.flush())
            .map_err(|e| {
                error!(error = %e, "Failed to write print output");
                EvalError::Output(e.to_string())
            })
    }

    /// Evaluates one expression in the current top frame.
    #[instrument(level = "trace", skip(self, expr), fields(op = expr.op_name(), depth = self.depth), ret, err)]
    pub fn eval(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        if self.depth >= self.max_depth {
            error!(limit = self.max_depth, "Evaluation depth limit reached");
            return Err(EvalError::StackOverflow {
                limit: self.max_depth,
            });
        }

        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.dispatch(expr));
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        trace!("Starting evaluation");
        match expr {
            Expr::Integer(n) => Ok(Value::Integer(*n)),
            Expr::Add(left, right) => math::eval_add(self, left, right),
            Expr::Mul(left, right) => math::eval_mul(self, left, right),
            Expr::Get { name } => special_forms::eval_get(self, name),
            Expr::Set { name, value } => special_forms::eval_set(self, name, value),
            Expr::Seq(exprs) => special_forms::eval_seq(self, exprs),
            Expr::Repeat { count, body } => special_forms::eval_repeat(self, *count, body),
            Expr::Print(exprs) => print::eval_print(self, exprs),
            Expr::Array { size } => special_forms::eval_array(*size),
            Expr::Arr(data) => special_forms::eval_arr(data),
            Expr::ArrayGet { name, index } => special_forms::eval_array_get(self, name, *index),
            Expr::ArraySet { name, index, value } => {
                special_forms::eval_array_set(self, name, *index, value)
            }
            Expr::If {
                cond,
                then,
                otherwise,
            } => special_forms::eval_if(self, cond, then, otherwise),
            Expr::Def { name, params, body } => special_forms::eval_def(self, name, params, body),
            Expr::Func { params, body } => special_forms::eval_func(params, body),
            Expr::Call { name, args } => special_forms::eval_call(self, name, args),
        }
    }
}

/// Runs `program` with a fresh scope stack seeded from `globals`, printing to stdout.
pub fn evaluate(globals: Frame, program: &Expr) -> Result<Value, EvalError> {
    Interpreter::new(globals).eval(program)
}
