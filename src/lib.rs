//! A tree-walking evaluator for a small list-encoded expression language.
//!
//! Programs are nested lists such as `["seq", ["set", "x", 2], ["mul", ["get", "x"], 21]]`.
//! They are validated into [`engine::ast::Expr`] by the [`engine::loader`] and then run
//! by an [`engine::eval::Interpreter`] over a stack of frames where only the top frame is
//! visible.

pub mod engine;
pub mod logging;

use anyhow::Context;
use engine::eval::Interpreter;
use engine::value::Value;
use std::io::Write;
use tracing::{debug, instrument};

/// Loads a JSON-encoded program and evaluates it against the interpreter's current frame.
/// `origin` names where the source came from, for error messages.
#[instrument(skip(source, interp), err)]
pub fn evaluate_source<W: Write>(
    source: &str,
    interp: &mut Interpreter<W>,
    origin: &str,
) -> anyhow::Result<Value> {
    let program = engine::loader::load_program(source)
        .with_context(|| format!("Failed to load program from {}", origin))?;
    debug!(%program, "Evaluating loaded program");
    let value = interp
        .eval(&program)
        .with_context(|| format!("Failed to evaluate program from {}", origin))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::env::Frame;
    use crate::engine::eval::EvalError;
    use crate::engine::loader::LoadError;
    use crate::logging::init_test_logging;

    #[test]
    fn evaluates_json_source() {
        init_test_logging();
        let mut interp = Interpreter::with_output(Frame::new(), Vec::new());
        let value = evaluate_source(
            r#"["seq", ["set", "x", 2], ["print", ["get", "x"]], ["mul", ["get", "x"], 21]]"#,
            &mut interp,
            "test",
        )
        .unwrap();
        assert_eq!(value, Value::Integer(42));
        assert_eq!(String::from_utf8(interp.into_output()).unwrap(), "[2]\n");
    }

    #[test]
    fn frame_persists_between_sources() {
        init_test_logging();
        let mut interp = Interpreter::with_output(Frame::new(), Vec::new());
        evaluate_source(r#"["def", "inc", ["n"], ["add", ["get", "n"], 1]]"#, &mut interp, "line 1")
            .unwrap();
        let value = evaluate_source(r#"["call", "inc", 41]"#, &mut interp, "line 2").unwrap();
        assert_eq!(value, Value::Integer(42));
    }

    #[test]
    fn errors_keep_their_kind_and_origin() {
        init_test_logging();
        let mut interp = Interpreter::with_output(Frame::new(), Vec::new());

        let err = evaluate_source(r#"["pow", 2, 3]"#, &mut interp, "demo.json").unwrap_err();
        assert!(err.to_string().contains("demo.json"));
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnknownOperation { .. })
        ));

        let err = evaluate_source(r#"["get", "x"]"#, &mut interp, "demo.json").unwrap_err();
        assert_eq!(
            err.downcast_ref::<EvalError>(),
            Some(&EvalError::NameError("x".to_string()))
        );
    }
}
