use crate::engine::value::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

/// One level of scope.
pub type Frame = HashMap<String, Value>;

/// The stack of frames for one program run.
///
/// Only the top frame is visible: lookups and assignments never fall through to
/// the frames underneath, so a function body sees nothing but its own parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    /// Creates a stack holding a single, empty global frame.
    pub fn new() -> Self {
        Self::with_globals(Frame::new())
    }

    /// Creates a stack whose global frame is pre-seeded with `globals`.
    pub fn with_globals(globals: Frame) -> Self {
        debug!(bindings = globals.len(), "Creating scope stack");
        ScopeStack {
            frames: vec![globals],
        }
    }

    /// Defines a new variable or redefines an existing one in the top frame.
    pub fn define(&mut self, name: String, value: Value) {
        trace!(name = %name, value = ?value, "Defining variable in top frame");
        self.top_mut().insert(name, value);
    }

    /// Looks a variable up in the top frame only.
    pub fn get(&self, name: &str) -> Option<Value> {
        trace!(name = %name, "Looking up variable in top frame");
        let found = self.top().get(name).cloned();
        if found.is_none() {
            debug!(name = %name, depth = self.frames.len(), "Variable not found in top frame");
        }
        found
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
        debug!(depth = self.frames.len(), frame = ?self.top(), "Pushed frame");
    }

    /// Pops the top frame. The global frame is never popped.
    pub fn pop_frame(&mut self) -> Option<Frame> {
        if self.frames.len() == 1 {
            return None;
        }
        let frame = self.frames.pop();
        debug!(depth = self.frames.len(), frame = ?self.top(), "Popped frame");
        frame
    }

    /// Number of frames, including the global one.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn globals(&self) -> &Frame {
        &self.frames[0]
    }

    pub fn into_globals(mut self) -> Frame {
        self.frames.swap_remove(0)
    }

    fn top(&self) -> &Frame {
        // `frames` always holds at least the global frame.
        &self.frames[self.frames.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;

    #[test]
    fn define_and_get_in_global_frame() {
        init_test_logging();
        let mut scopes = ScopeStack::new();
        scopes.define("x".to_string(), Value::Integer(10));
        assert_eq!(scopes.get("x"), Some(Value::Integer(10)));
    }

    #[test]
    fn pushed_frame_hides_globals() {
        init_test_logging();
        let mut scopes = ScopeStack::new();
        scopes.define("x".to_string(), Value::Integer(10));
        scopes.push_frame(Frame::new());
        assert_eq!(scopes.get("x"), None);
        assert_eq!(scopes.depth(), 2);
    }

    #[test]
    fn define_in_pushed_frame_leaves_globals_alone() {
        init_test_logging();
        let mut scopes = ScopeStack::new();
        scopes.define("x".to_string(), Value::Integer(10));
        scopes.push_frame(Frame::new());
        scopes.define("x".to_string(), Value::Integer(20));
        assert_eq!(scopes.get("x"), Some(Value::Integer(20)));

        scopes.pop_frame();
        assert_eq!(scopes.get("x"), Some(Value::Integer(10)));
    }

    #[test]
    fn global_frame_is_never_popped() {
        init_test_logging();
        let mut scopes = ScopeStack::with_globals(Frame::from([(
            "seed".to_string(),
            Value::Integer(1),
        )]));
        assert_eq!(scopes.pop_frame(), None);
        assert_eq!(scopes.depth(), 1);
        assert_eq!(scopes.get("seed"), Some(Value::Integer(1)));
    }

    #[test]
    fn redefine_variable_in_same_frame() {
        init_test_logging();
        let mut scopes = ScopeStack::new();
        scopes.define("x".to_string(), Value::Integer(10));
        scopes.define("x".to_string(), Value::Integer(20));
        assert_eq!(scopes.get("x"), Some(Value::Integer(20)));
        assert_eq!(scopes.into_globals().len(), 1);
    }
}
