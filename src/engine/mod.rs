//! The evaluator engine: program tree, values, scope stack, loader and operation handlers.

pub mod ast;
pub mod builtins;
pub mod env;
pub mod eval;
pub mod loader;
pub mod ops;
pub mod value;
