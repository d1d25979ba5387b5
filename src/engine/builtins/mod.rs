//! Handlers for every operation, grouped by what they do.

pub mod math;
pub mod print;
pub mod special_forms;
