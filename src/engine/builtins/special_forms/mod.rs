// Declare modules for each operation whose arguments are not all evaluated eagerly
pub mod array_forms;
pub mod call_form;
pub mod fn_form;
pub mod if_form;
pub mod repeat_form;
pub mod seq_form;
pub mod var_forms;

// Re-export public evaluation functions
pub use array_forms::{eval_arr, eval_array, eval_array_get, eval_array_set};
pub use call_form::eval_call;
pub use fn_form::{eval_def, eval_func};
pub use if_form::eval_if;
pub use repeat_form::eval_repeat;
pub use seq_form::eval_seq;
pub use var_forms::{eval_get, eval_set};
