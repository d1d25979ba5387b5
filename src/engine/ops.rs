//! Names of the built-in operations, as they appear at the head of a list-encoded node.

pub const ADD: &str = "add";
pub const MUL: &str = "mul";
pub const GET: &str = "get";
pub const SET: &str = "set";
pub const SEQ: &str = "seq";
pub const REPEAT: &str = "repeat";
pub const PRINT: &str = "print";
pub const ARRAY: &str = "array";
pub const ARR: &str = "arr";
pub const ARRAY_GET: &str = "array_get";
pub const ARRAY_SET: &str = "array_set";
pub const IF: &str = "if";
pub const DEF: &str = "def";
pub const FUNC: &str = "func";
pub const CALL: &str = "call";

/// Every operation the evaluator understands.
pub const OPERATIONS: &[&str] = &[
    ADD, MUL, GET, SET, SEQ, REPEAT, PRINT, ARRAY, ARR, ARRAY_GET, ARRAY_SET, IF, DEF, FUNC,
    CALL,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn operation_names_are_unique() {
        let names: HashSet<&str> = OPERATIONS.iter().copied().collect();
        assert_eq!(names.len(), OPERATIONS.len());
        assert!(names.contains("array_set"));
        assert!(!names.contains("sub"));
    }
}
