//! Built-in predicates for the resolution engine

pub mod builtins;

pub use builtins::{eval_compare, terms_distinct, Builtin, BuiltinTable, CompOp};
