//! Built-in predicate table
//!
//! Fixed-table primitives consulted when the knowledge base has no
//! clauses for a goal's (predicate, arity). User clauses always shadow a
//! built-in of the same name and arity.
//!
//! # Supported built-ins
//!
//! - **Assignment**: `is/2` unifies its second argument (forced
//!   arithmetic or constant) into its first
//! - **Comparisons**: `</2`, `<=/2`, `>/2`, `>=/2` on concrete numeric
//!   values
//! - **Control**: `!/0` (cut), `true/0`, `fail/0`
//! - **Structural**: `=/2` (real unification, may bind), `\=/2`
//!   (compares current values only, never binds)
//! - **Negation**: `not/1`, a single probe of its goal argument
//! - **Output**: `write/1`
//!
//! The comparison and inequality evaluators here are pure; the engine
//! drives the ones that need search state (cut, negation) or binding
//! mutation (assignment, equality).

use std::collections::HashMap;

use prolog_core::arith::eval_term;
use prolog_core::bindings::Bindings;
use prolog_core::term::{sym, Symbol, Term};
use prolog_core::unify::compatible;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompOp {
    Lt,  // <
    Lte, // <=
    Gt,  // >
    Gte, // >=
}

/// Built-in predicates the engine can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `is/2`: unify the forced second argument into the first
    Is,
    /// Arithmetic comparison of two concretely evaluable sides
    Compare(CompOp),
    /// `!/0`: succeeds and raises the cut signal
    Cut,
    /// `=/2`: structural equality via real unification
    Equal,
    /// `\=/2`: structural inequality on current values
    NotEqual,
    /// `not/1`: negation as failure
    Not,
    /// `write/1`: emit the argument's value
    Write,
    /// `true/0`
    True,
    /// `fail/0`
    Fail,
}

/// The global built-in registry, keyed by (name, arity).
#[derive(Debug)]
pub struct BuiltinTable {
    entries: HashMap<(Symbol, usize), Builtin>,
}

impl Default for BuiltinTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinTable {
    /// The standard table. Alternate spellings (`=<`, `\+`) map to the
    /// same primitives.
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        let mut add = |name: &str, arity: usize, b: Builtin| {
            entries.insert((sym(name), arity), b);
        };
        add("is", 2, Builtin::Is);
        add("<", 2, Builtin::Compare(CompOp::Lt));
        add("<=", 2, Builtin::Compare(CompOp::Lte));
        add("=<", 2, Builtin::Compare(CompOp::Lte));
        add(">", 2, Builtin::Compare(CompOp::Gt));
        add(">=", 2, Builtin::Compare(CompOp::Gte));
        add("!", 0, Builtin::Cut);
        add("=", 2, Builtin::Equal);
        add("\\=", 2, Builtin::NotEqual);
        add("not", 1, Builtin::Not);
        add("\\+", 1, Builtin::Not);
        add("write", 1, Builtin::Write);
        add("true", 0, Builtin::True);
        add("fail", 0, Builtin::Fail);
        add("false", 0, Builtin::Fail);
        BuiltinTable { entries }
    }

    /// Look up a built-in for a goal's (name, arity).
    pub fn lookup(&self, name: Symbol, arity: usize) -> Option<Builtin> {
        self.entries.get(&(name, arity)).copied()
    }
}

/// Evaluate an arithmetic comparison. Fails (returns `false`) when
/// either side is not concretely evaluable: an unbound variable, an
/// atom, a division by zero.
pub fn eval_compare(op: CompOp, left: &Term, right: &Term, bindings: &Bindings) -> bool {
    let (lhs, rhs) = match (eval_term(left, bindings), eval_term(right, bindings)) {
        (Some(l), Some(r)) => (l, r),
        _ => return false,
    };
    let (lhs, rhs) = match (lhs.as_f64(), rhs.as_f64()) {
        (Some(l), Some(r)) => (l, r),
        _ => return false,
    };
    match op {
        CompOp::Lt => lhs < rhs,
        CompOp::Lte => lhs <= rhs,
        CompOp::Gt => lhs > rhs,
        CompOp::Gte => lhs >= rhs,
    }
}

/// Structural inequality: succeeds when the two terms' current values
/// are incompatible. Never binds; an unbound side makes the terms
/// vacuously compatible, so `\=` fails on it.
pub fn terms_distinct(left: &Term, right: &Term, bindings: &Bindings) -> bool {
    !compatible(left, right, bindings)
}
