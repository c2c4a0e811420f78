//! Core term model for the embedded resolution engine
//!
//! Provides the term representation with its binding-propagation store,
//! the unification algorithm, the lazy arithmetic evaluator, and the
//! knowledge base of user-declared clauses. The backtracking search
//! itself lives in the `prolog-eval` crate.

pub mod arith;
pub mod bindings;
pub mod knowledge;
pub mod term;
pub mod unify;

pub use arith::{eval_term, ArithOp, Expr, ExprItem};
pub use bindings::{Bindings, VarId};
pub use knowledge::{Clause, Goal, GoalPattern, KnowledgeBase, Predicate};
pub use term::{sym, Pattern, Symbol, Term, TermError, Value};
pub use unify::{compatible, unify, unify_pair};
