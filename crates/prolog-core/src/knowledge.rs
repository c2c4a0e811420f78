//! Knowledge base: predicates, clauses, and goals
//!
//! A predicate groups clauses by arity; declaration order is significant,
//! since it is the order alternatives are tried during resolution. The
//! knowledge base is mutated only during setup and is read-only once a
//! search runs.
//!
//! Clauses store [`Pattern`] templates. Each activation instantiates a
//! private copy with fresh variables (constants are shared, not copied),
//! using a per-activation memo so the same name within one clause scope
//! always yields the same variable.

use std::collections::HashMap;
use std::fmt;

use crate::bindings::{Bindings, VarId};
use crate::term::{Pattern, Symbol, Term, sym};

/// Handle to a declared predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    name: Symbol,
}

impl Predicate {
    pub fn name(&self) -> Symbol {
        self.name
    }

    /// Build a goal invoking this predicate.
    pub fn goal(&self, args: Vec<Pattern>) -> GoalPattern {
        GoalPattern {
            pred: self.name,
            args,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.as_ref())
    }
}

/// An authoring-time goal: a predicate reference plus argument templates.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalPattern {
    pub pred: Symbol,
    pub args: Vec<Pattern>,
}

impl GoalPattern {
    /// Build a goal for a predicate by name (used for built-ins, which
    /// need no declaration).
    pub fn new(pred: &str, args: Vec<Pattern>) -> GoalPattern {
        GoalPattern {
            pred: sym(pred),
            args,
        }
    }
}

/// A runtime goal: one predicate invocation inside a query or clause body.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub pred: Symbol,
    pub args: Vec<Term>,
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pred.as_ref(), self.args.len())
    }
}

/// One fact or rule belonging to a predicate at a given arity.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub head: Vec<Pattern>,
    pub body: Vec<GoalPattern>,
}

impl Clause {
    /// Instantiate a private copy of this clause: fresh variables per
    /// activation, shared across head and body through one memo.
    pub fn instantiate(&self, bindings: &mut Bindings) -> (Vec<Term>, Vec<Goal>) {
        let mut memo: HashMap<Symbol, VarId> = HashMap::new();
        let head = self
            .head
            .iter()
            .map(|p| instantiate_pattern(p, &mut memo, bindings))
            .collect();
        let body = self
            .body
            .iter()
            .map(|g| instantiate_goal(g, &mut memo, bindings))
            .collect();
        (head, body)
    }
}

/// Instantiate one pattern against an activation memo.
pub fn instantiate_pattern(
    pattern: &Pattern,
    memo: &mut HashMap<Symbol, VarId>,
    bindings: &mut Bindings,
) -> Term {
    match pattern {
        Pattern::Var(name) => {
            let var = *memo
                .entry(*name)
                .or_insert_with(|| bindings.fresh(*name));
            Term::Variable(var)
        }
        Pattern::Constant(value) => Term::Constant(value.clone()),
        Pattern::Cons(head, tail) => Term::Cons(
            Box::new(instantiate_pattern(head, memo, bindings)),
            Box::new(instantiate_pattern(tail, memo, bindings)),
        ),
        Pattern::Nil => Term::Nil,
        Pattern::Expr(e) => Term::Expr(e.map(&mut |p| instantiate_pattern(p, memo, bindings))),
        Pattern::Goal(g) => Term::Goal(Box::new(instantiate_goal(g, memo, bindings))),
    }
}

/// Instantiate one goal template against an activation memo.
pub fn instantiate_goal(
    goal: &GoalPattern,
    memo: &mut HashMap<Symbol, VarId>,
    bindings: &mut Bindings,
) -> Goal {
    Goal {
        pred: goal.pred,
        args: goal
            .args
            .iter()
            .map(|p| instantiate_pattern(p, memo, bindings))
            .collect(),
    }
}

/// The clause store, keyed by (predicate, arity).
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    clauses: HashMap<(Symbol, usize), Vec<Clause>>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        KnowledgeBase::default()
    }

    /// Declare a predicate, returning its handle.
    pub fn declare(&self, name: &str) -> Predicate {
        Predicate { name: sym(name) }
    }

    /// Register one clause alternative, appended to that arity's list.
    /// An empty body makes the clause a fact.
    pub fn add_clause(&mut self, pred: &Predicate, head: Vec<Pattern>, body: Vec<GoalPattern>) {
        self.clauses
            .entry((pred.name, head.len()))
            .or_default()
            .push(Clause { head, body });
    }

    /// Clauses for a (predicate, arity), in declaration order. `None`
    /// when the pair is absent from the knowledge base entirely, which
    /// is what sends a goal to the built-in table.
    pub fn clauses(&self, pred: Symbol, arity: usize) -> Option<&[Clause]> {
        self.clauses.get(&(pred, arity)).map(Vec::as_slice)
    }
}
