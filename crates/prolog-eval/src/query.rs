//! Query interface and solution collection
//!
//! The top-level entry point: materializes goal arguments into runtime
//! terms through a shared per-query naming memo (repeated names resolve
//! to the same variable), drives the resolution engine, and collects
//! variable bindings per solution.
//!
//! # Laziness
//!
//! [`Solver::solve`] returns a [`Solutions`] iterator: lazy and
//! restartable, potentially infinite for recursive predicates. Callers
//! request one, several, or all solutions; ceasing to request more is
//! the only cancellation mechanism. The eager [`Solver::query`] and
//! [`Solver::query_max`] collectors additionally record exactly one
//! [`Solution::False`] when the search exhausts with zero successes.

use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use prolog_builtins::BuiltinTable;
use prolog_core::bindings::{Bindings, VarId};
use prolog_core::knowledge::{instantiate_goal, GoalPattern, KnowledgeBase};
use prolog_core::term::{Symbol, Term};

use crate::engine::{Conjunction, Outcome};

/// One recorded query result: a name→value mapping over the query's
/// named free variables, or a bare truth value when there are none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Solution {
    /// The goals held and no named free variables were involved
    True,
    /// The search exhausted with zero successes (eager collection only)
    False,
    /// The goals held with these variable values, in first-appearance
    /// order
    Bindings(Vec<(Symbol, String)>),
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solution::True => write!(f, "true"),
            Solution::False => write!(f, "false"),
            Solution::Bindings(pairs) => {
                write!(f, "{{")?;
                for (i, (name, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", name.as_ref(), value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Drives the resolution engine against a knowledge base. Owns the
/// built-in registry.
#[derive(Debug, Default)]
pub struct Solver {
    builtins: BuiltinTable,
}

impl Solver {
    pub fn new() -> Self {
        Solver {
            builtins: BuiltinTable::new(),
        }
    }

    /// Start a query, returning its lazy solution sequence.
    pub fn solve<'a>(&'a self, kb: &'a KnowledgeBase, goals: &[GoalPattern]) -> Solutions<'a> {
        let mut bindings = Bindings::new();
        let mut memo = HashMap::new();
        let goals: Vec<_> = goals
            .iter()
            .map(|g| instantiate_goal(g, &mut memo, &mut bindings))
            .collect();
        // Named free variables of the query, in first-appearance order.
        // Underscore-prefixed names are anonymous and excluded.
        let mut free: Vec<(Symbol, VarId)> = Vec::new();
        for goal in &goals {
            for arg in &goal.args {
                collect_free(arg, &bindings, &mut free);
            }
        }
        debug!(
            "query over {} goal(s), {} free variable(s)",
            goals.len(),
            free.len()
        );
        Solutions {
            kb,
            builtins: &self.builtins,
            bindings,
            conj: Conjunction::new(goals),
            free,
            done: false,
        }
    }

    /// Collect every solution. The result is never empty: an exhausted
    /// search with zero successes records exactly one `false`.
    ///
    /// Diverges on an unbounded search space; use [`Solver::query_max`]
    /// or [`Solver::solve`] there.
    pub fn query(&self, kb: &KnowledgeBase, goals: &[GoalPattern]) -> Vec<Solution> {
        self.collect(self.solve(kb, goals), usize::MAX)
    }

    /// Collect up to `max` solutions, stopping early once the cap is
    /// reached.
    pub fn query_max(
        &self,
        kb: &KnowledgeBase,
        goals: &[GoalPattern],
        max: usize,
    ) -> Vec<Solution> {
        if max == 0 {
            return Vec::new();
        }
        self.collect(self.solve(kb, goals), max)
    }

    fn collect(&self, solutions: Solutions<'_>, max: usize) -> Vec<Solution> {
        let collected: Vec<Solution> = solutions.take(max).collect();
        if collected.is_empty() {
            vec![Solution::False]
        } else {
            collected
        }
    }
}

/// Gather named, non-anonymous variables from a query argument. List
/// cells are traversed; expression and goal interiors are not part of a
/// solution's visible payload.
fn collect_free(term: &Term, bindings: &Bindings, free: &mut Vec<(Symbol, VarId)>) {
    match term {
        Term::Variable(v) => {
            let name = bindings.name(*v);
            if !name.as_ref().starts_with('_') && !free.iter().any(|(_, seen)| seen == v) {
                free.push((name, *v));
            }
        }
        Term::Cons(head, tail) => {
            collect_free(head, bindings, free);
            collect_free(tail, bindings, free);
        }
        _ => {}
    }
}

/// The lazy, restartable solution sequence of one query.
pub struct Solutions<'a> {
    kb: &'a KnowledgeBase,
    builtins: &'a BuiltinTable,
    bindings: Bindings,
    conj: Conjunction,
    free: Vec<(Symbol, VarId)>,
    done: bool,
}

impl Solutions<'_> {
    fn snapshot(&self) -> Solution {
        if self.free.is_empty() {
            return Solution::True;
        }
        Solution::Bindings(
            self.free
                .iter()
                .map(|(name, var)| (*name, self.bindings.render(&Term::Variable(*var))))
                .collect(),
        )
    }
}

impl Iterator for Solutions<'_> {
    type Item = Solution;

    fn next(&mut self) -> Option<Solution> {
        if self.done {
            return None;
        }
        match self.conj.next(self.kb, self.builtins, &mut self.bindings) {
            Outcome::Succeed | Outcome::SucceedAndCut => Some(self.snapshot()),
            Outcome::Fail => {
                self.done = true;
                None
            }
        }
    }
}
