//! Variable binding store with observer propagation
//!
//! Unification here does not use path-compressed union-find. Instead,
//! every variable owns a slot in an index-addressed table; one side of
//! each unified pair becomes the *representative* and the other side is
//! registered into the representative's observer set. Whenever a
//! representative receives a value, that value is pushed eagerly and
//! transitively through its observers, so all structurally linked terms
//! observe the identical value.
//!
//! A trail records every slot that received a value, giving the
//! resolution engine exact, fully-unwound undo between clause
//! alternatives: [`Bindings::mark`] before an attempt,
//! [`Bindings::undo_to`] when abandoning it.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::term::{Symbol, Term};

/// Stable arena index of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Slot {
    name: Symbol,
    value: Option<Term>,
    observers: Vec<VarId>,
}

/// The binding-propagation store: one slot per live variable, plus the
/// undo trail. The sole mutable shared resource during a search.
#[derive(Debug, Default)]
pub struct Bindings {
    slots: Vec<Slot>,
    trail: Vec<VarId>,
}

impl Bindings {
    pub fn new() -> Self {
        Bindings::default()
    }

    /// Allocate a fresh, unbound variable.
    pub fn fresh(&mut self, name: Symbol) -> VarId {
        let id = VarId(self.slots.len());
        self.slots.push(Slot {
            name,
            value: None,
            observers: Vec::new(),
        });
        id
    }

    /// The name the variable was created with.
    pub fn name(&self, var: VarId) -> Symbol {
        self.slots[var.0].name
    }

    /// Current value of a variable, if bound.
    pub fn value(&self, var: VarId) -> Option<&Term> {
        self.slots[var.0].value.as_ref()
    }

    /// A variable is bound iff it has a value.
    pub fn is_bound(&self, var: VarId) -> bool {
        self.slots[var.0].value.is_some()
    }

    /// Register `observer` to receive `representative`'s value whenever
    /// it changes.
    pub fn watch(&mut self, representative: VarId, observer: VarId) {
        self.slots[representative.0].observers.push(observer);
    }

    /// Drop all observers of a variable. Called at the start of a fresh
    /// unification attempt against it, so stale observers from abandoned
    /// attempts cannot receive later, unrelated values.
    pub fn clear_observers(&mut self, var: VarId) {
        self.slots[var.0].observers.clear();
    }

    /// Bind a variable and push the value through its observer set,
    /// transitively. Every slot that transitions to bound is recorded on
    /// the trail.
    ///
    /// Propagation is an explicit worklist with a visited set; a cycle in
    /// the observer graph (none should occur by construction) cannot loop.
    pub fn assign(&mut self, var: VarId, value: Term) {
        let mut visited: HashSet<VarId> = HashSet::new();
        let mut worklist = vec![var];
        while let Some(v) = worklist.pop() {
            if !visited.insert(v) {
                continue;
            }
            let slot = &mut self.slots[v.0];
            if slot.value.is_none() {
                slot.value = Some(value.clone());
                self.trail.push(v);
            }
            worklist.extend(self.slots[v.0].observers.iter().copied());
        }
    }

    /// Checkpoint for [`Bindings::undo_to`].
    pub fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Unbind every variable recorded on the trail past `mark`, restoring
    /// the state the mark was taken in.
    pub fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let var = self.trail.pop().expect("trail is non-empty");
            self.slots[var.0].value = None;
        }
    }

    /// Replace every bound variable in `term` by its value, recursively.
    /// Unbound variables stay symbolic.
    pub fn resolve(&self, term: &Term) -> Term {
        match term {
            Term::Variable(v) => match self.value(*v) {
                Some(value) => self.resolve(&value.clone()),
                None => term.clone(),
            },
            Term::Cons(head, tail) => Term::Cons(
                Box::new(self.resolve(head)),
                Box::new(self.resolve(tail)),
            ),
            _ => term.clone(),
        }
    }

    /// Render a term with bound variables replaced by their values and
    /// unbound ones by their names.
    pub fn render(&self, term: &Term) -> String {
        let mut out = String::new();
        self.render_into(term, &mut out);
        out
    }

    fn render_into(&self, term: &Term, out: &mut String) {
        match term {
            Term::Variable(v) => match self.value(*v) {
                Some(value) => self.render_into(&value.clone(), out),
                None => out.push_str(self.name(*v).as_ref()),
            },
            Term::Cons(head, tail) => {
                out.push('[');
                self.render_into(head, out);
                let mut rest = self.resolve(tail);
                loop {
                    match rest {
                        Term::Cons(h, t) => {
                            out.push_str(", ");
                            self.render_into(&h, out);
                            rest = self.resolve(&t);
                        }
                        Term::Nil => break,
                        other => {
                            out.push('|');
                            self.render_into(&other, out);
                            break;
                        }
                    }
                }
                out.push(']');
            }
            other => {
                let _ = write!(out, "{}", other);
            }
        }
    }
}
