//! The backtracking resolution state machine
//!
//! Proves a conjunction of goals against the knowledge base, producing a
//! lazy, restartable sequence of outcomes with cut support. Search state
//! is explicit (one suspendable [`GoalAttempt`] per goal position,
//! driven by a [`Conjunction`] cursor) rather than relying on implicit
//! language-level suspension, so a caller can request one, several, or
//! all solutions of an unbounded search space.
//!
//! # Backtracking and undo
//!
//! Every clause alternative takes a trail checkpoint before unifying;
//! abandoning the alternative unwinds the trail, so every variable it
//! touched reports unbound again before the next alternative begins.
//! Bindings imported from an enclosing scope sit below the checkpoint
//! and can never be unwound by this goal.
//!
//! # Cut
//!
//! Cut is a tri-state outcome (`Fail` / `Succeed` / `SucceedAndCut`)
//! threaded through the machine. Once a goal signals cut, a later
//! failure does not retreat past the position where it fired; the
//! conjunction fails terminally there instead, and no further clause
//! alternatives are tried for the predicate whose body raised it.

use log::{debug, trace};

use prolog_builtins::{eval_compare, terms_distinct, Builtin, BuiltinTable};
use prolog_core::bindings::Bindings;
use prolog_core::knowledge::{Goal, KnowledgeBase};
use prolog_core::term::Term;
use prolog_core::unify::{unify, unify_pair};

/// Result of advancing an attempt process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Terminal failure; the attempt is exhausted
    Fail,
    /// One more solution exists; advancing again may find another
    Succeed,
    /// Success that also raises the cut signal for the enclosing
    /// conjunction
    SucceedAndCut,
}

/// The advance/retreat loop over a conjunction of goals (a clause body
/// or a top-level query).
#[derive(Debug)]
pub(crate) struct Conjunction {
    goals: Vec<Goal>,
    attempts: Vec<Option<GoalAttempt>>,
    cursor: usize,
    /// Position where cut fired; retreat never crosses it.
    cut_at: Option<usize>,
    /// The previous call yielded a success; resume one goal back.
    yielded: bool,
    failed: bool,
}

impl Conjunction {
    pub(crate) fn new(goals: Vec<Goal>) -> Self {
        let attempts = goals.iter().map(|_| None).collect();
        Conjunction {
            goals,
            attempts,
            cursor: 0,
            cut_at: None,
            yielded: false,
            failed: false,
        }
    }

    /// Whether cut fired anywhere in this conjunction.
    pub(crate) fn cut_fired(&self) -> bool {
        self.cut_at.is_some()
    }

    /// Advance to the next complete solution of the conjunction.
    /// Returns `Succeed` per solution, then a terminal `Fail`.
    pub(crate) fn next(
        &mut self,
        kb: &KnowledgeBase,
        builtins: &BuiltinTable,
        bindings: &mut Bindings,
    ) -> Outcome {
        if self.failed {
            return Outcome::Fail;
        }
        // A conjunction with no goals holds vacuously, exactly once.
        if self.goals.is_empty() {
            if self.yielded {
                self.failed = true;
                return Outcome::Fail;
            }
            self.yielded = true;
            return Outcome::Succeed;
        }
        if self.yielded {
            // Resume search for further solutions on the last goal.
            self.yielded = false;
            self.cursor -= 1;
        }
        loop {
            let attempt = self.attempts[self.cursor]
                .get_or_insert_with(|| GoalAttempt::new(self.goals[self.cursor].clone(), kb, builtins));
            match attempt.next(kb, builtins, bindings) {
                outcome @ (Outcome::Succeed | Outcome::SucceedAndCut) => {
                    if outcome == Outcome::SucceedAndCut {
                        self.cut_at = Some(self.cursor);
                    }
                    self.cursor += 1;
                    if self.cursor == self.goals.len() {
                        self.yielded = true;
                        return Outcome::Succeed;
                    }
                }
                Outcome::Fail => {
                    // Never retreat past a fired cut: fail terminally.
                    if self.cut_at.is_some_and(|k| self.cursor <= k) {
                        self.failed = true;
                        return Outcome::Fail;
                    }
                    if self.cursor == 0 {
                        self.failed = true;
                        return Outcome::Fail;
                    }
                    // Fresh attempt at this position next time; the
                    // previous goal seeks its next alternative.
                    self.attempts[self.cursor] = None;
                    self.cursor -= 1;
                }
            }
        }
    }
}

/// A lazy, restartable source of outcomes for one goal.
#[derive(Debug)]
pub(crate) struct GoalAttempt {
    goal: Goal,
    kind: AttemptKind,
}

#[derive(Debug)]
enum AttemptKind {
    /// User-clause search over (predicate, arity)
    User {
        clause_index: usize,
        mark: Option<usize>,
        body: Option<Conjunction>,
        exhausted: bool,
    },
    /// Built-in dispatch; at most one success
    Builtin { builtin: Builtin, done: bool },
    /// No user clause, no built-in: always fails
    Unknown,
}

impl GoalAttempt {
    pub(crate) fn new(goal: Goal, kb: &KnowledgeBase, builtins: &BuiltinTable) -> Self {
        // Two-stage lookup: user clauses shadow built-ins; the built-in
        // table is consulted only when the (predicate, arity) is absent
        // from the knowledge base entirely.
        let kind = if kb.clauses(goal.pred, goal.args.len()).is_some() {
            AttemptKind::User {
                clause_index: 0,
                mark: None,
                body: None,
                exhausted: false,
            }
        } else if let Some(builtin) = builtins.lookup(goal.pred, goal.args.len()) {
            AttemptKind::Builtin {
                builtin,
                done: false,
            }
        } else {
            debug!("unknown predicate {}", goal);
            AttemptKind::Unknown
        };
        GoalAttempt { goal, kind }
    }

    /// Advance to this goal's next outcome.
    pub(crate) fn next(
        &mut self,
        kb: &KnowledgeBase,
        builtins: &BuiltinTable,
        bindings: &mut Bindings,
    ) -> Outcome {
        match &mut self.kind {
            AttemptKind::User { .. } => self.next_user(kb, builtins, bindings),
            AttemptKind::Builtin { .. } => self.next_builtin(kb, builtins, bindings),
            AttemptKind::Unknown => Outcome::Fail,
        }
    }

    fn next_user(
        &mut self,
        kb: &KnowledgeBase,
        builtins: &BuiltinTable,
        bindings: &mut Bindings,
    ) -> Outcome {
        let AttemptKind::User {
            clause_index,
            mark,
            body,
            exhausted,
        } = &mut self.kind
        else {
            unreachable!("next_user on non-user attempt");
        };
        let clauses = kb
            .clauses(self.goal.pred, self.goal.args.len())
            .expect("user attempt implies clauses exist");
        loop {
            // A body in progress: forward its successes as ours.
            if let Some(conj) = body {
                match conj.next(kb, builtins, bindings) {
                    Outcome::Succeed | Outcome::SucceedAndCut => return Outcome::Succeed,
                    Outcome::Fail => {
                        let cut = conj.cut_fired();
                        *body = None;
                        bindings.undo_to(mark.take().expect("active clause has a mark"));
                        if cut {
                            // The cut committed to this clause; no
                            // further alternatives for this predicate.
                            *exhausted = true;
                            return Outcome::Fail;
                        }
                        *clause_index += 1;
                    }
                }
                continue;
            }
            if *exhausted || *clause_index >= clauses.len() {
                *exhausted = true;
                return Outcome::Fail;
            }
            let clause = &clauses[*clause_index];
            *mark = Some(bindings.mark());
            let (head, body_goals) = clause.instantiate(bindings);
            if unify(&self.goal.args, &head, bindings) {
                trace!(
                    "{} matched clause {} of {}",
                    self.goal,
                    clause_index,
                    clauses.len()
                );
                // An empty body holds once: the clause is a fact.
                *body = Some(Conjunction::new(body_goals));
            } else {
                bindings.undo_to(mark.take().expect("mark was just set"));
                *clause_index += 1;
            }
        }
    }

    fn next_builtin(
        &mut self,
        kb: &KnowledgeBase,
        builtins: &BuiltinTable,
        bindings: &mut Bindings,
    ) -> Outcome {
        let AttemptKind::Builtin { builtin, done } = &mut self.kind else {
            unreachable!("next_builtin on non-builtin attempt");
        };
        if *done {
            return Outcome::Fail;
        }
        *done = true;
        let args = &self.goal.args;
        match *builtin {
            Builtin::True => Outcome::Succeed,
            Builtin::Fail => Outcome::Fail,
            Builtin::Cut => Outcome::SucceedAndCut,
            // Both assignment and structural equality unify the second
            // argument (forced arithmetic or constant) into the first.
            Builtin::Is | Builtin::Equal => {
                let mark = bindings.mark();
                if unify_pair(&args[1], &args[0], bindings) {
                    Outcome::Succeed
                } else {
                    bindings.undo_to(mark);
                    Outcome::Fail
                }
            }
            Builtin::Compare(op) => {
                if eval_compare(op, &args[0], &args[1], bindings) {
                    Outcome::Succeed
                } else {
                    Outcome::Fail
                }
            }
            Builtin::NotEqual => {
                if terms_distinct(&args[0], &args[1], bindings) {
                    Outcome::Succeed
                } else {
                    Outcome::Fail
                }
            }
            // Negation as failure: probe the inner goal once, undo
            // whatever it bound, invert. Never enumerates further
            // solutions, never binds.
            Builtin::Not => {
                let Term::Goal(inner) = &args[0] else {
                    return Outcome::Fail;
                };
                let mark = bindings.mark();
                let mut probe = GoalAttempt::new((**inner).clone(), kb, builtins);
                let outcome = probe.next(kb, builtins, bindings);
                bindings.undo_to(mark);
                match outcome {
                    Outcome::Fail => Outcome::Succeed,
                    _ => Outcome::Fail,
                }
            }
            Builtin::Write => {
                println!("{}", bindings.render(&args[0]));
                Outcome::Succeed
            }
        }
    }
}
