//! Unification
//!
//! The compatibility test and binding operation between two term
//! sequences: *call arguments* from the invoking goal against *head
//! arguments* from a freshly instantiated clause.
//!
//! Compatibility is three-valued: a pair is compatible if at least one
//! side is unbound, or both sides are bound with equal values. In
//! particular unbound-vs-unbound is vacuously true; cut and negation
//! behavior depend on this.
//!
//! On success the head-side term becomes the representative and the
//! call-side term its observer; a call-side value is pushed onto the
//! representative and propagated (see [`crate::bindings`]). Failure of a
//! later pair does **not** roll back bindings made by earlier pairs;
//! rollback between clause alternatives is the resolution engine's trail
//! responsibility.

use crate::arith::eval_term;
use crate::bindings::Bindings;
use crate::term::Term;

/// Unify two equal-length argument sequences.
///
/// Clears the head-side observer sets first: this is a fresh attempt
/// against the head terms, and observers left over from an earlier
/// attempt must not receive this attempt's values.
pub fn unify(call: &[Term], head: &[Term], bindings: &mut Bindings) -> bool {
    debug_assert_eq!(call.len(), head.len());
    for term in head {
        if let Term::Variable(v) = term {
            bindings.clear_observers(*v);
        }
    }
    call.iter()
        .zip(head.iter())
        .all(|(c, h)| unify_pair(c, h, bindings))
}

/// Unify a single call/head pair.
pub fn unify_pair(call: &Term, head: &Term, bindings: &mut Bindings) -> bool {
    // Arithmetic expressions are forced to a concrete value first; an
    // undefined evaluation fails the pair.
    let call = match force(call, bindings) {
        Some(t) => t,
        None => return false,
    };
    let head = match force(head, bindings) {
        Some(t) => t,
        None => return false,
    };
    let call = deref(call, bindings);
    let head = deref(head, bindings);
    match (call, head) {
        // Goal arguments exist only for negation; they never unify.
        (Term::Goal(_), _) | (_, Term::Goal(_)) => false,
        // Both unbound: vacuously compatible, linked for later values.
        (Term::Variable(c), Term::Variable(h)) => {
            bindings.watch(h, c);
            true
        }
        // The bound side's value lands on the unbound side and propagates.
        (value, Term::Variable(h)) => {
            bindings.assign(h, value);
            true
        }
        (Term::Variable(c), value) => {
            bindings.assign(c, value);
            true
        }
        // List cells recurse head-then-tail; a length mismatch surfaces
        // as Cons-vs-Nil at the first excess or missing element.
        (Term::Cons(ch, ct), Term::Cons(hh, ht)) => {
            unify_pair(&ch, &hh, bindings) && unify_pair(&ct, &ht, bindings)
        }
        (Term::Nil, Term::Nil) => true,
        (Term::Constant(a), Term::Constant(b)) => a.matches(&b),
        // Mismatched shapes never unify.
        _ => false,
    }
}

/// Three-valued compatibility without side effects: would these two
/// terms unify against the current bindings? Used by structural
/// inequality, which compares current values only and never binds.
pub fn compatible(left: &Term, right: &Term, bindings: &Bindings) -> bool {
    let left = match force(left, bindings) {
        Some(t) => t,
        None => return false,
    };
    let right = match force(right, bindings) {
        Some(t) => t,
        None => return false,
    };
    let left = deref(left, bindings);
    let right = deref(right, bindings);
    match (left, right) {
        (Term::Goal(_), _) | (_, Term::Goal(_)) => false,
        (Term::Variable(_), _) | (_, Term::Variable(_)) => true,
        (Term::Cons(lh, lt), Term::Cons(rh, rt)) => {
            compatible(&lh, &rh, bindings) && compatible(&lt, &rt, bindings)
        }
        (Term::Nil, Term::Nil) => true,
        (Term::Constant(a), Term::Constant(b)) => a.matches(&b),
        _ => false,
    }
}

/// Force an arithmetic expression to its concrete value; other terms
/// pass through.
fn force(term: &Term, bindings: &Bindings) -> Option<Term> {
    match term {
        Term::Expr(e) => e.eval(bindings).map(Term::Constant),
        _ => Some(term.clone()),
    }
}

/// Replace a bound variable by its value. Slot values never have a
/// variable at the root, so one step suffices.
fn deref(term: Term, bindings: &Bindings) -> Term {
    match term {
        Term::Variable(v) => match bindings.value(v) {
            Some(value) => value.clone(),
            None => Term::Variable(v),
        },
        other => other,
    }
}
