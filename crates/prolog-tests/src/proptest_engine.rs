//! Property-based tests for unification, search, and arithmetic
//!
//! These generate random terms, fact sets, and expression chains and
//! check the engine's documented invariants against them.

use proptest::prelude::*;

use prolog_core::arith::{ArithOp, Expr};
use prolog_core::bindings::Bindings;
use prolog_core::knowledge::{GoalPattern, KnowledgeBase};
use prolog_core::term::{Pattern, Term, Value};
use prolog_core::unify::unify_pair;
use prolog_eval::{Solution, Solver};

fn pat(token: &str) -> Pattern {
    Pattern::parse(token).unwrap()
}

/// Ground terms: atoms, integers, and shallow lists of them.
fn ground_term() -> impl Strategy<Value = Term> {
    let leaf = prop_oneof![
        (0i64..5).prop_map(Term::int),
        prop::sample::select(vec!["a", "b", "c"]).prop_map(Term::atom),
    ];
    leaf.prop_recursive(2, 8, 3, |inner| {
        prop::collection::vec(inner, 0..3).prop_map(Term::list)
    })
}

proptest! {
    /// Unification outcome is independent of argument order for terms
    /// with no prior shared observer state.
    #[test]
    fn unification_is_order_independent(lhs in ground_term(), rhs in ground_term()) {
        let mut b1 = Bindings::new();
        let mut b2 = Bindings::new();
        prop_assert_eq!(
            unify_pair(&lhs, &rhs, &mut b1),
            unify_pair(&rhs, &lhs, &mut b2)
        );
    }

    /// Unifying an unbound variable with any ground term succeeds, and
    /// both sides then report the same value.
    #[test]
    fn unbound_side_always_unifies(ground in ground_term()) {
        let mut b = Bindings::new();
        let x = Term::Variable(b.fresh(prolog_core::sym("X")));
        prop_assert!(unify_pair(&ground, &x, &mut b));
        prop_assert_eq!(b.resolve(&x), ground.clone());

        let mut b = Bindings::new();
        let y = Term::Variable(b.fresh(prolog_core::sym("Y")));
        prop_assert!(unify_pair(&y, &ground, &mut b));
        prop_assert_eq!(b.resolve(&y), ground);
    }

    /// N mutually non-unifiable facts, queried with an unbound argument,
    /// yield exactly N solutions and then exhaust.
    #[test]
    fn independent_facts_yield_one_solution_each(
        keys in prop::collection::hash_set(0i64..100, 0..8)
    ) {
        let mut kb = KnowledgeBase::new();
        let p = kb.declare("p");
        for key in &keys {
            kb.add_clause(&p, vec![Pattern::Constant(Value::Int(*key))], vec![]);
        }
        let solver = Solver::new();
        let results = solver.query(&kb, &[p.goal(vec![pat("X")])]);
        if keys.is_empty() {
            prop_assert_eq!(results, vec![Solution::False]);
        } else {
            prop_assert_eq!(results.len(), keys.len());
        }
    }

    /// Adding cut as a clause's first body goal never increases the
    /// solution count.
    #[test]
    fn leading_cut_never_adds_solutions(
        keys in prop::collection::hash_set(0i64..20, 0..6)
    ) {
        let build = |with_cut: bool| {
            let mut kb = KnowledgeBase::new();
            let q = kb.declare("q");
            let p = kb.declare("p");
            for key in &keys {
                kb.add_clause(&q, vec![Pattern::Constant(Value::Int(*key))], vec![]);
            }
            let mut body = Vec::new();
            if with_cut {
                body.push(GoalPattern::new("!", vec![]));
            }
            body.push(q.goal(vec![pat("X")]));
            kb.add_clause(&p, vec![pat("X")], body);
            kb
        };
        let solver = Solver::new();
        let count = |kb: &KnowledgeBase| {
            let p = kb.declare("p");
            solver
                .query(kb, &[p.goal(vec![pat("X")])])
                .into_iter()
                .filter(|s| *s != Solution::False)
                .count()
        };
        prop_assert!(count(&build(true)) <= count(&build(false)));
    }

    /// The one-boundary re-nesting rule agrees with conventional
    /// two-level operator precedence over +, - and *.
    #[test]
    fn expression_folding_matches_reference(
        operands in prop::collection::vec(-5i64..5, 1..6),
        raw_ops in prop::collection::vec(
            prop::sample::select(vec![ArithOp::Add, ArithOp::Sub, ArithOp::Mul]),
            0..5
        ),
    ) {
        let ops = &raw_ops[..raw_ops.len().min(operands.len() - 1)];
        let mut expr: Expr<Term> = Expr::new();
        expr.push_operand(Term::int(operands[0]));
        for (op, value) in ops.iter().zip(&operands[1..]) {
            expr.push_operator(*op);
            expr.push_operand(Term::int(*value));
        }
        let expected = reference_eval(ops, &operands);
        let b = Bindings::new();
        prop_assert_eq!(expr.eval(&b), Some(Value::Int(expected)));
    }
}

/// Conventional evaluation: collapse multiplicative runs first, then
/// fold additive operators left to right.
fn reference_eval(ops: &[ArithOp], operands: &[i64]) -> i64 {
    let mut values = vec![operands[0]];
    let mut additive = Vec::new();
    for (op, value) in ops.iter().zip(&operands[1..]) {
        match op {
            ArithOp::Mul => {
                let last = values.last_mut().expect("at least one operand");
                *last *= value;
            }
            other => {
                additive.push(*other);
                values.push(*value);
            }
        }
    }
    let mut acc = values[0];
    for (op, value) in additive.iter().zip(&values[1..]) {
        match op {
            ArithOp::Add => acc += value,
            ArithOp::Sub => acc -= value,
            _ => unreachable!("only additive operators remain"),
        }
    }
    acc
}
