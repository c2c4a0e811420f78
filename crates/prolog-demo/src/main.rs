//! Demo driver for the embedded resolution engine
//!
//! Builds a small family knowledge base plus a couple of arithmetic and
//! list programs, then runs showcase queries and prints their solutions.
//! Clauses are authored directly through the declare/add_clause
//! interface; there is no textual Prolog syntax to parse.

use anyhow::Result;
use prolog_core::knowledge::{GoalPattern, KnowledgeBase};
use prolog_core::term::{Pattern, TermError};
use prolog_eval::Solver;

fn pat(token: &str) -> Result<Pattern, TermError> {
    Pattern::parse(token)
}

fn list(tokens: &[&str]) -> Result<Pattern, TermError> {
    Pattern::list_tokens(tokens)
}

fn build() -> Result<KnowledgeBase> {
    let mut kb = KnowledgeBase::new();

    let child = kb.declare("child");
    for (a, b) in [
        ("bob", "john"),
        ("bob", "kathryn"),
        ("beatrice", "john"),
        ("beatrice", "kathryn"),
        ("john", "ben"),
        ("kathryn", "rosa"),
    ] {
        kb.add_clause(&child, vec![pat(a)?, pat(b)?], vec![]);
    }

    // parent(A, B) :- child(B, A).
    let parent = kb.declare("parent");
    kb.add_clause(
        &parent,
        vec![pat("A")?, pat("B")?],
        vec![child.goal(vec![pat("B")?, pat("A")?])],
    );

    // ancestor(A, B) :- parent(A, B).
    // ancestor(A, B) :- parent(A, X), ancestor(X, B).
    let ancestor = kb.declare("ancestor");
    kb.add_clause(
        &ancestor,
        vec![pat("A")?, pat("B")?],
        vec![parent.goal(vec![pat("A")?, pat("B")?])],
    );
    kb.add_clause(
        &ancestor,
        vec![pat("A")?, pat("B")?],
        vec![
            parent.goal(vec![pat("A")?, pat("X")?]),
            ancestor.goal(vec![pat("X")?, pat("B")?]),
        ],
    );

    // member(X, [X|_]).
    // member(X, [_|T]) :- member(X, T).
    let member = kb.declare("member");
    kb.add_clause(&member, vec![pat("X")?, list(&["X", "|", "_T"])?], vec![]);
    kb.add_clause(
        &member,
        vec![pat("X")?, list(&["_H", "|", "T"])?],
        vec![member.goal(vec![pat("X")?, pat("T")?])],
    );

    // count(A, A).
    // count(A, C) :- B is A + 1, count(B, C).
    let count = kb.declare("count");
    kb.add_clause(&count, vec![pat("A")?, pat("A")?], vec![]);
    kb.add_clause(
        &count,
        vec![pat("A")?, pat("C")?],
        vec![
            GoalPattern::new("is", vec![pat("B")?, pat("A + 1")?]),
            count.goal(vec![pat("B")?, pat("C")?]),
        ],
    );

    Ok(kb)
}

fn show(label: &str, solutions: &[prolog_eval::Solution]) {
    println!("?- {}", label);
    for solution in solutions {
        println!("   {}", solution);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let kb = build()?;
    let solver = Solver::new();

    let parent = kb.declare("parent");
    show(
        "parent(X, bob).",
        &solver.query(&kb, &[parent.goal(vec![pat("X")?, pat("bob")?])]),
    );

    let ancestor = kb.declare("ancestor");
    show(
        "ancestor(X, bob).",
        &solver.query(&kb, &[ancestor.goal(vec![pat("X")?, pat("bob")?])]),
    );

    let member = kb.declare("member");
    show(
        "member(X, [bob, apple, shirt, pip]).",
        &solver.query(
            &kb,
            &[member.goal(vec![pat("X")?, list(&["bob", "apple", "shirt", "pip"])?])],
        ),
    );

    show(
        "X is 2 + 4 * 5.",
        &solver.query(&kb, &[GoalPattern::new("is", vec![pat("X")?, pat("2 + 4 * 5")?])]),
    );

    // The count space is unbounded; ask for the first five solutions.
    let count = kb.declare("count");
    show(
        "count(0, X), five solutions.",
        &solver.query_max(&kb, &[count.goal(vec![pat("0")?, pat("X")?])], 5),
    );

    Ok(())
}
