//! List-processing predicates as ordinary clause content
//!
//! None of these are engine primitives: membership, concatenation,
//! length, range, and permutation are user content expressed through the
//! same declare/add_clause interface as any other program, shipped here
//! as example content.

use prolog_core::knowledge::{GoalPattern, KnowledgeBase, Predicate};
use prolog_core::term::Pattern;

/// Handles to the installed list predicates.
pub struct ListLibrary {
    pub member: Predicate,
    pub append: Predicate,
    pub length: Predicate,
    pub range: Predicate,
    pub select: Predicate,
    pub permutation: Predicate,
}

fn pat(token: &str) -> Pattern {
    Pattern::parse(token).expect("library tokens are well-formed")
}

fn list(tokens: &[&str]) -> Pattern {
    Pattern::list_tokens(tokens).expect("library lists are well-formed")
}

/// Install the list library into a knowledge base.
pub fn install(kb: &mut KnowledgeBase) -> ListLibrary {
    let member = kb.declare("member");
    // member(X, [X|_]).
    // member(X, [_|T]) :- member(X, T).
    kb.add_clause(&member, vec![pat("X"), list(&["X", "|", "_T"])], vec![]);
    kb.add_clause(
        &member,
        vec![pat("X"), list(&["_H", "|", "T"])],
        vec![member.goal(vec![pat("X"), pat("T")])],
    );

    let append = kb.declare("append");
    // append([], B, B).
    // append([H|T], B, [H|R]) :- append(T, B, R).
    kb.add_clause(&append, vec![pat("[]"), pat("B"), pat("B")], vec![]);
    kb.add_clause(
        &append,
        vec![list(&["H", "|", "T"]), pat("B"), list(&["H", "|", "R"])],
        vec![append.goal(vec![pat("T"), pat("B"), pat("R")])],
    );

    let length = kb.declare("length");
    // length([], 0).
    // length([_|T], N) :- length(T, M), N is M + 1.
    kb.add_clause(&length, vec![pat("[]"), pat("0")], vec![]);
    kb.add_clause(
        &length,
        vec![list(&["_H", "|", "T"]), pat("N")],
        vec![
            length.goal(vec![pat("T"), pat("M")]),
            GoalPattern::new("is", vec![pat("N"), pat("M + 1")]),
        ],
    );

    let range = kb.declare("range");
    // range(Hi, Hi, [Hi]).
    // range(Lo, Hi, [Lo|T]) :- Lo < Hi, L is Lo + 1, range(L, Hi, T).
    kb.add_clause(&range, vec![pat("Hi"), pat("Hi"), list(&["Hi"])], vec![]);
    kb.add_clause(
        &range,
        vec![pat("Lo"), pat("Hi"), list(&["Lo", "|", "T"])],
        vec![
            GoalPattern::new("<", vec![pat("Lo"), pat("Hi")]),
            GoalPattern::new("is", vec![pat("L"), pat("Lo + 1")]),
            range.goal(vec![pat("L"), pat("Hi"), pat("T")]),
        ],
    );

    let select = kb.declare("select");
    // select(X, [X|T], T).
    // select(X, [H|T], [H|R]) :- select(X, T, R).
    kb.add_clause(
        &select,
        vec![pat("X"), list(&["X", "|", "T"]), pat("T")],
        vec![],
    );
    kb.add_clause(
        &select,
        vec![pat("X"), list(&["H", "|", "T"]), list(&["H", "|", "R"])],
        vec![select.goal(vec![pat("X"), pat("T"), pat("R")])],
    );

    let permutation = kb.declare("permutation");
    // permutation([], []).
    // permutation(L, [H|T]) :- select(H, L, R), permutation(R, T).
    kb.add_clause(&permutation, vec![pat("[]"), pat("[]")], vec![]);
    kb.add_clause(
        &permutation,
        vec![pat("L"), list(&["H", "|", "T"])],
        vec![
            select.goal(vec![pat("H"), pat("L"), pat("R")]),
            permutation.goal(vec![pat("R"), pat("T")]),
        ],
    );

    ListLibrary {
        member,
        append,
        length,
        range,
        select,
        permutation,
    }
}
