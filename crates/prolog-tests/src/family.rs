//! Family-tree fixture tests
//!
//! A knowledge base of facts and rules over a four-generation family,
//! exercising conjunction backtracking, recursion, structural
//! inequality, and negation together.

use prolog_core::knowledge::{GoalPattern, KnowledgeBase, Predicate};
use prolog_core::term::Pattern;
use prolog_eval::{Solution, Solver};

fn pat(token: &str) -> Pattern {
    Pattern::parse(token).unwrap()
}

struct Family {
    kb: KnowledgeBase,
    child: Predicate,
    parent: Predicate,
    father: Predicate,
    mother: Predicate,
    sibling: Predicate,
    uncle: Predicate,
    ancestor: Predicate,
    first_cousin: Predicate,
}

fn family() -> Family {
    let mut kb = KnowledgeBase::new();
    let male = kb.declare("male");
    let female = kb.declare("female");
    let child = kb.declare("child");
    let parent = kb.declare("parent");
    let father = kb.declare("father");
    let mother = kb.declare("mother");
    let sibling = kb.declare("sibling");
    let uncle = kb.declare("uncle");
    let ancestor = kb.declare("ancestor");
    let first_cousin = kb.declare("first_cousin");

    for name in ["bob", "john", "ben", "martin", "william", "morris", "jiri"] {
        kb.add_clause(&male, vec![pat(name)], vec![]);
    }
    for name in ["kathryn", "beatrice", "rachel", "lillian", "rosa", "emma", "nellie", "eva"] {
        kb.add_clause(&female, vec![pat(name)], vec![]);
    }

    // child(A, B): A is the child of B.
    for (a, b) in [
        ("bob", "john"),
        ("bob", "kathryn"),
        ("beatrice", "john"),
        ("beatrice", "kathryn"),
        ("john", "ben"),
        ("john", "rachel"),
        ("lillian", "ben"),
        ("lillian", "rachel"),
        ("kathryn", "rosa"),
        ("kathryn", "martin"),
        ("ben", "isidore"),
        ("william", "isidore"),
        ("emma", "isidore"),
        ("morris", "emma"),
        ("nellie", "emma"),
        ("eva", "emma"),
        ("jiri", "emma"),
    ] {
        kb.add_clause(&child, vec![pat(a), pat(b)], vec![]);
    }

    kb.add_clause(
        &parent,
        vec![pat("A"), pat("B")],
        vec![child.goal(vec![pat("B"), pat("A")])],
    );
    kb.add_clause(
        &father,
        vec![pat("A"), pat("B")],
        vec![male.goal(vec![pat("A")]), parent.goal(vec![pat("A"), pat("B")])],
    );
    kb.add_clause(
        &mother,
        vec![pat("A"), pat("B")],
        vec![female.goal(vec![pat("A")]), parent.goal(vec![pat("A"), pat("B")])],
    );
    kb.add_clause(
        &sibling,
        vec![pat("A"), pat("B")],
        vec![
            parent.goal(vec![pat("X"), pat("A")]),
            parent.goal(vec![pat("X"), pat("B")]),
            GoalPattern::new("\\=", vec![pat("A"), pat("B")]),
        ],
    );
    kb.add_clause(
        &uncle,
        vec![pat("A"), pat("B")],
        vec![
            parent.goal(vec![pat("X"), pat("B")]),
            sibling.goal(vec![pat("A"), pat("X")]),
            male.goal(vec![pat("A")]),
        ],
    );
    kb.add_clause(
        &ancestor,
        vec![pat("A"), pat("B")],
        vec![parent.goal(vec![pat("A"), pat("B")])],
    );
    kb.add_clause(
        &ancestor,
        vec![pat("A"), pat("B")],
        vec![
            parent.goal(vec![pat("A"), pat("X")]),
            ancestor.goal(vec![pat("X"), pat("B")]),
        ],
    );
    kb.add_clause(
        &first_cousin,
        vec![pat("A"), pat("B")],
        vec![
            parent.goal(vec![pat("X"), pat("A")]),
            sibling.goal(vec![pat("Y"), pat("X")]),
            parent.goal(vec![pat("Y"), pat("B")]),
        ],
    );

    Family {
        kb,
        child,
        parent,
        father,
        mother,
        sibling,
        uncle,
        ancestor,
        first_cousin,
    }
}

fn values(results: &[Solution]) -> Vec<String> {
    results
        .iter()
        .map(|s| match s {
            Solution::Bindings(pairs) => pairs
                .iter()
                .map(|(_, v)| v.clone())
                .collect::<Vec<_>>()
                .join("/"),
            other => other.to_string(),
        })
        .collect()
}

#[test]
fn test_parent_enumerates_in_declaration_order() {
    let f = family();
    let solver = Solver::new();
    let results = solver.query(&f.kb, &[f.parent.goal(vec![pat("X"), pat("bob")])]);
    assert_eq!(values(&results), vec!["john", "kathryn"]);
}

#[test]
fn test_ground_queries() {
    let f = family();
    let solver = Solver::new();
    assert_eq!(
        solver.query(&f.kb, &[f.parent.goal(vec![pat("rosa"), pat("kathryn")])]),
        vec![Solution::True]
    );
    assert_eq!(
        solver.query(&f.kb, &[f.child.goal(vec![pat("rosa"), pat("isidore")])]),
        vec![Solution::False]
    );
}

#[test]
fn test_father_and_mother_filter_by_sex() {
    let f = family();
    let solver = Solver::new();
    let fathers = solver.query(&f.kb, &[f.father.goal(vec![pat("X"), pat("bob")])]);
    assert_eq!(values(&fathers), vec!["john"]);
    let mothers = solver.query(&f.kb, &[f.mother.goal(vec![pat("X"), pat("bob")])]);
    assert_eq!(values(&mothers), vec!["kathryn"]);
    assert_eq!(
        solver.query(&f.kb, &[f.mother.goal(vec![pat("john"), pat("X")])]),
        vec![Solution::False]
    );
}

#[test]
fn test_sibling_requires_distinct_people() {
    let f = family();
    let solver = Solver::new();
    let siblings = solver.query(&f.kb, &[f.sibling.goal(vec![pat("bob"), pat("X")])]);
    // Via john and via kathryn; bob itself is excluded by \=.
    assert_eq!(values(&siblings), vec!["beatrice", "beatrice"]);
    assert_eq!(
        solver.query(&f.kb, &[f.sibling.goal(vec![pat("bob"), pat("bob")])]),
        vec![Solution::False]
    );
}

#[test]
fn test_uncle_through_sibling() {
    let f = family();
    let solver = Solver::new();
    let uncles = solver.query(&f.kb, &[f.uncle.goal(vec![pat("X"), pat("morris")])]);
    // emma's siblings: ben and william (both via isidore); only males count.
    let mut names = values(&uncles);
    names.sort();
    names.dedup();
    assert_eq!(names, vec!["ben", "william"]);
}

#[test]
fn test_ancestor_recursion() {
    let f = family();
    let solver = Solver::new();
    let ancestors = solver.query(&f.kb, &[f.ancestor.goal(vec![pat("X"), pat("bob")])]);
    let mut names = values(&ancestors);
    names.sort();
    names.dedup();
    assert_eq!(
        names,
        vec!["ben", "isidore", "john", "kathryn", "martin", "rachel", "rosa"]
    );
    assert_eq!(
        solver.query(&f.kb, &[f.ancestor.goal(vec![pat("bob"), pat("X")])]),
        vec![Solution::False]
    );
}

#[test]
fn test_first_cousins() {
    let f = family();
    let solver = Solver::new();
    let cousins = solver.query(&f.kb, &[f.first_cousin.goal(vec![pat("jiri"), pat("X")])]);
    // emma's siblings ben and william; ben's children: john and lillian.
    let mut names = values(&cousins);
    names.sort();
    names.dedup();
    assert_eq!(names, vec!["john", "lillian"]);
}

#[test]
fn test_negation_over_user_predicates() {
    let f = family();
    let solver = Solver::new();
    let negate = |inner: GoalPattern| GoalPattern::new("not", vec![Pattern::Goal(Box::new(inner))]);
    assert_eq!(
        solver.query(&f.kb, &[negate(f.child.goal(vec![pat("bob"), pat("john")]))]),
        vec![Solution::False]
    );
    assert_eq!(
        solver.query(&f.kb, &[negate(f.child.goal(vec![pat("john"), pat("bob")]))]),
        vec![Solution::True]
    );
}

#[test]
fn test_digestion_chain() {
    // is_digesting follows just_ate transitively.
    let mut kb = KnowledgeBase::new();
    let just_ate = kb.declare("just_ate");
    let is_digesting = kb.declare("is_digesting");
    kb.add_clause(&just_ate, vec![pat("deer"), pat("grass")], vec![]);
    kb.add_clause(&just_ate, vec![pat("tiger"), pat("deer")], vec![]);
    kb.add_clause(
        &is_digesting,
        vec![pat("A"), pat("B")],
        vec![just_ate.goal(vec![pat("A"), pat("B")])],
    );
    kb.add_clause(
        &is_digesting,
        vec![pat("A"), pat("B")],
        vec![
            just_ate.goal(vec![pat("A"), pat("C")]),
            is_digesting.goal(vec![pat("C"), pat("B")]),
        ],
    );
    let solver = Solver::new();
    assert_eq!(
        solver.query(&kb, &[is_digesting.goal(vec![pat("tiger"), pat("grass")])]),
        vec![Solution::True]
    );
    let all = solver.query(&kb, &[is_digesting.goal(vec![pat("X"), pat("Y")])]);
    assert_eq!(all.len(), 3);
}
