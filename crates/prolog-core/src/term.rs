//! Term representation for the resolution engine
//!
//! This module defines the two faces of a term:
//!
//! - **`Pattern`**: the authoring-time template stored in clauses and
//!   queries, where variables are identified by *name*. Patterns are
//!   immutable once built.
//! - **`Term`**: the runtime instantiation used during resolution, where
//!   every variable has been replaced by a fresh slot in the binding
//!   store ([`crate::bindings::Bindings`]).
//!
//! # Token classification
//!
//! Clause and query arguments may be supplied as bare textual tokens,
//! which materialize as follows:
//!
//! - leading uppercase letter or `_` ⇒ variable (`"X"`, `"_tmp"`)
//! - numeral ⇒ numeric constant (`"42"`, `"3.5"`)
//! - any other bare token ⇒ atom constant (`"bob"`, `"[]"`)
//! - embedded whitespace ⇒ inline arithmetic expression (`"N0 / 2"`)
//!
//! Bracketed sequences become lists; the bar form `["a", "b", "|", "T"]`
//! denotes a partial list with an explicit tail. A token that cannot be
//! classified (a misplaced bar, a dangling operator) raises [`TermError`]
//! at construction time, the single fatal error class; nothing fails
//! loudly once the search has started.

use internment::Intern;
use serde::Serialize;
use std::fmt;

use crate::arith::{ArithOp, Expr};
use crate::bindings::VarId;
use crate::knowledge::{Goal, GoalPattern};

/// Interned string for efficient storage and comparison
pub type Symbol = Intern<String>;

/// Intern a string as a [`Symbol`].
pub fn sym(name: &str) -> Symbol {
    Intern::new(name.to_string())
}

/// An atomic constant value: a symbolic atom or a number.
///
/// Numeric comparison promotes `Int` to `Float`, so `Int(5)` and
/// `Float(5.0)` match during unification even though they are distinct
/// values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    /// Symbolic atom: `bob`, `grass`, `[]`
    Atom(Symbol),
    /// Integer literal
    Int(i64),
    /// Floating-point literal (also the result of any division)
    Float(f64),
}

impl Value {
    /// Numeric view of this value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Atom(_) => None,
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
        }
    }

    /// Equality as unification sees it: atoms by identity, numbers by
    /// promoted numeric comparison.
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Atom(a), Value::Atom(b)) => a == b,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Atom(name) => write!(f, "{}", name.as_ref()),
            Value::Int(i) => write!(f, "{}", i),
            // Render floats without a trailing ".0" so `10 / 2` prints as `5`.
            Value::Float(x) if x.fract() == 0.0 && x.is_finite() => {
                write!(f, "{}", *x as i64)
            }
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

/// A runtime term participating in unification.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Variable, identified by its slot in the binding store
    Variable(VarId),
    /// Immutable constant
    Constant(Value),
    /// List cell: head plus tail (another cell, a variable, or [`Term::Nil`])
    Cons(Box<Term>, Box<Term>),
    /// The canonical empty-list constant
    Nil,
    /// Arithmetic expression; has no value until forced
    Expr(Expr<Term>),
    /// A goal used as an argument (consumed by negation, never unified)
    Goal(Box<Goal>),
}

impl Term {
    /// Build a nil-terminated list from the given elements.
    pub fn list(items: Vec<Term>) -> Term {
        let mut tail = Term::Nil;
        for item in items.into_iter().rev() {
            tail = Term::Cons(Box::new(item), Box::new(tail));
        }
        tail
    }

    /// Shorthand for an integer constant.
    pub fn int(i: i64) -> Term {
        Term::Constant(Value::Int(i))
    }

    /// Shorthand for an atom constant.
    pub fn atom(name: &str) -> Term {
        Term::Constant(Value::Atom(sym(name)))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "_G{}", v.index()),
            Term::Constant(value) => write!(f, "{}", value),
            Term::Cons(head, tail) => {
                write!(f, "[{}", head)?;
                let mut rest: &Term = tail;
                loop {
                    match rest {
                        Term::Cons(h, t) => {
                            write!(f, ", {}", h)?;
                            rest = t;
                        }
                        Term::Nil => break,
                        other => {
                            write!(f, "|{}", other)?;
                            break;
                        }
                    }
                }
                write!(f, "]")
            }
            Term::Nil => write!(f, "[]"),
            Term::Expr(e) => write!(f, "{}", e),
            Term::Goal(g) => write!(f, "{}", g),
        }
    }
}

/// An authoring-time template term, scoped by variable name.
///
/// Patterns are what [`crate::knowledge::KnowledgeBase::add_clause`] and
/// the query interface accept; instantiation turns them into [`Term`]s
/// with fresh variables per clause activation.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Named variable; the same name within one clause or query scope
    /// always denotes the same variable
    Var(Symbol),
    /// Immutable constant
    Constant(Value),
    /// List cell
    Cons(Box<Pattern>, Box<Pattern>),
    /// Empty list
    Nil,
    /// Arithmetic expression template
    Expr(Expr<Pattern>),
    /// Nested goal argument (for negation)
    Goal(Box<GoalPattern>),
}

impl Pattern {
    /// Materialize a single textual token.
    ///
    /// See the module documentation for the classification rules.
    pub fn parse(token: &str) -> Result<Pattern, TermError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TermError::EmptyToken);
        }
        if token == "|" {
            return Err(TermError::MisplacedBar);
        }
        // Embedded whitespace denotes an inline arithmetic expression.
        if token.contains(char::is_whitespace) {
            return Ok(Pattern::Expr(Self::parse_expr(token)?));
        }
        Ok(Self::parse_bare(token))
    }

    /// Classify a bare (whitespace-free) token.
    fn parse_bare(token: &str) -> Pattern {
        if let Ok(i) = token.parse::<i64>() {
            return Pattern::Constant(Value::Int(i));
        }
        if let Ok(x) = token.parse::<f64>() {
            return Pattern::Constant(Value::Float(x));
        }
        let first = token.chars().next().expect("token is non-empty");
        if first.is_uppercase() || first == '_' {
            Pattern::Var(sym(token))
        } else if token == "[]" {
            Pattern::Nil
        } else {
            Pattern::Constant(Value::Atom(sym(token)))
        }
    }

    /// Split a whitespace-separated token into an alternating
    /// operand/operator expression.
    fn parse_expr(token: &str) -> Result<Expr<Pattern>, TermError> {
        let mut expr = Expr::new();
        let mut expect_operand = true;
        for part in token.split_whitespace() {
            if expect_operand {
                match ArithOp::parse(part) {
                    Some(_) => {
                        return Err(TermError::MalformedExpression(token.to_string()));
                    }
                    None => expr.push_operand(Self::parse_bare(part)),
                }
            } else {
                match ArithOp::parse(part) {
                    Some(op) => expr.push_operator(op),
                    None => {
                        return Err(TermError::MalformedExpression(token.to_string()));
                    }
                }
            }
            expect_operand = !expect_operand;
        }
        // A trailing operator leaves the expression dangling.
        if expect_operand {
            return Err(TermError::MalformedExpression(token.to_string()));
        }
        Ok(expr)
    }

    /// Materialize a bracketed token sequence into a list pattern.
    ///
    /// `["a", "b", "c"]` becomes a nil-terminated list; the bar form
    /// `["a", "b", "|", "T"]` (bar at the second-to-last slot) becomes a
    /// partial list with `T` as its explicit tail. A bar anywhere else is
    /// ambiguous and rejected.
    pub fn list_tokens(tokens: &[&str]) -> Result<Pattern, TermError> {
        let bars: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == "|")
            .map(|(i, _)| i)
            .collect();
        match bars.as_slice() {
            [] => {
                let items = tokens
                    .iter()
                    .map(|t| Pattern::parse(t))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Pattern::list(items))
            }
            [i] if tokens.len() >= 3 && *i == tokens.len() - 2 => {
                let heads = tokens[..*i]
                    .iter()
                    .map(|t| Pattern::parse(t))
                    .collect::<Result<Vec<_>, _>>()?;
                let tail = Pattern::parse(tokens[tokens.len() - 1])?;
                Ok(Pattern::partial_list(heads, tail))
            }
            _ => Err(TermError::MisplacedBar),
        }
    }

    /// Build a nil-terminated list from the given element patterns.
    pub fn list(items: Vec<Pattern>) -> Pattern {
        Self::partial_list(items, Pattern::Nil)
    }

    /// Build a list with an explicit tail.
    pub fn partial_list(items: Vec<Pattern>, tail: Pattern) -> Pattern {
        let mut rest = tail;
        for item in items.into_iter().rev() {
            rest = Pattern::Cons(Box::new(item), Box::new(rest));
        }
        rest
    }
}

/// Errors raised while materializing terms from textual tokens.
///
/// These are the only fatal errors in the system; they surface at clause
/// or query construction time, before any search starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermError {
    /// An empty or all-whitespace token
    EmptyToken,
    /// A `|` list marker outside the second-to-last slot
    MisplacedBar,
    /// An inline expression that does not alternate operands and operators
    MalformedExpression(String),
}

impl fmt::Display for TermError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermError::EmptyToken => write!(f, "empty term token"),
            TermError::MisplacedBar => {
                write!(f, "ambiguous '|' list marker")
            }
            TermError::MalformedExpression(tok) => {
                write!(f, "malformed arithmetic expression: '{}'", tok)
            }
        }
    }
}

impl std::error::Error for TermError {}
