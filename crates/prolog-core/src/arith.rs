//! Arithmetic expressions and lazy evaluation
//!
//! An expression is an ordered sequence alternating operand terms and
//! binary operators, built incrementally with [`Expr::push_operand`] and
//! [`Expr::push_operator`]. It has no value until forced against the
//! current binding state.
//!
//! # Precedence
//!
//! Folding is left to right with a single exception: appending a
//! multiplicative operator (`*`, `/`, `%`) immediately after a pending
//! additive operator pops the most recent (operator, operand) pair and
//! re-nests it as a sub-expression bound tighter than the pending
//! additive operator. The nested chain stays open for further
//! multiplicative appends and is closed by the next additive operator.
//! This gives `2 + 4 * 5 = 22` and `2 * 4 + 5 = 13` without full
//! precedence climbing.
//!
//! # Undefined values
//!
//! Referencing an unbound variable, a non-numeric operand, or dividing
//! by zero makes the whole expression undefined (`None`). This is never
//! fatal; it surfaces as an ordinary unification or comparison failure.

use std::fmt;

use crate::bindings::Bindings;
use crate::term::{Term, Value};

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Mod, // %
}

impl ArithOp {
    /// Parse an operator token.
    pub fn parse(token: &str) -> Option<ArithOp> {
        match token {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            "%" | "mod" => Some(ArithOp::Mod),
            _ => None,
        }
    }

    /// Multiplicative operators bind tighter than additive ones.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, ArithOp::Mul | ArithOp::Div | ArithOp::Mod)
    }

    fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One slot of an expression sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprItem<T> {
    /// An operand term
    Operand(T),
    /// A binary operator between two operands
    Operator(ArithOp),
    /// A re-nested multiplicative sub-expression
    Sub(Expr<T>),
}

/// An incrementally-built arithmetic expression.
///
/// Generic over the operand type so the same structure serves authoring
/// patterns (`Expr<Pattern>`) and runtime terms (`Expr<Term>`).
#[derive(Debug, Clone, PartialEq)]
pub struct Expr<T> {
    items: Vec<ExprItem<T>>,
    /// A freshly re-nested sub-expression keeps absorbing multiplicative
    /// appends until an additive operator closes it.
    open: bool,
}

impl<T> Default for Expr<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Expr<T> {
    pub fn new() -> Self {
        Expr {
            items: Vec::new(),
            open: false,
        }
    }

    /// The alternating item sequence.
    pub fn items(&self) -> &[ExprItem<T>] {
        &self.items
    }

    /// Append an operand.
    pub fn push_operand(&mut self, operand: T) {
        if let Some(ExprItem::Sub(sub)) = self.items.last_mut() {
            if sub.open {
                sub.push_operand(operand);
                return;
            }
        }
        self.items.push(ExprItem::Operand(operand));
    }

    /// Append a binary operator, re-nesting per the precedence rule.
    pub fn push_operator(&mut self, op: ArithOp) {
        if let Some(ExprItem::Sub(sub)) = self.items.last_mut() {
            if sub.open {
                if op.is_multiplicative() {
                    sub.push_operator(op);
                    return;
                }
                sub.open = false;
            }
        }
        if op.is_multiplicative() {
            if let Some(pending) = self.last_operator() {
                if !pending.is_multiplicative() {
                    // Pop the most recent operand and re-nest it tighter
                    // than the pending additive operator.
                    if let Some(ExprItem::Operand(operand)) = self.items.pop() {
                        let mut sub = Expr::new();
                        sub.items.push(ExprItem::Operand(operand));
                        sub.items.push(ExprItem::Operator(op));
                        sub.open = true;
                        self.items.push(ExprItem::Sub(sub));
                        return;
                    }
                }
            }
        }
        self.items.push(ExprItem::Operator(op));
    }

    fn last_operator(&self) -> Option<ArithOp> {
        self.items.iter().rev().find_map(|item| match item {
            ExprItem::Operator(op) => Some(*op),
            _ => None,
        })
    }

    /// Rebuild the expression with a different operand type.
    pub fn map<U>(&self, f: &mut impl FnMut(&T) -> U) -> Expr<U> {
        Expr {
            items: self
                .items
                .iter()
                .map(|item| match item {
                    ExprItem::Operand(t) => ExprItem::Operand(f(t)),
                    ExprItem::Operator(op) => ExprItem::Operator(*op),
                    ExprItem::Sub(sub) => ExprItem::Sub(sub.map(f)),
                })
                .collect(),
            open: self.open,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Expr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match item {
                ExprItem::Operand(t) => write!(f, "{}", t)?,
                ExprItem::Operator(op) => write!(f, "{}", op)?,
                ExprItem::Sub(sub) => write!(f, "({})", sub)?,
            }
        }
        Ok(())
    }
}

/// A numeric operand during folding, promoting `Int` to `Float` only
/// when required.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(Numeric::Int(*i)),
            Value::Float(f) => Some(Numeric::Float(*f)),
            Value::Atom(_) => None,
        }
    }

    fn to_value(self) -> Value {
        match self {
            Numeric::Int(i) => Value::Int(i),
            Numeric::Float(f) => Value::Float(f),
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }

    fn apply(self, op: ArithOp, other: Numeric) -> Option<Numeric> {
        match op {
            ArithOp::Add => Some(match (self, other) {
                (Numeric::Int(l), Numeric::Int(r)) => Numeric::Int(l + r),
                (l, r) => Numeric::Float(l.to_f64() + r.to_f64()),
            }),
            ArithOp::Sub => Some(match (self, other) {
                (Numeric::Int(l), Numeric::Int(r)) => Numeric::Int(l - r),
                (l, r) => Numeric::Float(l.to_f64() - r.to_f64()),
            }),
            ArithOp::Mul => Some(match (self, other) {
                (Numeric::Int(l), Numeric::Int(r)) => Numeric::Int(l * r),
                (l, r) => Numeric::Float(l.to_f64() * r.to_f64()),
            }),
            // Division always uses floating semantics.
            ArithOp::Div => {
                let divisor = other.to_f64();
                if divisor == 0.0 {
                    None
                } else {
                    Some(Numeric::Float(self.to_f64() / divisor))
                }
            }
            ArithOp::Mod => match (self, other) {
                (_, Numeric::Int(0)) => None,
                (Numeric::Int(l), Numeric::Int(r)) => Some(Numeric::Int(l % r)),
                (l, r) => {
                    let divisor = r.to_f64();
                    if divisor == 0.0 {
                        None
                    } else {
                        Some(Numeric::Float(l.to_f64() % divisor))
                    }
                }
            },
        }
    }
}

/// Force a runtime term to a concrete numeric value.
///
/// Returns `None` for unbound variables, atoms, lists, and undefined
/// sub-expressions.
pub fn eval_term(term: &Term, bindings: &Bindings) -> Option<Value> {
    match term {
        Term::Constant(value) => Numeric::from_value(value).map(Numeric::to_value),
        Term::Variable(v) => bindings
            .value(*v)
            .and_then(|bound| eval_term(&bound.clone(), bindings)),
        Term::Expr(e) => e.eval(bindings),
        _ => None,
    }
}

impl Expr<Term> {
    /// Fold the expression left to right against the current bindings.
    pub fn eval(&self, bindings: &Bindings) -> Option<Value> {
        let mut acc: Option<Numeric> = None;
        let mut pending: Option<ArithOp> = None;
        for item in &self.items {
            match item {
                ExprItem::Operator(op) => {
                    // Two operators in a row leave the expression undefined.
                    if pending.is_some() || acc.is_none() {
                        return None;
                    }
                    pending = Some(*op);
                }
                ExprItem::Operand(_) | ExprItem::Sub(_) => {
                    let value = match item {
                        ExprItem::Operand(t) => eval_term(t, bindings)?,
                        ExprItem::Sub(sub) => sub.eval(bindings)?,
                        ExprItem::Operator(_) => unreachable!(),
                    };
                    let rhs = Numeric::from_value(&value)?;
                    acc = Some(match (acc, pending.take()) {
                        (None, None) => rhs,
                        (Some(lhs), Some(op)) => lhs.apply(op, rhs)?,
                        // Two operands in a row, or an operand before any
                        // operator resolved: undefined.
                        _ => return None,
                    });
                }
            }
        }
        if pending.is_some() {
            return None;
        }
        acc.map(Numeric::to_value)
    }
}
