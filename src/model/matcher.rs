use regex::Regex;

use super::{Fact, FieldValue};
use crate::error::ConfigError;

/// Left-hand side of a fact constraint: either a field of the fact under
/// test, or a field of a fact already consumed by an earlier rule.
#[derive(Debug, Clone)]
pub enum LhsExpr {
    Field(String),
    Referenced { index: usize, field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    In,
}

/// Right-hand side of a constraint. Text values used with `=`/`!=` are
/// treated as anchored regexes; `Reference` compares against a field of a
/// previously matched fact.
#[derive(Debug, Clone)]
pub enum RhsValue {
    Num(f64),
    Text(String),
    List(Vec<String>),
    Reference { index: usize, field: String },
}

/// A single `(lhs, op, rhs)` predicate over a fact.
#[derive(Debug, Clone)]
pub struct Matcher {
    lhs: LhsExpr,
    op: MatcherOp,
    rhs: RhsValue,
    // Anchored pattern compiled once when the rhs is text and the op is a
    // (in)equality; other operator/rhs combinations never use it.
    pattern: Option<Regex>,
}

impl Matcher {
    pub fn new(lhs: LhsExpr, op: MatcherOp, rhs: RhsValue) -> Result<Self, ConfigError> {
        let pattern = match (&op, &rhs) {
            (MatcherOp::Eq | MatcherOp::Ne, RhsValue::Text(text)) => {
                Some(Regex::new(&format!("^{}$", text))?)
            }
            _ => None,
        };
        Ok(Self {
            lhs,
            op,
            rhs,
            pattern,
        })
    }

    /// Test a fact against this constraint. `bound` holds the facts matched
    /// by earlier rules, for referential expressions.
    pub fn matches(&self, fact: &Fact, bound: &[Fact]) -> bool {
        let lhs = match self.resolve_lhs(fact, bound) {
            Some(v) => v,
            None => return false,
        };

        match self.op {
            MatcherOp::Eq => self.compare_eq(&lhs, bound),
            MatcherOp::Ne => !self.compare_eq(&lhs, bound),
            MatcherOp::Gt => self.compare_num(&lhs, bound, |a, b| a > b),
            MatcherOp::Lt => self.compare_num(&lhs, bound, |a, b| a < b),
            MatcherOp::Ge => self.compare_num(&lhs, bound, |a, b| a >= b),
            MatcherOp::Le => self.compare_num(&lhs, bound, |a, b| a <= b),
            MatcherOp::In => match &self.rhs {
                RhsValue::List(options) => options.iter().any(|o| *o == lhs.to_string()),
                _ => false,
            },
        }
    }

    fn resolve_lhs(&self, fact: &Fact, bound: &[Fact]) -> Option<FieldValue> {
        match &self.lhs {
            LhsExpr::Field(name) => fact.field(name),
            LhsExpr::Referenced { index, field } => bound.get(*index)?.field(field),
        }
    }

    fn resolve_rhs(&self, bound: &[Fact]) -> Option<FieldValue> {
        match &self.rhs {
            RhsValue::Num(n) => Some(FieldValue::Num(*n)),
            RhsValue::Text(s) => Some(FieldValue::Text(s.clone())),
            RhsValue::Reference { index, field } => bound.get(*index)?.field(field),
            RhsValue::List(_) => None,
        }
    }

    fn compare_eq(&self, lhs: &FieldValue, bound: &[Fact]) -> bool {
        // A textual rhs is an anchored regex over the stringified lhs;
        // anything else is plain equality.
        if let Some(pattern) = &self.pattern {
            return pattern.is_match(&lhs.to_string());
        }
        match self.resolve_rhs(bound) {
            Some(rhs) => match (lhs.as_f64(), rhs.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => lhs.to_string() == rhs.to_string(),
            },
            None => false,
        }
    }

    fn compare_num(&self, lhs: &FieldValue, bound: &[Fact], cmp: fn(f64, f64) -> bool) -> bool {
        let lhs = match lhs.as_f64() {
            Some(n) => n,
            None => return false,
        };
        let rhs = match self.resolve_rhs(bound).and_then(|v| v.as_f64()) {
            Some(n) => n,
            None => return false,
        };
        cmp(lhs, rhs)
    }
}
