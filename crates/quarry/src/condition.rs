//! Field conditions addressed by name.
//!
//! A [`Condition`] pairs a field name, an [`Op`], and an owned [`Operand`]. It
//! reads the field through [`Record::field_value`](crate::Record), so it works
//! for any record type without knowing its shape.

use std::cmp::Ordering;
use std::fmt;

use crate::value::{Number, Timestamp, Value};

/// Comparison operator.
///
/// `Eq` and `Ne` apply to every kind. The ordering operators apply to
/// numbers, timestamps and strings. The text operators apply to strings and
/// are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    StartsWith,
    EndsWith,
}

impl Op {
    /// Evaluates an ordering operator against a comparison result.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            Op::Contains | Op::StartsWith | Op::EndsWith => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Contains => "contains",
            Op::StartsWith => "startswith",
            Op::EndsWith => "endswith",
        }
    }

    /// Parses an operator name as produced by [`Op::as_str`], ignoring case.
    pub fn from_name(name: &str) -> Option<Op> {
        const ALL: [Op; 9] = [
            Op::Eq,
            Op::Ne,
            Op::Gt,
            Op::Gte,
            Op::Lt,
            Op::Lte,
            Op::Contains,
            Op::StartsWith,
            Op::EndsWith,
        ];
        ALL.into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owned comparison value held by a [`Condition`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    String(String),
    Number(Number),
    Timestamp(Timestamp),
    Bool(bool),
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::String(s)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::String(s.to_string())
    }
}

impl From<Timestamp> for Operand {
    fn from(t: Timestamp) -> Self {
        Operand::Timestamp(t)
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Bool(b)
    }
}

impl From<Number> for Operand {
    fn from(n: Number) -> Self {
        Operand::Number(n)
    }
}

macro_rules! operand_from_number {
    ($($source:ty),+) => {
        $(
            impl From<$source> for Operand {
                fn from(n: $source) -> Self {
                    Operand::Number(Number::from(n))
                }
            }
        )+
    };
}

operand_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// A single named-field test.
///
/// ```
/// use quarry::{Condition, Op, Value, Number};
///
/// let adults = Condition::new("age", Op::Gte, 18);
/// assert!(adults.matches(&Value::Number(Number::U64(30))));
/// assert!(!adults.matches(&Value::None));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Op,
    pub operand: Operand,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: Op, operand: impl Into<Operand>) -> Self {
        Condition {
            field: field.into(),
            op,
            operand: operand.into(),
        }
    }

    /// Tests a field value against this condition.
    ///
    /// Absent values and kind mismatches never match, `Ne` included.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        match (&self.operand, value) {
            (Operand::String(operand), Value::String(field)) => self.match_string(field, operand),
            (Operand::Number(operand), Value::Number(field)) => field
                .compare(*operand)
                .is_some_and(|ordering| self.op.eval_ordering(ordering)),
            (Operand::Timestamp(operand), Value::Timestamp(field)) => {
                self.op.eval_ordering(field.cmp(operand))
            }
            (Operand::Bool(operand), Value::Bool(field)) => match self.op {
                Op::Eq => field == operand,
                Op::Ne => field != operand,
                _ => false,
            },
            _ => false,
        }
    }

    fn match_string(&self, field: &str, operand: &str) -> bool {
        match self.op {
            Op::Contains => field.contains(operand),
            Op::StartsWith => field.starts_with(operand),
            Op::EndsWith => field.ends_with(operand),
            op => op.eval_ordering(field.cmp(operand)),
        }
    }
}
