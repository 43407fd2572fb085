//! Equality and ordering predicates over values.
//!
//! Numeric tags (INT, LONG, FLOAT, DOUBLE and CHAR as its code point) compare
//! by value across tags. Integers compare exactly; as soon as one side is a
//! float both sides are widened to `f64`. Pairs without a defined order are
//! incomparable, so all three predicates are false for them.

use std::cmp::Ordering;

use crate::stack::ensure_sufficient_stack;
use crate::value::{Data, Value};

/// Loose equality: numeric values compare across tags.
pub fn is_equal(a: &Value, b: &Value) -> bool {
    order(a, b) == Some(Ordering::Equal)
}

/// Equality that additionally requires identical tags, recursively for
/// array elements.
pub fn is_strictly_equal(a: &Value, b: &Value) -> bool {
    if a.data_type() != b.data_type() {
        return false;
    }
    match (a.data(), b.data()) {
        (Data::Array(x), Data::Array(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            let (left, right) = (x.to_vec(), y.to_vec());
            left.len() == right.len()
                && ensure_sufficient_stack(|| {
                    left.iter()
                        .zip(&right)
                        .all(|(l, r)| is_strictly_equal(l, r))
                })
        }
        _ => is_equal(a, b),
    }
}

pub fn is_less_than(a: &Value, b: &Value) -> bool {
    order(a, b) == Some(Ordering::Less)
}

pub fn is_greater_than(a: &Value, b: &Value) -> bool {
    order(a, b) == Some(Ordering::Greater)
}

#[derive(Clone, Copy)]
enum Number {
    Integer(i64),
    Floating(f64),
}

impl Number {
    #[expect(
        clippy::cast_precision_loss,
        reason = "mixed integer/float comparison widens to f64"
    )]
    fn as_f64(self) -> f64 {
        match self {
            Number::Integer(n) => n as f64,
            Number::Floating(n) => n,
        }
    }
}

fn number(data: &Data) -> Option<Number> {
    match data {
        Data::Int(n) => Some(Number::Integer(i64::from(*n))),
        Data::Long(n) => Some(Number::Integer(*n)),
        Data::Char(c) => Some(Number::Integer(i64::from(u32::from(*c)))),
        Data::Float(n) => Some(Number::Floating(f64::from(*n))),
        Data::Double(n) => Some(Number::Floating(*n)),
        _ => None,
    }
}

fn compare_numbers(a: Number, b: Number) -> Option<Ordering> {
    match (a, b) {
        (Number::Integer(x), Number::Integer(y)) => Some(x.cmp(&y)),
        _ => a.as_f64().partial_cmp(&b.as_f64()),
    }
}

fn equal_or_none(equal: bool) -> Option<Ordering> {
    equal.then_some(Ordering::Equal)
}

/// Total over tag pairs: `None` marks incomparable values.
fn order(a: &Value, b: &Value) -> Option<Ordering> {
    ensure_sufficient_stack(|| match (a.data(), b.data()) {
        (Data::Text(x), Data::Text(y)) => Some(x.cmp(y)),
        (Data::Text(x), Data::Char(c)) => Some(str::cmp(x, c.to_string().as_str())),
        (Data::Char(c), Data::Text(y)) => Some(str::cmp(c.to_string().as_str(), y)),
        (Data::Array(x), Data::Array(y)) => {
            if x.ptr_eq(y) {
                return Some(Ordering::Equal);
            }
            let (left, right) = (x.to_vec(), y.to_vec());
            if left.len() != right.len() {
                return Some(left.len().cmp(&right.len()));
            }
            equal_or_none(left.iter().zip(&right).all(|(l, r)| is_equal(l, r)))
        }
        (Data::Error(x), Data::Error(y)) => Some(x.code().cmp(&y.code())),
        (Data::Type(x), Data::Type(y)) => equal_or_none(x == y),
        (Data::Null, Data::Null) | (Data::Void, Data::Void) => Some(Ordering::Equal),
        (Data::ArgumentSeparator(x), Data::ArgumentSeparator(y)) => equal_or_none(x == y),
        (Data::FunctionPointer(x), Data::FunctionPointer(y)) => {
            equal_or_none(x.same_function(y))
        }
        (Data::VarPointer(x), Data::VarPointer(y)) => equal_or_none(is_equal(x, y)),
        (Data::Struct(x), Data::Struct(y)) => {
            if x.ptr_eq(y) {
                return Some(Ordering::Equal);
            }
            if !std::rc::Rc::ptr_eq(x.schema(), y.schema()) {
                return None;
            }
            match (x.members(), y.members()) {
                (Ok(left), Ok(right)) => {
                    equal_or_none(left.iter().zip(&right).all(|(l, r)| is_equal(l, r)))
                }
                _ => None,
            }
        }
        (x, y) => compare_numbers(number(x)?, number(y)?),
    })
}
