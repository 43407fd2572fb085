//! Polymorphic operators over values.
//!
//! Direct enum-based dispatch: the tag set is closed, so every operator is a
//! single exhaustive match. Operators never raise; `None` means the operator
//! is not applicable to the given tags and the caller decides what that
//! means.

use lang_value::ordering::{is_equal, is_greater_than, is_less_than};
use lang_value::{ensure_sufficient_stack, Data, FunctionPointer, Value};

/// Element count of an ARRAY, character count of a TEXT, 1 for a CHAR.
pub fn length(value: &Value) -> Option<Value> {
    let len = match value.data() {
        Data::Array(array) => array.len(),
        Data::Text(text) => text.chars().count(),
        Data::Char(_) => 1,
        Data::Int(_)
        | Data::Long(_)
        | Data::Float(_)
        | Data::Double(_)
        | Data::Error(_)
        | Data::VarPointer(_)
        | Data::FunctionPointer(_)
        | Data::Struct(_)
        | Data::Null
        | Data::Void
        | Data::ArgumentSeparator(_)
        | Data::Type(_) => return None,
    };
    i32::try_from(len).ok().map(Value::int)
}

/// Independent copy of `value`.
///
/// Arrays are copied element-wise and recursively; every other tag is
/// duplicated. The copy is unlabeled and carries no flags.
pub fn deep_copy(value: &Value) -> Option<Value> {
    ensure_sufficient_stack(|| match value.data() {
        Data::Array(array) => {
            let elements = array
                .to_vec()
                .iter()
                .map(deep_copy)
                .collect::<Option<Vec<_>>>()?;
            Some(Value::array(elements))
        }
        Data::Text(_)
        | Data::Char(_)
        | Data::Int(_)
        | Data::Long(_)
        | Data::Float(_)
        | Data::Double(_)
        | Data::Error(_)
        | Data::VarPointer(_)
        | Data::FunctionPointer(_)
        | Data::Struct(_)
        | Data::Null
        | Data::Void
        | Data::ArgumentSeparator(_)
        | Data::Type(_) => Some(Value::new(value.data().clone())),
    })
}

/// Concatenate `right` onto `left`; dispatch follows `left`'s tag.
///
/// - Numeric, CHAR and TEXT: text of both sides, as TEXT.
/// - ARRAY: requires an ARRAY on the right; left elements first.
/// - FUNCTION_POINTER: requires a FUNCTION_POINTER on the right; the result
///   is a combinator that pipes the left result into the right function on
///   every invocation.
pub fn concat(left: &Value, right: &Value) -> Option<Value> {
    match left.data() {
        Data::Int(_)
        | Data::Long(_)
        | Data::Float(_)
        | Data::Double(_)
        | Data::Char(_)
        | Data::Text(_) => {
            let mut text = left.to_text();
            text.push_str(&right.to_text());
            Some(Value::text(text))
        }
        Data::Array(array) => {
            let Data::Array(tail) = right.data() else {
                return None;
            };
            let mut elements = array.to_vec();
            elements.extend(tail.to_vec());
            Some(Value::array(elements))
        }
        Data::FunctionPointer(first) => {
            let Data::FunctionPointer(second) = right.data() else {
                return None;
            };
            Some(Value::function_pointer(FunctionPointer::combinator(
                first.clone(),
                second.clone(),
            )))
        }
        Data::Error(_)
        | Data::VarPointer(_)
        | Data::Struct(_)
        | Data::Null
        | Data::Void
        | Data::ArgumentSeparator(_)
        | Data::Type(_) => None,
    }
}

/// Three-way comparison: INT -1, 0 or 1, or NULL when incomparable.
pub fn compare(a: &Value, b: &Value) -> Value {
    if is_less_than(a, b) {
        Value::int(-1)
    } else if is_equal(a, b) {
        Value::int(0)
    } else if is_greater_than(a, b) {
        Value::int(1)
    } else {
        Value::null()
    }
}
