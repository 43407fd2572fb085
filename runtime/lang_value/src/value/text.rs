//! Canonical text representation of values.

use std::fmt;

use super::{Data, StructObject, Value};
use crate::stack::ensure_sufficient_stack;

impl Value {
    /// Text form used by concatenation and display.
    pub fn to_text(&self) -> String {
        ensure_sufficient_stack(|| match self.data() {
            Data::Text(text) => text.to_string(),
            Data::Char(c) => c.to_string(),
            Data::Int(n) => n.to_string(),
            Data::Long(n) => n.to_string(),
            Data::Float(n) => floating_text(*n, n.is_nan(), n.is_infinite(), *n > 0.0),
            Data::Double(n) => floating_text(*n, n.is_nan(), n.is_infinite(), *n > 0.0),
            Data::Array(array) => array.with_elements(|elements| {
                let mut out = String::from("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&element.to_text());
                }
                out.push(']');
                out
            }),
            Data::Error(error) => error.error().name().to_string(),
            Data::VarPointer(target) => format!("-->{}", target.to_text()),
            Data::FunctionPointer(function) => function.to_string(),
            Data::Struct(object) => struct_text(object),
            Data::Null => "null".to_string(),
            Data::Void => String::new(),
            Data::ArgumentSeparator(text) => text.to_string(),
            Data::Type(ty) => ty.name().to_string(),
        })
    }
}

/// `NaN`, `Infinity`, `-Infinity`, otherwise the shortest round-trip form
/// with a trailing `.0` for integral values.
fn floating_text(n: impl fmt::Display, nan: bool, infinite: bool, positive: bool) -> String {
    if nan {
        return "NaN".to_string();
    }
    if infinite {
        return if positive { "Infinity" } else { "-Infinity" }.to_string();
    }
    let text = n.to_string();
    if text.contains(['.', 'e', 'E']) {
        text
    } else {
        text + ".0"
    }
}

pub(super) fn struct_text(object: &StructObject) -> String {
    let schema = object.schema();
    let Ok(members) = object.members() else {
        return format!("<Struct[{}]>", schema.name());
    };
    let mut out = String::from("{");
    for (i, (field, member)) in schema.field_names().iter().zip(&members).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(field);
        out.push_str(": ");
        out.push_str(&member.to_text());
    }
    out.push('}');
    out
}
