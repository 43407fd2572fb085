//! `langrt vars`: the lang vars of a fresh root scope.

use std::fmt::Write;

use lang_eval::{Interpreter, ScopeId, Value};

/// One line per variable: name, type, flags and text.
pub fn render_vars(interpreter: &Interpreter) -> String {
    let scopes = interpreter.scopes();
    let mut out = String::new();
    for name in scopes.names(ScopeId::ROOT) {
        let Some(value) = scopes.get(ScopeId::ROOT, name) else {
            continue;
        };
        let _ = writeln!(
            out,
            "{name} {}{} = {}",
            value.data_type().name(),
            flags(&value),
            value.to_text()
        );
    }
    out
}

fn flags(value: &Value) -> String {
    let mut flags = Vec::new();
    if value.is_final() {
        flags.push("final");
    }
    if value.is_static() {
        flags.push("static");
    }
    if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    }
}

pub fn print_vars() {
    let interpreter = Interpreter::new();
    print!("{}", render_vars(&interpreter));
}
