use super::*;
use lang_value::NativeFunction;

fn entry(name: &str) -> PredefinedFunction {
    PredefinedFunction::new(name, false, NativeFunction::new(name, |_, _, _| Ok(None)))
}

#[test]
fn test_register_returns_replaced_binding() {
    let mut table = FunctionTable::new();
    assert!(table.register(entry("f"), None).is_none());
    let replaced = table.register(entry("f"), Some("m"));
    assert!(replaced.is_some_and(|old| old.owner().is_none()));
    assert_eq!(table.entry("f").and_then(FunctionEntry::owner), Some("m"));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_eviction_only_removes_owned_entries() {
    let mut table = FunctionTable::new();
    table.register(entry("f"), Some("a"));
    table.register(entry("f"), Some("b"));
    assert!(!table.remove_if_owned_by("f", "a"));
    assert!(table.contains("f"));
    assert!(table.remove_if_owned_by("f", "b"));
    assert!(table.is_empty());
}

#[test]
fn test_restore_only_fills_vacant_slots() {
    let mut table = FunctionTable::new();
    let original = table.register(entry("g"), Some("a"));
    assert!(original.is_none());
    let replaced = table.register(entry("g"), Some("b"));
    let Some(old) = replaced else {
        panic!("expected replaced binding");
    };
    table.restore(old.clone());
    assert_eq!(table.entry("g").and_then(FunctionEntry::owner), Some("b"));
    table.remove_if_owned_by("g", "b");
    table.restore(old);
    assert_eq!(table.entry("g").and_then(FunctionEntry::owner), Some("a"));
}

#[test]
fn test_names_sorted() {
    let mut table = FunctionTable::new();
    table.register(entry("zeta"), None);
    table.register(entry("alpha"), None);
    assert_eq!(table.names(), vec!["alpha", "zeta"]);
}
