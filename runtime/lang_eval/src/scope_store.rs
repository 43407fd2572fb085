//! Scope-indexed variable tables.
//!
//! Each `ScopeId` selects one name→value table. Names are the fully sigiled
//! variable keys (`$x`, `&list`, `fp.f`). A table exists from
//! `create_scope` until `drop_scope`; `set` creates it on demand.

use rustc_hash::FxHashMap;

use lang_value::{final_data_change, RuntimeResult, ScopeId, Value};

/// Per-scope variable storage.
#[derive(Default)]
pub struct ScopeStore {
    scopes: FxHashMap<ScopeId, FxHashMap<String, Value>>,
}

impl ScopeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table for `scope`, keeping an existing one.
    pub fn create_scope(&mut self, scope: ScopeId) {
        self.scopes.entry(scope).or_default();
    }

    /// Drop the table of `scope` and every value in it.
    pub fn drop_scope(&mut self, scope: ScopeId) {
        self.scopes.remove(&scope);
    }

    pub fn contains_scope(&self, scope: ScopeId) -> bool {
        self.scopes.contains_key(&scope)
    }

    /// Insert or overwrite `name`.
    pub fn set(&mut self, scope: ScopeId, name: impl Into<String>, value: Value) {
        self.scopes
            .entry(scope)
            .or_default()
            .insert(name.into(), value);
    }

    /// Reference-duplicate of `name`, if present.
    pub fn get(&self, scope: ScopeId, name: &str) -> Option<Value> {
        self.scopes.get(&scope)?.get(name).cloned()
    }

    /// Return the value of `name`, creating it with `factory` only if absent.
    ///
    /// A present value is returned unchanged and `factory` is not called.
    pub fn get_or_insert_static(
        &mut self,
        scope: ScopeId,
        name: &str,
        factory: impl FnOnce() -> Value,
    ) -> Value {
        let table = self.scopes.entry(scope).or_default();
        if let Some(existing) = table.get(name) {
            return existing.clone();
        }
        let value = factory();
        table.insert(name.to_string(), value.clone());
        value
    }

    /// Write the data of `value` into the existing variable `name`, keeping
    /// its flags and label, or insert `value` if `name` is absent.
    ///
    /// Fails with `FinalDataChange` when the existing variable is final.
    pub fn assign(&mut self, scope: ScopeId, name: &str, value: Value) -> RuntimeResult<()> {
        let table = self.scopes.entry(scope).or_default();
        match table.get_mut(name) {
            Some(existing) if existing.is_final() => Err(final_data_change(Some(name))),
            Some(existing) => existing.set_data(value.data().clone()),
            None => {
                table.insert(name.to_string(), value);
                Ok(())
            }
        }
    }

    /// Remove `name` from `scope`, returning its value.
    pub fn remove(&mut self, scope: ScopeId, name: &str) -> Option<Value> {
        self.scopes.get_mut(&scope)?.remove(name)
    }

    /// Names defined in `scope`, sorted.
    pub fn names(&self, scope: ScopeId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .scopes
            .get(&scope)
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }
}
