//! Global function table.
//!
//! Entries are keyed by bare identifier. Each entry remembers which module
//! registered it (`None` for host registrations) so unloading a module only
//! evicts the bindings it still owns.

use rustc_hash::FxHashMap;

use lang_value::PredefinedFunction;

/// Registered function plus its owner.
#[derive(Clone)]
pub struct FunctionEntry {
    function: PredefinedFunction,
    owner: Option<String>,
}

impl FunctionEntry {
    #[inline]
    pub fn function(&self) -> &PredefinedFunction {
        &self.function
    }

    /// Name of the module that registered the entry.
    #[inline]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }
}

/// Predefined functions visible to every scope of one interpreter.
#[derive(Default)]
pub struct FunctionTable {
    entries: FxHashMap<String, FunctionEntry>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `function` under its name, returning the binding it replaces.
    pub fn register(
        &mut self,
        function: PredefinedFunction,
        owner: Option<&str>,
    ) -> Option<FunctionEntry> {
        let name = function.name().to_string();
        self.entries.insert(
            name,
            FunctionEntry {
                function,
                owner: owner.map(str::to_string),
            },
        )
    }

    pub fn get(&self, name: &str) -> Option<&PredefinedFunction> {
        self.entries.get(name).map(FunctionEntry::function)
    }

    pub fn entry(&self, name: &str) -> Option<&FunctionEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove `name` only if `owner` registered the current binding.
    pub fn remove_if_owned_by(&mut self, name: &str, owner: &str) -> bool {
        if self.entries.get(name).and_then(FunctionEntry::owner) != Some(owner) {
            return false;
        }
        self.entries.remove(name).is_some()
    }

    /// Reinstate a replaced binding if its slot is vacant.
    pub(crate) fn restore(&mut self, entry: FunctionEntry) {
        let name = entry.function.name().to_string();
        self.entries.entry(name).or_insert(entry);
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests;
