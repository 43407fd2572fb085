//! Module units and their lifecycle state.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use lang_value::{final_data_change, invalid_module_state, RuntimeResult, Value};

use super::archive::{ArchiveEntry, ModuleArchive, LANG_ENTRY};
use super::bridge::NativeModule;
use super::manifest::ModuleManifest;
use crate::function_table::FunctionEntry;
use crate::interpreter::ReplacedGlobal;

/// Lifecycle of a module unit.
///
/// ```text
/// Loading ──load ok──▶ Active ──unload──▶ Unloading ──▶ Closed
///    └──────────load failed──────────────────────────────▲
/// ```
///
/// Exports are only accepted while `Loading`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModuleState {
    Loading,
    Active,
    Unloading,
    Closed,
}

impl ModuleState {
    pub fn name(self) -> &'static str {
        match self {
            ModuleState::Loading => "LOADING",
            ModuleState::Active => "ACTIVE",
            ModuleState::Unloading => "UNLOADING",
            ModuleState::Closed => "CLOSED",
        }
    }

    /// Value of `$LANG_MODULE_STATE` for code running in this state.
    pub fn lang_var_text(self) -> &'static str {
        match self {
            ModuleState::Loading | ModuleState::Active => "load",
            ModuleState::Unloading | ModuleState::Closed => "unload",
        }
    }
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) type NativeModuleCell = Rc<RefCell<Box<dyn NativeModule>>>;

/// One opened module: archive snapshot, manifest and export tables.
pub struct ModuleUnit {
    archive: ModuleArchive,
    manifest: ModuleManifest,
    state: ModuleState,
    exported_functions: Vec<String>,
    exported_variables: FxHashMap<String, Value>,
    replaced_functions: Vec<FunctionEntry>,
    replaced_globals: Vec<ReplacedGlobal>,
    natives: Vec<(String, NativeModuleCell)>,
}

impl ModuleUnit {
    /// Open a unit in the `Loading` state.
    pub fn open(archive: ModuleArchive, manifest: ModuleManifest) -> Self {
        ModuleUnit {
            archive,
            manifest,
            state: ModuleState::Loading,
            exported_functions: Vec::new(),
            exported_variables: FxHashMap::default(),
            replaced_functions: Vec::new(),
            replaced_globals: Vec::new(),
            natives: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.manifest.name()
    }

    /// Path of the archive the module was opened from.
    #[inline]
    pub fn file(&self) -> &str {
        self.archive.path()
    }

    #[inline]
    pub fn manifest(&self) -> &ModuleManifest {
        &self.manifest
    }

    #[inline]
    pub fn state(&self) -> ModuleState {
        self.state
    }

    /// Copy of the archive's entry index.
    pub fn entries(&self) -> BTreeMap<String, ArchiveEntry> {
        self.archive.entries()
    }

    /// Copy of the archive's content map.
    pub fn content(&self) -> BTreeMap<String, Vec<u8>> {
        self.archive.content()
    }

    /// Copy of one archive entry.
    pub fn read_entry(&self, name: &str) -> Option<Vec<u8>> {
        self.archive.read(name)
    }

    /// Script of a `lang` module.
    pub fn script(&self) -> Option<String> {
        self.archive.read_text(LANG_ENTRY)
    }

    /// Exported function names in export order.
    pub fn exported_functions(&self) -> &[String] {
        &self.exported_functions
    }

    /// Exported variable keys, sorted.
    pub fn exported_variable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.exported_variables.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn exported_variable(&self, key: &str) -> Option<Value> {
        self.exported_variables.get(key).cloned()
    }

    /// Entry points with an instantiated native module.
    pub fn native_entry_points(&self) -> Vec<&str> {
        self.natives.iter().map(|(entry, _)| entry.as_str()).collect()
    }

    pub(crate) fn set_state(&mut self, state: ModuleState) {
        tracing::trace!(module = %self.name(), from = %self.state, to = %state, "module state");
        self.state = state;
    }

    pub(crate) fn ensure_loading(&self) -> RuntimeResult<()> {
        if self.state == ModuleState::Loading {
            Ok(())
        } else {
            Err(invalid_module_state(self.name(), self.state.name()))
        }
    }

    pub(crate) fn record_function(&mut self, name: &str, replaced: Option<FunctionEntry>) {
        if !self.exported_functions.iter().any(|f| f == name) {
            self.exported_functions.push(name.to_string());
        }
        self.replaced_functions.extend(replaced);
    }

    /// Store an exported variable; last write wins unless the stored value is
    /// final.
    pub(crate) fn export_variable(&mut self, key: String, value: Value) -> RuntimeResult<()> {
        if self
            .exported_variables
            .get(&key)
            .is_some_and(Value::is_final)
        {
            return Err(final_data_change(Some(&key)));
        }
        self.exported_variables.insert(key, value);
        Ok(())
    }

    pub(crate) fn exported_variables(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.exported_variables.iter()
    }

    pub(crate) fn take_replaced_functions(&mut self) -> Vec<FunctionEntry> {
        std::mem::take(&mut self.replaced_functions)
    }

    pub(crate) fn record_global(&mut self, replaced: ReplacedGlobal) {
        self.replaced_globals.push(replaced);
    }

    pub(crate) fn take_replaced_globals(&mut self) -> Vec<ReplacedGlobal> {
        std::mem::take(&mut self.replaced_globals)
    }

    pub(crate) fn add_native(&mut self, entry_point: &str, native: NativeModuleCell) {
        self.natives.push((entry_point.to_string(), native));
    }

    pub(crate) fn natives(&self) -> Vec<NativeModuleCell> {
        self.natives.iter().map(|(_, native)| Rc::clone(native)).collect()
    }
}

/// Shared handle to a module unit.
///
/// Call stack frames and bridges hold handles; the interpreter's module
/// registry holds the unit for as long as it is loaded.
#[derive(Clone)]
pub struct ModuleHandle(Rc<RefCell<ModuleUnit>>);

impl ModuleHandle {
    pub fn new(unit: ModuleUnit) -> Self {
        ModuleHandle(Rc::new(RefCell::new(unit)))
    }

    /// Borrow the unit for reading.
    ///
    /// Do not hold the borrow across calls back into the interpreter.
    pub fn borrow(&self) -> Ref<'_, ModuleUnit> {
        self.0.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, ModuleUnit> {
        self.0.borrow_mut()
    }

    pub fn name(&self) -> String {
        self.0.borrow().name().to_string()
    }

    pub fn file(&self) -> String {
        self.0.borrow().file().to_string()
    }

    pub fn state(&self) -> ModuleState {
        self.0.borrow().state()
    }

    pub fn ptr_eq(&self, other: &ModuleHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(unit) => write!(
                f,
                "ModuleHandle({} @ {}, {})",
                unit.name(),
                unit.file(),
                unit.state()
            ),
            Err(_) => f.write_str("ModuleHandle(<borrowed>)"),
        }
    }
}
