//! The interpreter instance.
//!
//! One `Interpreter` owns all state that scripts of one execution share: the
//! global function table, the global variable namespace, the scope tables,
//! the call stack and the loaded modules. Components that need global state
//! receive `&mut Interpreter` (or `&mut dyn FunctionExecutor`); there are no
//! process-wide globals besides the native factory registry, which hosts may
//! share between instances.
//!
//! # Frames and scopes
//!
//! The call stack always holds the root frame pushed by the builder, so
//! `CallStack::top()` is valid for the whole lifetime of an interpreter.
//! `enter_scope` seeds a fresh scope from the active frame; module code runs
//! one scope below the scope of the load call.

mod builder;
mod call;
mod hooks;

pub use builder::{
    InterpreterBuilder, DEFAULT_IMPLEMENTATION, DEFAULT_LANG_NAME, DEFAULT_LANG_VERSION,
};
pub use hooks::{ScriptRunner, UserFunctionExecutor};

use std::collections::BTreeMap;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use lang_value::{
    final_data_change, FunctionExecutor, FunctionPointer, InterpretingError, PredefinedFunction,
    RuntimeResult, ScopeId, Value,
};

use crate::call_stack::CallStack;
use crate::function_table::FunctionTable;
use crate::lang_vars::{inject_lang_vars, BuiltinSchemas, RuntimeConstants, ERRNO};
use crate::module::{LangVersion, ModuleHandle, NativeModuleFactories, NativeModuleFactory};
use crate::platform::Platform;
use crate::scope_store::ScopeStore;
use crate::shared::SharedMutableRegistry;

/// Interpreter instance object.
pub struct Interpreter {
    constants: RuntimeConstants,
    lang_version: LangVersion,
    implementation: String,
    platform: Box<dyn Platform>,
    functions: FunctionTable,
    globals: FxHashMap<String, Value>,
    /// Module that published each global, if any.
    global_owners: FxHashMap<String, String>,
    scopes: ScopeStore,
    pub(crate) call_stack: CallStack,
    pub(crate) modules: BTreeMap<String, ModuleHandle>,
    pub(crate) native_modules: SharedMutableRegistry<NativeModuleFactories>,
    schemas: BuiltinSchemas,
    user_functions: Option<Rc<dyn UserFunctionExecutor>>,
    pub(crate) script_runner: Option<Rc<dyn ScriptRunner>>,
}

impl Interpreter {
    /// Interpreter with default configuration.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    #[inline]
    pub fn constants(&self) -> &RuntimeConstants {
        &self.constants
    }

    #[inline]
    pub fn lang_version(&self) -> LangVersion {
        self.lang_version
    }

    /// Host implementation name checked against module allow-lists.
    #[inline]
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    #[inline]
    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    #[inline]
    pub fn schemas(&self) -> &BuiltinSchemas {
        &self.schemas
    }

    // Functions

    #[inline]
    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    #[inline]
    pub(crate) fn functions_mut(&mut self) -> &mut FunctionTable {
        &mut self.functions
    }

    /// Register a host function, returning the one it replaces.
    pub fn register_function(
        &mut self,
        function: PredefinedFunction,
    ) -> Option<PredefinedFunction> {
        tracing::debug!(function = %function.canonical_name(), "host function registered");
        self.functions
            .register(function, None)
            .map(|replaced| replaced.function().clone())
    }

    /// The global function `name` as a FUNCTION_POINTER value labeled with
    /// its canonical name.
    pub fn predefined_function_value(&self, name: &str) -> Option<Value> {
        let function = self.functions.get(name)?;
        let label = function.canonical_name();
        Some(Value::function_pointer(FunctionPointer::Predefined(function.clone())).named(label))
    }

    // Global variables

    /// Global variable by sigiled key.
    pub fn global_variable(&self, key: &str) -> Option<Value> {
        self.globals.get(key).cloned()
    }

    /// Global variable keys, sorted.
    pub fn global_variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.globals.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Module that published the global `key`.
    pub fn global_variable_owner(&self, key: &str) -> Option<&str> {
        self.global_owners.get(key).map(String::as_str)
    }

    /// Publish `value` under `key`, returning the binding of another module
    /// it replaces.
    pub(crate) fn publish_global(
        &mut self,
        key: &str,
        value: Value,
        owner: &str,
    ) -> Option<ReplacedGlobal> {
        let previous_owner = self.global_owners.insert(key.to_string(), owner.to_string());
        let previous_value = self.globals.insert(key.to_string(), value);
        match (previous_owner, previous_value) {
            (Some(previous), Some(value)) if previous != owner => {
                tracing::debug!(variable = key, previous = %previous, owner, "global replaced");
                Some(ReplacedGlobal {
                    key: key.to_string(),
                    value,
                    owner: previous,
                })
            }
            _ => None,
        }
    }

    /// Reinstate a replaced global if its key is vacant.
    pub(crate) fn restore_global(&mut self, global: ReplacedGlobal) {
        if self.globals.contains_key(&global.key) {
            return;
        }
        tracing::debug!(variable = %global.key, owner = %global.owner, "global restored");
        self.global_owners.insert(global.key.clone(), global.owner);
        self.globals.insert(global.key, global.value);
    }

    /// Remove `key` only if `owner` published the current value.
    pub(crate) fn evict_global(&mut self, key: &str, owner: &str) -> bool {
        if self.global_owners.get(key).map(String::as_str) != Some(owner) {
            return false;
        }
        self.global_owners.remove(key);
        self.globals.remove(key).is_some()
    }

    // Scopes and frames

    #[inline]
    pub fn scopes(&self) -> &ScopeStore {
        &self.scopes
    }

    #[inline]
    pub fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    /// Create `scope` and seed it with the lang vars of the active frame.
    pub fn enter_scope(&mut self, scope: ScopeId) {
        self.scopes.create_scope(scope);
        inject_lang_vars(
            &mut self.scopes,
            &self.constants,
            &self.schemas,
            self.call_stack.top(),
            scope,
        );
    }

    /// Drop `scope` and every variable in it.
    pub fn exit_scope(&mut self, scope: ScopeId) {
        self.scopes.drop_scope(scope);
    }

    /// `&StackTraceElement` instances for the active frames, most recent
    /// first.
    pub fn stack_trace(&self) -> RuntimeResult<Vec<Value>> {
        self.call_stack.stack_trace(&self.schemas.stack_trace_element)
    }

    // Modules

    /// Names of the loaded modules, sorted.
    pub fn loaded_modules(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    pub fn module(&self, name: &str) -> Option<ModuleHandle> {
        self.modules.get(name).cloned()
    }

    #[inline]
    pub fn native_modules(&self) -> &SharedMutableRegistry<NativeModuleFactories> {
        &self.native_modules
    }

    /// Register a native module constructor under `entry_point`.
    ///
    /// Visible to every interpreter sharing this registry.
    pub fn register_native_module(&self, entry_point: &str, factory: NativeModuleFactory) {
        tracing::debug!(entry_point, "native module registered");
        self.native_modules.write().register(entry_point, factory);
    }
}

/// A global binding overwritten by a later module.
#[derive(Clone, Debug)]
pub(crate) struct ReplacedGlobal {
    pub(crate) key: String,
    pub(crate) value: Value,
    pub(crate) owner: String,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionExecutor for Interpreter {
    fn call_function_pointer(
        &mut self,
        function: &FunctionPointer,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Option<Value>> {
        Interpreter::call_function_pointer(self, function, args, scope)
    }

    fn get_variable(&self, scope: ScopeId, name: &str) -> Option<Value> {
        self.scopes
            .get(scope, name)
            .or_else(|| self.global_variable(name))
    }

    fn set_variable(&mut self, scope: ScopeId, name: &str, value: Value) -> RuntimeResult<()> {
        if self.scopes.get(scope, name).is_none() {
            if let Some(global) = self.globals.get_mut(name) {
                if global.is_final() {
                    return Err(final_data_change(Some(name)));
                }
                return global.set_data(value.data().clone());
            }
        }
        self.scopes.assign(scope, name, value)
    }

    fn set_errno(&mut self, scope: ScopeId, error: InterpretingError) {
        if error.is_warning() {
            tracing::warn!(scope = %scope, error = error.name(), "{}", error.description());
            return;
        }
        if let Err(err) = self.scopes.assign(scope, ERRNO, Value::int(error.code())) {
            tracing::warn!(scope = %scope, error = %err, "errno not recorded");
        }
    }
}

#[cfg(test)]
mod tests;
