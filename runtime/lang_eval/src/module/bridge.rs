//! Capability surface for native modules.
//!
//! A native module implements [`NativeModule`] and is registered under its
//! entry point in [`NativeModuleFactories`]. While the module loads, it talks
//! to the interpreter only through the [`ModuleBridge`] it is handed; every
//! export helper validates before it mutates anything, so a rejected export
//! leaves no trace.

use rustc_hash::FxHashMap;

use lang_value::{
    type_mismatch, unknown_function, DataType, FunctionPointer, NativeFunction,
    PredefinedFunction, RuntimeResult, ScopeId, Value,
};

use super::namespace::{validate_identifier, Namespace};
use super::unit::ModuleHandle;
use crate::interpreter::Interpreter;

/// Host code of a native module.
pub trait NativeModule {
    /// Called once while the module is loading.
    ///
    /// `args` is the flattened argument list of the load call, starting with
    /// the module path. The result becomes the result of that call.
    fn load(
        &mut self,
        bridge: &mut ModuleBridge<'_>,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Value>;

    /// Called once while the module is unloading. Export helpers fail here.
    fn unload(
        &mut self,
        bridge: &mut ModuleBridge<'_>,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Value>;
}

/// Constructor of a native module.
pub type NativeModuleFactory = fn() -> Box<dyn NativeModule>;

/// Entry point → constructor registry.
#[derive(Default)]
pub struct NativeModuleFactories {
    factories: FxHashMap<String, NativeModuleFactory>,
}

impl NativeModuleFactories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `entry_point`, replacing an older one.
    pub fn register(&mut self, entry_point: impl Into<String>, factory: NativeModuleFactory) {
        self.factories.insert(entry_point.into(), factory);
    }

    /// Instantiate the module registered under `entry_point`.
    pub fn create(&self, entry_point: &str) -> Option<Box<dyn NativeModule>> {
        self.factories.get(entry_point).map(|factory| factory())
    }

    pub fn contains(&self, entry_point: &str) -> bool {
        self.factories.contains_key(entry_point)
    }

    /// Registered entry points, sorted.
    pub fn entry_points(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for NativeModuleFactories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entry_points()).finish()
    }
}

/// Helper context handed to a native module during `load`/`unload`.
pub struct ModuleBridge<'a> {
    interpreter: &'a mut Interpreter,
    module: ModuleHandle,
}

impl<'a> ModuleBridge<'a> {
    pub(crate) fn new(interpreter: &'a mut Interpreter, module: ModuleHandle) -> Self {
        ModuleBridge {
            interpreter,
            module,
        }
    }

    pub fn module_name(&self) -> String {
        self.module.name()
    }

    /// Handle of the owning module.
    pub fn module(&self) -> &ModuleHandle {
        &self.module
    }

    /// Register `function` as an ordinary global function named `name`.
    pub fn export_function(&mut self, name: &str, function: NativeFunction) -> RuntimeResult<()> {
        self.export_predefined(name, false, function)
    }

    /// Register `function` as a global linker function named `name`.
    pub fn export_linker_function(
        &mut self,
        name: &str,
        function: NativeFunction,
    ) -> RuntimeResult<()> {
        self.export_predefined(name, true, function)
    }

    fn export_predefined(
        &mut self,
        name: &str,
        linker: bool,
        function: NativeFunction,
    ) -> RuntimeResult<()> {
        self.module.borrow().ensure_loading()?;
        validate_identifier(name)?;

        let module_name = self.module.name();
        let entry = PredefinedFunction::new(name, linker, function);
        let replaced = self
            .interpreter
            .functions_mut()
            .register(entry, Some(&module_name));
        tracing::debug!(module = %module_name, function = name, linker, "function exported");
        self.module.borrow_mut().record_function(name, replaced);
        Ok(())
    }

    /// Export `value` as `$name`.
    pub fn export_normal_variable(
        &mut self,
        name: &str,
        value: &Value,
        final_data: bool,
    ) -> RuntimeResult<()> {
        self.export_variable(Namespace::Normal, name, value, final_data)
    }

    /// Export `value` as `&name`.
    pub fn export_collection_variable(
        &mut self,
        name: &str,
        value: &Value,
        final_data: bool,
    ) -> RuntimeResult<()> {
        self.export_variable(Namespace::Collection, name, value, final_data)
    }

    /// Export a FUNCTION_POINTER `value` as `fp.name`.
    pub fn export_function_pointer_variable(
        &mut self,
        name: &str,
        value: &Value,
        final_data: bool,
    ) -> RuntimeResult<()> {
        if value.data_type() != DataType::FunctionPointer {
            return Err(type_mismatch(DataType::FunctionPointer, value.data_type()));
        }
        self.export_variable(Namespace::FunctionPointer, name, value, final_data)
    }

    fn export_variable(
        &mut self,
        namespace: Namespace,
        name: &str,
        value: &Value,
        final_data: bool,
    ) -> RuntimeResult<()> {
        let mut unit = self.module.borrow_mut();
        unit.ensure_loading()?;
        namespace.validate(name)?;

        let key = namespace.key(name);
        tracing::debug!(module = %unit.name(), variable = %key, final_data, "variable exported");
        let exported = value.duplicate_as(&key, final_data);
        unit.export_variable(key, exported)
    }

    /// The global function `name` as a FUNCTION_POINTER labeled with its
    /// canonical `func.`/`linker.` name.
    pub fn get_predefined_function_as_data_object(&self, name: &str) -> Option<Value> {
        self.interpreter.predefined_function_value(name)
    }

    /// Invoke a FUNCTION_POINTER value; a callee that returns nothing yields
    /// VOID.
    pub fn call_function_pointer(
        &mut self,
        function: &Value,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Value> {
        let pointer: FunctionPointer = function.get_function_pointer()?.clone();
        let result = self.interpreter.call_function_pointer(&pointer, args, scope)?;
        Ok(result.unwrap_or_else(Value::void))
    }

    /// Invoke the global function `name`.
    pub fn call_predefined_function(
        &mut self,
        name: &str,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Value> {
        let function = self
            .get_predefined_function_as_data_object(name)
            .ok_or_else(|| unknown_function(name))?;
        self.call_function_pointer(&function, args, scope)
    }
}
