//! Load and unload of module units.
//!
//! Loading parses and checks the manifest, opens a unit in `Loading`, runs
//! the module's load hook in the first unused scope below the caller's, then
//! either publishes
//! the unit's exports (`Active`) or rolls back every function the unit
//! registered (`Closed`). Unloading runs the unload hook in `Unloading` and
//! evicts the unit's symbols, even when the hook fails.
//!
//! Eviction only removes bindings the unit still owns: a function or global
//! variable overwritten by a later module stays. Bindings the unit replaced
//! are reinstated when their owner is still around.

use std::cell::RefCell;
use std::io::Read;
use std::path::Path;
use std::rc::Rc;

use lang_value::{function_not_supported, scope_exhausted, RuntimeResult, ScopeId, Value};

use super::archive::{ModuleArchive, LANG_ENTRY, MANIFEST_ENTRY};
use super::bridge::ModuleBridge;
use super::errors::ModuleError;
use super::manifest::{parse_manifest, ModuleType};
use super::unit::{ModuleHandle, ModuleState, ModuleUnit, NativeModuleCell};
use crate::call_stack::{module_path_prefix, StackElement};
use crate::interpreter::Interpreter;

/// Separator placed between the module path and the caller's arguments.
const ARGUMENT_SEPARATOR: &str = ", ";

impl Interpreter {
    /// Read the archive at `path` through the platform and load it.
    pub fn load_module_file(
        &mut self,
        path: &Path,
        args: &[Value],
        scope: ScopeId,
    ) -> Result<Value, ModuleError> {
        let display = path.to_string_lossy().into_owned();
        let io_error = |source| ModuleError::Io {
            path: display.clone(),
            source,
        };
        let mut bytes = Vec::new();
        self.platform()
            .open_stream(path)
            .map_err(io_error)?
            .read_to_end(&mut bytes)
            .map_err(io_error)?;
        let archive = ModuleArchive::from_zip_bytes(display.clone(), &bytes)?;
        self.load_module(archive, args, scope)
    }

    /// Load the module contained in `archive`.
    ///
    /// Returns the result of the module's load hook.
    #[tracing::instrument(level = "debug", skip_all, fields(path = archive.path()))]
    pub fn load_module(
        &mut self,
        archive: ModuleArchive,
        args: &[Value],
        scope: ScopeId,
    ) -> Result<Value, ModuleError> {
        let manifest_text =
            archive
                .read_text(MANIFEST_ENTRY)
                .ok_or_else(|| ModuleError::MissingEntry {
                    path: archive.path().to_string(),
                    entry: MANIFEST_ENTRY,
                })?;
        let manifest = parse_manifest(&manifest_text)?;
        manifest.check_compatibility(self.lang_version(), self.implementation())?;

        let name = manifest.name().to_string();
        if self.modules.contains_key(&name) {
            return Err(ModuleError::AlreadyLoaded { module: name });
        }

        let native = match manifest.module_type() {
            ModuleType::Lang => {
                if archive.read_text(LANG_ENTRY).is_none() {
                    return Err(ModuleError::MissingEntry {
                        path: archive.path().to_string(),
                        entry: LANG_ENTRY,
                    });
                }
                None
            }
            ModuleType::Native => {
                let entry_point = manifest
                    .native_entry_point()
                    .ok_or_else(|| ModuleError::MissingEntryPoint {
                        module: name.clone(),
                    })?
                    .to_string();
                let instance = self.native_modules.read().create(&entry_point).ok_or_else(|| {
                    ModuleError::UnknownEntryPoint {
                        module: name.clone(),
                        entry_point: entry_point.clone(),
                    }
                })?;
                let cell: NativeModuleCell = Rc::new(RefCell::new(instance));
                Some((entry_point, cell))
            }
        };

        let module = ModuleHandle::new(ModuleUnit::open(archive, manifest));
        if let Some((entry_point, cell)) = native {
            module.borrow_mut().add_native(&entry_point, cell);
        }

        match self.run_module_hook(&module, args, scope) {
            Ok(result) => {
                module.borrow_mut().set_state(ModuleState::Active);
                let exports: Vec<(String, Value)> = module
                    .borrow()
                    .exported_variables()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                for (key, value) in exports {
                    if let Some(replaced) = self.publish_global(&key, value, &name) {
                        module.borrow_mut().record_global(replaced);
                    }
                }
                self.modules.insert(name.clone(), module);
                tracing::debug!(module = %name, "module loaded");
                Ok(result)
            }
            Err(source) => {
                tracing::warn!(
                    module = %name,
                    error = %source,
                    "module load failed, rolling back"
                );
                self.evict_module(&module);
                Err(ModuleError::Runtime {
                    module: name,
                    source,
                })
            }
        }
    }

    /// Unload the loaded module `name`.
    ///
    /// Returns the result of the module's unload hook. The module's symbols
    /// are evicted and the module is closed even if the hook fails.
    #[tracing::instrument(level = "debug", skip(self, args))]
    pub fn unload_module(
        &mut self,
        name: &str,
        args: &[Value],
        scope: ScopeId,
    ) -> Result<Value, ModuleError> {
        let module = self.modules.get(name).cloned().ok_or_else(|| ModuleError::NotLoaded {
            module: name.to_string(),
        })?;
        module.borrow_mut().set_state(ModuleState::Unloading);
        let result = self.run_module_hook(&module, args, scope);

        self.modules.remove(name);
        self.evict_module(&module);
        tracing::debug!(module = name, ok = result.is_ok(), "module unloaded");
        result.map_err(|source| ModuleError::Runtime {
            module: name.to_string(),
            source,
        })
    }

    /// Run the load or unload hook matching the module's state, inside a
    /// module frame and a scope created for the hook below `scope`.
    fn run_module_hook(
        &mut self,
        module: &ModuleHandle,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Value> {
        let (module_type, file, state) = {
            let unit = module.borrow();
            (unit.manifest().module_type(), unit.file().to_string(), unit.state())
        };
        let module_scope = self.free_scope_below(scope)?;
        let phase = state.lang_var_text();
        let prefix = module_path_prefix(module);
        let frame = match module_type {
            ModuleType::Lang => {
                StackElement::new(format!("{prefix}/lang"), Some("module.lang"), phase)
            }
            ModuleType::Native => StackElement::new(prefix, None, phase),
        };
        self.call_stack.push(frame.with_module(module.clone()))?;

        let mut call_args = Vec::with_capacity(args.len() + 2);
        call_args.push(Value::text(&file));
        if !args.is_empty() {
            call_args.push(Value::argument_separator(ARGUMENT_SEPARATOR));
            call_args.extend(args.iter().cloned());
        }

        self.enter_scope(module_scope);
        let result = match module_type {
            ModuleType::Lang => self.run_script(module, &call_args, module_scope),
            ModuleType::Native => self.run_natives(module, state, &call_args, module_scope),
        };
        self.exit_scope(module_scope);
        self.call_stack.pop();
        result
    }

    /// First scope below `scope` that does not exist yet.
    fn free_scope_below(&self, scope: ScopeId) -> RuntimeResult<ScopeId> {
        std::iter::successors(scope.next(), |id| id.next())
            .find(|id| !self.scopes().contains_scope(*id))
            .ok_or_else(|| scope_exhausted(scope))
    }

    fn run_script(
        &mut self,
        module: &ModuleHandle,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Value> {
        let runner = self
            .script_runner
            .clone()
            .ok_or_else(|| function_not_supported("lang modules without a script runner"))?;
        let script = module.borrow().script().unwrap_or_default();
        let mut bridge = ModuleBridge::new(self, module.clone());
        runner.run(&mut bridge, &script, args, scope)
    }

    fn run_natives(
        &mut self,
        module: &ModuleHandle,
        state: ModuleState,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Value> {
        let natives = module.borrow().natives();
        let mut result = Value::void();
        for native in natives {
            let mut bridge = ModuleBridge::new(self, module.clone());
            let mut native = native.borrow_mut();
            result = if state == ModuleState::Loading {
                native.load(&mut bridge, args, scope)?
            } else {
                native.unload(&mut bridge, args, scope)?
            };
        }
        Ok(result)
    }

    /// Remove the functions and globals `module` still owns, reinstate the
    /// bindings it replaced and close it.
    fn evict_module(&mut self, module: &ModuleHandle) {
        let name = module.name();
        let (functions, variables, replaced, replaced_globals) = {
            let mut unit = module.borrow_mut();
            (
                unit.exported_functions().to_vec(),
                unit.exported_variable_names(),
                unit.take_replaced_functions(),
                unit.take_replaced_globals(),
            )
        };

        for function in &functions {
            if !self.functions_mut().remove_if_owned_by(function, &name) {
                tracing::debug!(
                    module = %name,
                    function = %function,
                    "function kept, owned by another module"
                );
            }
        }
        for entry in replaced {
            let owner_alive = entry
                .owner()
                .map_or(true, |owner| owner != name && self.modules.contains_key(owner));
            if owner_alive {
                self.functions_mut().restore(entry);
            }
        }
        for key in &variables {
            self.evict_global(key, &name);
        }
        for global in replaced_globals {
            if global.owner != name && self.modules.contains_key(&global.owner) {
                self.restore_global(global);
            }
        }

        module.borrow_mut().set_state(ModuleState::Closed);
    }
}
