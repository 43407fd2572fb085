//! Lang Eval - scopes, operators, call stack and modules of the Lang runtime.
//!
//! # Architecture
//!
//! - `Interpreter`: the instance object owning all shared state; built with
//!   `InterpreterBuilder`
//! - `ScopeStore`: scope-indexed variable tables
//! - `CallStack`: active frames, depth limit, stack traces
//! - `operators`: length, deep copy, concatenation, comparison
//! - `lang_vars`: the `$LANG_*` variables seeded into every scope
//! - `module`: manifests, archives, the load/unload lifecycle and the native
//!   module bridge
//! - `Platform`: file access and host facts
//!
//! # Re-exports
//!
//! Value types from `lang_value` are re-exported for convenience:
//! - `Value`, `Data`, `DataType`, `FunctionPointer`, `ScopeId`
//! - `RuntimeError`, `RuntimeResult`, `InterpretingError`

pub mod call_stack;
pub mod function_table;
pub mod interpreter;
pub mod lang_vars;
pub mod module;
pub mod operators;
pub mod platform;
pub mod scope_store;
mod shared;

pub use lang_value::{
    Data, DataType, FunctionExecutor, FunctionPointer, InterpretingError, NativeFunction,
    PredefinedFunction, RuntimeError, RuntimeErrorKind, RuntimeResult, ScopeId, Value,
};

pub use call_stack::{CallStack, StackElement};
pub use function_table::{FunctionEntry, FunctionTable};
pub use interpreter::{Interpreter, InterpreterBuilder, ScriptRunner, UserFunctionExecutor};
pub use lang_vars::{inject_lang_vars, BuiltinSchemas, RuntimeConstants};
pub use module::{
    parse_manifest, LangVersion, ModuleArchive, ModuleBridge, ModuleError, ModuleHandle,
    ModuleManifest, ModuleState, ModuleType, ModuleUnit, Namespace, NativeModule,
    NativeModuleFactories,
};
pub use platform::{Platform, StdPlatform};
pub use scope_store::ScopeStore;
pub use shared::SharedMutableRegistry;
